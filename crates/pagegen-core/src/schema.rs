//! Schema rule engine: the master matrix of legal structured data per role.
//!
//! Each page role maps to a rule of (allowed, forbidden, required) node-type
//! sets. One frozen table drives both [`SchemaMatrix::clean`] (strip and
//! report, used at generation time) and [`SchemaMatrix::validate_graph`]
//! (read-only, used by audits), so the two can never drift apart.
//!
//! Evaluation is pure set membership: forbidden-typed nodes are stripped,
//! absent required types are errors, and types that are neither allowed nor
//! forbidden are non-blocking warnings. The only fatal condition lives at
//! load time: a node type listed as both forbidden and required for the
//! same role is a configuration contradiction and refuses to load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::classify::PageRole;
use crate::{Error, Result};

/// One typed node of a structured-data graph, JSON-LD style: a `@type` tag
/// plus an open property map. Nodes may cross-reference each other through
/// `@id` properties; the rule engine does not resolve references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Node type tag, e.g. `Service` or `ContactPoint`.
    #[serde(rename = "@type")]
    pub node_type: String,
    /// All remaining properties, passed through untouched.
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl SchemaNode {
    /// Create a node with no properties.
    #[must_use]
    pub fn new(node_type: &str) -> Self {
        Self {
            node_type: node_type.to_string(),
            properties: Map::new(),
        }
    }

    /// Attach one property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// An ordered structured-data graph as embedded in a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredGraph {
    /// Nodes in embed order.
    #[serde(rename = "@graph", default)]
    pub nodes: Vec<SchemaNode>,
}

impl StructuredGraph {
    /// Graph from a list of nodes.
    #[must_use]
    pub fn from_nodes(nodes: Vec<SchemaNode>) -> Self {
        Self { nodes }
    }

    /// Parse a graph from JSON: either a bare node array or an object with
    /// an `@graph` member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON or nodes without
    /// a `@type` tag.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(_) => Ok(Self {
                nodes: serde_json::from_value(value)?,
            }),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(Error::Serialization(format!(
                "expected a JSON array or object, got {other}"
            ))),
        }
    }

    /// Whether any node carries the given type tag.
    #[must_use]
    pub fn contains_type(&self, node_type: &str) -> bool {
        self.nodes.iter().any(|n| n.node_type == node_type)
    }
}

/// Per-role rule: which node types are allowed, forbidden, and required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixRule {
    /// Explicitly legal node types.
    pub allowed: BTreeSet<String>,
    /// Node types stripped by `clean` and reported by `validate_graph`.
    pub forbidden: BTreeSet<String>,
    /// Node types whose absence is an error.
    pub required: BTreeSet<String>,
}

impl MatrixRule {
    fn new(allowed: &[&str], forbidden: &[&str], required: &[&str]) -> Self {
        let to_set = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect();
        Self {
            allowed: to_set(allowed),
            forbidden: to_set(forbidden),
            required: to_set(required),
        }
    }
}

/// Result of cleaning a graph against a role's rule.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutcome {
    /// The graph with forbidden-typed nodes stripped.
    pub graph: StructuredGraph,
    /// Hard problems: required node types absent. The page is still
    /// produced; callers flag it for follow-up.
    pub errors: Vec<String>,
    /// Non-blocking problems: node types neither allowed nor forbidden.
    pub warnings: Vec<String>,
}

/// Result of read-only graph validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Forbidden node types present, or required types absent.
    pub errors: Vec<String>,
    /// Node types neither allowed nor forbidden.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether the graph passed with no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Commercial node types banned wherever a page must stay informational.
const COMMERCIAL_TYPES: &[&str] = &[
    "Offer",
    "Review",
    "AggregateRating",
    "Product",
    "Event",
    "SoftwareApplication",
    "HowTo",
    "Course",
];

/// Structural node types legal on every rendered page.
const STRUCTURAL_TYPES: &[&str] = &["WebPage", "WebSite", "BreadcrumbList", "Organization", "ImageObject"];

/// The master schema matrix: one rule per page role.
#[derive(Debug, Clone)]
pub struct SchemaMatrix {
    rules: BTreeMap<PageRole, MatrixRule>,
}

impl SchemaMatrix {
    /// The built-in rule table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a role lists a node type as both
    /// forbidden and required (cannot happen for the unmodified built-ins;
    /// the check guards the same invariant for custom tables and edits).
    pub fn builtin() -> Result<Self> {
        let with_structural = |extra: &[&str]| -> Vec<String> {
            STRUCTURAL_TYPES
                .iter()
                .chain(extra.iter())
                .map(|s| (*s).to_string())
                .collect()
        };
        let rule = |extra: &[&str], forbidden: &[&str], required: &[&str]| {
            let allowed = with_structural(extra);
            let allowed_refs: Vec<&str> = allowed.iter().map(String::as_str).collect();
            MatrixRule::new(&allowed_refs, forbidden, required)
        };

        let mut rules = BTreeMap::new();
        rules.insert(
            PageRole::Home,
            rule(&["LocalBusiness", "SearchAction"], &[], &["WebSite", "Organization"]),
        );
        rules.insert(
            PageRole::Service,
            rule(
                &["Service", "Offer", "OfferCatalog", "FAQPage"],
                &["Review", "AggregateRating"],
                &["Service"],
            ),
        );
        rules.insert(
            PageRole::ServiceCity,
            rule(
                &[
                    "Service",
                    "Offer",
                    "FAQPage",
                    "LocalBusiness",
                    "PostalAddress",
                    "GeoCoordinates",
                ],
                &["Review", "AggregateRating", "Product", "Event"],
                &["Service"],
            ),
        );
        rules.insert(
            PageRole::ServiceState,
            rule(
                &["Service", "Offer", "FAQPage", "LocalBusiness"],
                &["Review", "AggregateRating", "Product", "Event"],
                &["Service"],
            ),
        );
        rules.insert(
            PageRole::Authority,
            rule(&["Article", "Person", "AboutPage", "FAQPage"], COMMERCIAL_TYPES, &[]),
        );
        rules.insert(
            PageRole::Contact,
            rule(
                &["ContactPage", "ContactPoint", "PostalAddress"],
                COMMERCIAL_TYPES,
                &["ContactPoint"],
            ),
        );
        rules.insert(PageRole::Hybrid, rule(&["Service", "FAQPage", "Article"], &[], &[]));
        rules.insert(PageRole::Other, rule(&[], &[], &[]));

        Self::from_rules(rules)
    }

    /// Build a matrix from an explicit rule table, checking the load-time
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any role's forbidden and required sets
    /// intersect, or if a role has no rule.
    pub fn from_rules(rules: BTreeMap<PageRole, MatrixRule>) -> Result<Self> {
        for role in PageRole::all() {
            let rule = rules.get(&role).ok_or_else(|| {
                Error::Config(format!("schema matrix has no rule for role '{role}'"))
            })?;
            let contradiction: Vec<&String> =
                rule.forbidden.intersection(&rule.required).collect();
            if !contradiction.is_empty() {
                return Err(Error::Config(format!(
                    "schema matrix rule for role '{role}' both forbids and requires {contradiction:?}"
                )));
            }
        }
        Ok(Self { rules })
    }

    /// The rule for a role. Every role has one; `from_rules` guarantees it.
    #[must_use]
    pub fn rule(&self, role: PageRole) -> &MatrixRule {
        &self.rules[&role]
    }

    /// Clean a draft graph against a role: strip forbidden-typed nodes,
    /// then report required-type absences as errors and unknown types as
    /// warnings.
    ///
    /// Never fails: a graph (possibly emptied) always comes back, and the
    /// caller decides what to do with the diagnostics.
    #[must_use]
    pub fn clean(&self, graph: StructuredGraph, role: PageRole) -> CleanOutcome {
        let rule = self.rule(role);

        let mut kept = Vec::with_capacity(graph.nodes.len());
        let mut stripped = 0usize;
        for node in graph.nodes {
            if rule.forbidden.contains(&node.node_type) {
                debug!(node_type = %node.node_type, %role, "stripping forbidden node");
                stripped += 1;
            } else {
                kept.push(node);
            }
        }
        if stripped > 0 {
            debug!(stripped, %role, "stripped forbidden nodes from graph");
        }

        let cleaned = StructuredGraph { nodes: kept };
        let (errors, warnings) = evaluate(rule, &cleaned, role);
        CleanOutcome {
            graph: cleaned,
            errors,
            warnings,
        }
    }

    /// Read-only audit of a graph against a role, driven by the same rule
    /// table as [`Self::clean`]. Forbidden node types present in the graph
    /// are errors here, since generation would have stripped them.
    #[must_use]
    pub fn validate_graph(&self, graph: &StructuredGraph, role: PageRole) -> ValidationReport {
        let rule = self.rule(role);
        let (mut errors, warnings) = evaluate(rule, graph, role);
        for node in &graph.nodes {
            if rule.forbidden.contains(&node.node_type) {
                errors.push(format!(
                    "node type '{}' is forbidden for role '{role}'",
                    node.node_type
                ));
            }
        }
        ValidationReport { errors, warnings }
    }
}

/// Shared membership evaluation: required-absent errors and
/// unknown-type warnings for one graph under one rule.
fn evaluate(rule: &MatrixRule, graph: &StructuredGraph, role: PageRole) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    for required in &rule.required {
        if !graph.contains_type(required) {
            errors.push(format!(
                "required node type '{required}' is missing for role '{role}'"
            ));
        }
    }

    let mut warned: BTreeSet<&str> = BTreeSet::new();
    let mut warnings = Vec::new();
    for node in &graph.nodes {
        let node_type = node.node_type.as_str();
        if !rule.allowed.contains(node_type)
            && !rule.forbidden.contains(node_type)
            && warned.insert(node_type)
        {
            warnings.push(format!(
                "node type '{node_type}' is neither allowed nor forbidden for role '{role}'"
            ));
        }
    }

    (errors, warnings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft_commercial_graph() -> StructuredGraph {
        StructuredGraph::from_nodes(vec![
            SchemaNode::new("WebPage").with_property("@id", "#page"),
            SchemaNode::new("Offer").with_property("price", "4999"),
            SchemaNode::new("Review").with_property("reviewRating", 5),
            SchemaNode::new("AggregateRating").with_property("ratingValue", 4.9),
            SchemaNode::new("Product"),
            SchemaNode::new("Event"),
            SchemaNode::new("SoftwareApplication"),
            SchemaNode::new("HowTo"),
            SchemaNode::new("Course"),
            SchemaNode::new("Article").with_property("headline", "Guide"),
        ])
    }

    #[test]
    fn test_authority_pages_never_keep_commercial_nodes() {
        let matrix = SchemaMatrix::builtin().unwrap();
        let outcome = matrix.clean(draft_commercial_graph(), PageRole::Authority);

        for banned in COMMERCIAL_TYPES {
            assert!(
                !outcome.graph.contains_type(banned),
                "{banned} survived cleaning on an authority page"
            );
        }
        // The informational nodes survive.
        assert!(outcome.graph.contains_type("WebPage"));
        assert!(outcome.graph.contains_type("Article"));
    }

    #[test]
    fn test_contact_requires_contact_point() {
        let matrix = SchemaMatrix::builtin().unwrap();
        let graph = StructuredGraph::from_nodes(vec![SchemaNode::new("WebPage")]);
        let outcome = matrix.clean(graph, PageRole::Contact);
        assert!(
            outcome.errors.iter().any(|e| e.contains("ContactPoint")),
            "missing ContactPoint should be an error: {:?}",
            outcome.errors
        );

        let graph = StructuredGraph::from_nodes(vec![
            SchemaNode::new("WebPage"),
            SchemaNode::new("ContactPoint").with_property("telephone", "+1-555-0100"),
        ]);
        let outcome = matrix.clean(graph, PageRole::Contact);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_unknown_types_warn_but_survive() {
        let matrix = SchemaMatrix::builtin().unwrap();
        let graph = StructuredGraph::from_nodes(vec![
            SchemaNode::new("Service"),
            SchemaNode::new("VideoObject"),
        ]);
        let outcome = matrix.clean(graph, PageRole::Service);
        assert!(outcome.graph.contains_type("VideoObject"));
        assert!(
            outcome.warnings.iter().any(|w| w.contains("VideoObject")),
            "unexpected-but-not-forbidden types warn: {:?}",
            outcome.warnings
        );
    }

    #[test]
    fn test_clean_and_validate_agree() {
        let matrix = SchemaMatrix::builtin().unwrap();
        let graph = draft_commercial_graph();

        let report = matrix.validate_graph(&graph, PageRole::Authority);
        assert!(!report.is_clean());

        let outcome = matrix.clean(graph, PageRole::Authority);
        let recheck = matrix.validate_graph(&outcome.graph, PageRole::Authority);
        // After cleaning, validation finds no forbidden nodes.
        assert!(recheck.errors.is_empty(), "{:?}", recheck.errors);
    }

    #[test]
    fn test_contradictory_rule_fails_at_load() {
        let mut rules = BTreeMap::new();
        for role in PageRole::all() {
            rules.insert(role, MatrixRule::default());
        }
        rules.insert(
            PageRole::Contact,
            MatrixRule::new(&[], &["ContactPoint"], &["ContactPoint"]),
        );
        let err = SchemaMatrix::from_rules(rules).unwrap_err();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("contact"));
    }

    #[test]
    fn test_missing_role_rule_fails_at_load() {
        let mut rules = BTreeMap::new();
        rules.insert(PageRole::Home, MatrixRule::default());
        let err = SchemaMatrix::from_rules(rules).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_graph_json_round_trip() {
        let graph = StructuredGraph::from_nodes(vec![
            SchemaNode::new("Service").with_property("name", "AI Consulting"),
        ]);
        let json = serde_json::to_string(&graph).unwrap();
        assert!(json.contains("\"@type\":\"Service\""));
        let back = StructuredGraph::from_json_str(&json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn test_graph_accepts_bare_node_array() {
        let graph =
            StructuredGraph::from_json_str(r#"[{"@type": "WebPage"}, {"@type": "Offer"}]"#)
                .unwrap();
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_graph_rejects_scalars() {
        let err = StructuredGraph::from_json_str("42").unwrap_err();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn test_clean_preserves_node_order() {
        let matrix = SchemaMatrix::builtin().unwrap();
        let graph = StructuredGraph::from_nodes(vec![
            SchemaNode::new("WebPage"),
            SchemaNode::new("Offer"),
            SchemaNode::new("Service"),
            SchemaNode::new("FAQPage"),
        ]);
        let outcome = matrix.clean(graph, PageRole::Service);
        let types: Vec<&str> = outcome
            .graph
            .nodes
            .iter()
            .map(|n| n.node_type.as_str())
            .collect();
        assert_eq!(types, vec!["WebPage", "Offer", "Service", "FAQPage"]);
    }
}
