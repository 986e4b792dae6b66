//! Registry of services and localities that parametrize page generation.
//!
//! The registry is the slug → facts table consumed by the composer and the
//! structured-data layer: service slugs map to a display name and blurb,
//! locality slugs map to known local facts (landmark, metro, industries)
//! that facet-scoped token pools interpolate. It is built once at startup —
//! from built-in defaults, optionally replaced through site configuration —
//! and only read afterwards.

use serde::{Deserialize, Serialize};

/// A service the site generates landing pages for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// kebab-case identifier, as it appears in URLs.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// One-sentence description used by intro pools.
    pub blurb: String,
}

impl Service {
    /// Create a service entry.
    #[must_use]
    pub fn new(slug: &str, name: &str, blurb: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            blurb: blurb.to_string(),
        }
    }
}

/// A locality the site generates landing pages for, with the local facts
/// that locality-scoped pools draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locality {
    /// kebab-case `<city>-<st>` identifier, as it appears in URLs.
    pub slug: String,
    /// City display name.
    pub name: String,
    /// State display name.
    pub state: String,
    /// A well-known local landmark.
    pub landmark: String,
    /// Metro-area label.
    pub metro: String,
    /// Prominent local industries, used verbatim in locality sections.
    pub industries: Vec<String>,
}

impl Locality {
    /// Create a locality entry.
    #[must_use]
    pub fn new(slug: &str, name: &str, state: &str, landmark: &str, metro: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            state: state.to_string(),
            landmark: landmark.to_string(),
            metro: metro.to_string(),
            industries: Vec::new(),
        }
    }

    /// Attach the locality's industry list.
    #[must_use]
    pub fn with_industries(mut self, industries: Vec<&str>) -> Self {
        self.industries = industries.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Industries as a readable comma list ("a, b, and c").
    #[must_use]
    pub fn industries_phrase(&self) -> String {
        match self.industries.as_slice() {
            [] => "local businesses".to_string(),
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
        }
    }
}

/// Frozen lookup table of services and localities.
#[derive(Debug, Clone)]
pub struct Registry {
    services: Vec<Service>,
    localities: Vec<Locality>,
}

impl Registry {
    /// Build a registry from explicit parts (used when site configuration
    /// supplies its own tables).
    #[must_use]
    pub fn from_parts(services: Vec<Service>, localities: Vec<Locality>) -> Self {
        Self {
            services,
            localities,
        }
    }

    /// The built-in deployed set.
    #[must_use]
    pub fn builtin() -> Self {
        let services = vec![
            Service::new(
                "ai-consulting",
                "AI Consulting",
                "hands-on AI adoption roadmaps, from pilot selection to production rollout",
            ),
            Service::new(
                "agentic-seo",
                "Agentic SEO",
                "search workflows run by supervised agents instead of monthly checklists",
            ),
            Service::new(
                "schema-optimizer",
                "Schema Optimization",
                "structured-data graphs tuned so every page states exactly what it is",
            ),
            Service::new(
                "content-audits",
                "Content Audits",
                "page-by-page reviews that find thin, duplicated, and orphaned content",
            ),
            Service::new(
                "local-seo",
                "Local SEO",
                "locality pages and listings that hold up under proximity-ranked search",
            ),
            Service::new(
                "llm-integration",
                "LLM Integration",
                "production LLM features wired into existing products with measurable guardrails",
            ),
        ];

        let localities = vec![
            Locality::new("dallas-tx", "Dallas", "Texas", "Reunion Tower", "Dallas-Fort Worth")
                .with_industries(vec!["logistics", "financial services", "healthcare"]),
            Locality::new("austin-tx", "Austin", "Texas", "the Congress Avenue Bridge", "Greater Austin")
                .with_industries(vec!["software", "semiconductors", "live events"]),
            Locality::new("phoenix-az", "Phoenix", "Arizona", "Camelback Mountain", "the Valley of the Sun")
                .with_industries(vec!["real estate", "manufacturing", "solar energy"]),
            Locality::new(
                "san-francisco-ca",
                "San Francisco",
                "California",
                "the Golden Gate Bridge",
                "the Bay Area",
            )
            .with_industries(vec!["venture-backed startups", "biotech", "fintech"]),
            Locality::new("denver-co", "Denver", "Colorado", "Union Station", "the Front Range")
                .with_industries(vec!["aerospace", "outdoor recreation", "energy"]),
            Locality::new("seattle-wa", "Seattle", "Washington", "Pike Place Market", "Puget Sound")
                .with_industries(vec!["cloud computing", "maritime trade", "retail"]),
            Locality::new("miami-fl", "Miami", "Florida", "the Venetian Causeway", "South Florida")
                .with_industries(vec!["hospitality", "international trade", "real estate"]),
            Locality::new("chicago-il", "Chicago", "Illinois", "the Riverwalk", "Chicagoland")
                .with_industries(vec!["freight", "commodities trading", "food processing"]),
        ];

        Self::from_parts(services, localities)
    }

    /// Look up a service by slug.
    #[must_use]
    pub fn service(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }

    /// Look up a locality by slug.
    #[must_use]
    pub fn locality(&self, slug: &str) -> Option<&Locality> {
        self.localities.iter().find(|l| l.slug == slug)
    }

    /// All services.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// All localities.
    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    /// Number of deployed service × locality combinations. Pool sizing is
    /// validated against this.
    #[must_use]
    pub fn combination_count(&self) -> usize {
        self.services.len() * self.localities.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let registry = Registry::builtin();

        let service = registry.service("ai-consulting").unwrap();
        assert_eq!(service.name, "AI Consulting");

        let locality = registry.locality("dallas-tx").unwrap();
        assert_eq!(locality.name, "Dallas");
        assert_eq!(locality.state, "Texas");
        assert!(!locality.industries.is_empty());

        assert!(registry.service("does-not-exist").is_none());
        assert!(registry.locality("nowhere-zz").is_none());
    }

    #[test]
    fn test_builtin_slugs_are_unique_and_kebab_case() {
        let registry = Registry::builtin();
        let mut seen = std::collections::HashSet::new();
        for slug in registry
            .services()
            .iter()
            .map(|s| &s.slug)
            .chain(registry.localities().iter().map(|l| &l.slug))
        {
            assert!(seen.insert(slug), "duplicate slug {slug}");
            assert!(!slug.contains(' '));
            assert!(!slug.chars().any(char::is_uppercase));
        }
    }

    #[test]
    fn test_combination_count() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.combination_count(),
            registry.services().len() * registry.localities().len()
        );
    }

    #[test]
    fn test_industries_phrase_shapes() {
        let base = Locality::new("x-yz", "X", "Y", "L", "M");
        assert_eq!(base.clone().industries_phrase(), "local businesses");
        assert_eq!(
            base.clone().with_industries(vec!["a"]).industries_phrase(),
            "a"
        );
        assert_eq!(
            base.clone()
                .with_industries(vec!["a", "b"])
                .industries_phrase(),
            "a and b"
        );
        assert_eq!(
            base.with_industries(vec!["a", "b", "c"]).industries_phrase(),
            "a, b, and c"
        );
    }
}
