//! Page role classification.
//!
//! A page's role is a coarse classification of its purpose. It governs both
//! content framing and — through the schema rule matrix — which structured
//! data node types are legal on the page. Classification is an ordered list
//! of path-pattern predicates, most specific first, with a guaranteed
//! default: it is total, side-effect-free, and trivially table-testable.

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalIdentity;

/// Coarse classification of a page's purpose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PageRole {
    /// The site root.
    Home,
    /// A service landing page without a locality (`/services/<s>/`).
    Service,
    /// A service × city combination (`/services/<s>/<city-st>/`).
    ServiceCity,
    /// A service × state combination (`/services/<s>/<state>/`).
    ServiceState,
    /// Purely informational content (about, guides, resources, blog).
    Authority,
    /// The contact page.
    Contact,
    /// Mixed-purpose pages; the guaranteed classifier default.
    Hybrid,
    /// Non-page addresses (feeds, assets, anything with a file extension).
    Other,
}

impl PageRole {
    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Service => "service",
            Self::ServiceCity => "service_city",
            Self::ServiceState => "service_state",
            Self::Authority => "authority",
            Self::Contact => "contact",
            Self::Hybrid => "hybrid",
            Self::Other => "other",
        }
    }

    /// All roles, in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 8] {
        [
            Self::Home,
            Self::Service,
            Self::ServiceCity,
            Self::ServiceState,
            Self::Authority,
            Self::Contact,
            Self::Hybrid,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for PageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PageRole {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| crate::Error::NotFound(format!("page role '{s}'")))
    }
}

/// One entry in the ordered classification table.
struct RoleRule {
    /// Short label, used in trace output.
    name: &'static str,
    role: PageRole,
    matches: fn(&[&str]) -> bool,
}

/// The classification table, most specific patterns first.
///
/// `classify` scans this top to bottom and takes the first match; the final
/// catch-all guarantees totality.
static RULES: &[RoleRule] = &[
    RoleRule {
        name: "root",
        role: PageRole::Home,
        matches: |segments| segments.is_empty(),
    },
    RoleRule {
        name: "asset-or-feed",
        role: PageRole::Other,
        matches: |segments| segments.last().is_some_and(|last| last.contains('.')),
    },
    RoleRule {
        name: "contact",
        role: PageRole::Contact,
        matches: |segments| segments.first() == Some(&"contact"),
    },
    RoleRule {
        name: "authority",
        role: PageRole::Authority,
        matches: |segments| {
            matches!(
                segments.first(),
                Some(&"about" | &"blog" | &"guides" | &"resources")
            )
        },
    },
    RoleRule {
        name: "service-city",
        role: PageRole::ServiceCity,
        matches: |segments| {
            segments.len() == 3
                && segments[0] == "services"
                && is_city_state_slug(segments[2])
        },
    },
    RoleRule {
        name: "service-state",
        role: PageRole::ServiceState,
        matches: |segments| segments.len() == 3 && segments[0] == "services",
    },
    RoleRule {
        name: "service",
        role: PageRole::Service,
        matches: |segments| segments.len() == 2 && segments[0] == "services",
    },
    RoleRule {
        name: "default",
        role: PageRole::Hybrid,
        matches: |_| true,
    },
];

/// Whether a slug looks like `<city>-<st>` with a two-letter state suffix,
/// e.g. `dallas-tx`. State-level slugs (`texas`) do not match.
fn is_city_state_slug(slug: &str) -> bool {
    slug.rsplit_once('-').is_some_and(|(city, state)| {
        !city.is_empty() && state.len() == 2 && state.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Map a canonical identity to its page role.
///
/// Total: every identity maps to exactly one role, falling back to
/// [`PageRole::Hybrid`] when no specific pattern applies.
#[must_use]
pub fn classify(identity: &CanonicalIdentity) -> PageRole {
    let segments = identity.segments();
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(&segments))
        .unwrap_or(&RULES[RULES.len() - 1]);
    tracing::debug!(identity = %identity, rule = rule.name, role = %rule.role, "classified page");
    rule.role
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::canonical::Normalizer;

    fn classify_path(path: &str) -> PageRole {
        classify(&Normalizer::new("https://example.com").normalize(path))
    }

    #[test]
    fn test_classify_table() {
        let cases = vec![
            ("/", PageRole::Home),
            ("/contact/", PageRole::Contact),
            ("/about/", PageRole::Authority),
            ("/guides/schema-basics/", PageRole::Authority),
            ("/blog/2026/03/launch/", PageRole::Authority),
            ("/services/ai-consulting/", PageRole::Service),
            ("/services/ai-consulting/dallas-tx/", PageRole::ServiceCity),
            ("/services/ai-consulting/texas/", PageRole::ServiceState),
            ("/services/", PageRole::Hybrid),
            ("/pricing/", PageRole::Hybrid),
            ("/sitemap.xml", PageRole::Other),
            ("/feed.rss", PageRole::Other),
        ];
        for (path, expected) in cases {
            assert_eq!(classify_path(path), expected, "path {path}");
        }
    }

    #[test]
    fn test_most_specific_rule_wins() {
        // Three segments under /services/ classify by locality shape, never
        // as the plain service page.
        assert_eq!(
            classify_path("/services/agentic-seo/phoenix-az/"),
            PageRole::ServiceCity
        );
        assert_eq!(
            classify_path("/services/agentic-seo/arizona/"),
            PageRole::ServiceState
        );
    }

    #[test]
    fn test_classifier_is_total() {
        for path in ["", "///", "/?q=1", "/unknown/deeply/nested/path/", "/%%%/"] {
            // Must not panic, must produce some role.
            let _ = classify_path(path);
        }
    }

    #[test]
    fn test_city_state_slug_shapes() {
        assert!(is_city_state_slug("dallas-tx"));
        assert!(is_city_state_slug("san-francisco-ca"));
        assert!(!is_city_state_slug("texas"));
        assert!(!is_city_state_slug("new-york"));
        assert!(!is_city_state_slug("-tx"));
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in PageRole::all() {
            let parsed: PageRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("shopfront".parse::<PageRole>().is_err());
    }
}
