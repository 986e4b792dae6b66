//! Canonical key normalization.
//!
//! Every page is addressed by exactly one canonical identity: a normalized
//! absolute URL with the site's declared scheme and host, a lowercased path,
//! collapsed slashes, no query or fragment, and a single trailing slash.
//! The identity is the sole seed source for content selection, so the
//! routing layer and any batch tooling must derive it the same way —
//! [`Normalizer::normalize`] is that single way.
//!
//! Normalization is total and fail-open: malformed input is never rejected.
//! Unrecognized segments pass through unchanged so downstream components can
//! apply their own defaults.

use serde::{Deserialize, Serialize};
use url::Url;

/// The single normalized address string used as the sole seed source for a
/// page.
///
/// Construct via [`Normalizer::normalize`]; the invariant that the inner
/// string is fully normalized is what makes seed derivation reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalIdentity(String);

impl CanonicalIdentity {
    /// Wrap a string that is already in canonical form.
    ///
    /// Intended for callers that persisted an identity produced by
    /// [`Normalizer::normalize`] earlier. Wrapping a non-normalized string
    /// breaks the determinism contract.
    #[must_use]
    pub fn from_normalized(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// The canonical identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path component of the identity (always starts with `/`).
    #[must_use]
    pub fn path(&self) -> &str {
        self.0
            .find("://")
            .and_then(|scheme_end| {
                let after = &self.0[scheme_end + 3..];
                after.find('/').map(|slash| &after[slash..])
            })
            .unwrap_or("/")
    }

    /// Path segments of the identity, empty for the root page.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.path().split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl std::fmt::Display for CanonicalIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content addressing key parsed from the fixed path grammar
/// `/services/<service-slug>/<locality-slug>/`.
///
/// Partial paths yield partial keys: `/services/ai-consulting/` has a
/// service but no locality, and a path outside the grammar has neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentKey {
    /// Service slug, when the path names one.
    pub service: Option<String>,
    /// Locality slug, when the path names one.
    pub locality: Option<String>,
}

impl ContentKey {
    /// Parse the content key out of a canonical identity.
    #[must_use]
    pub fn parse(identity: &CanonicalIdentity) -> Self {
        let segments = identity.segments();
        if segments.first() == Some(&"services") {
            Self {
                service: segments.get(1).map(|s| (*s).to_string()),
                locality: segments.get(2).map(|s| (*s).to_string()),
            }
        } else {
            Self {
                service: None,
                locality: None,
            }
        }
    }
}

/// Normalizes arbitrary requested paths into canonical identities for one
/// site.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// `scheme://host` with no trailing slash.
    base: String,
}

impl Normalizer {
    /// Create a normalizer for the given base URL.
    ///
    /// The base fixes the scheme and host of every canonical identity.
    /// Fail-open: an unparseable base is used as-is after trimming any
    /// trailing slashes and lowercasing.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = Url::parse(base_url).ok().and_then(|url| {
            url.host_str().map(|host| match url.port() {
                Some(port) => format!("{}://{host}:{port}", url.scheme()),
                None => format!("{}://{host}", url.scheme()),
            })
        });
        let base =
            base.unwrap_or_else(|| base_url.trim_end_matches('/').to_ascii_lowercase());
        Self { base }
    }

    /// Turn an arbitrary requested path into the one canonical identity.
    ///
    /// Rules applied in order: lowercase the path, collapse repeated
    /// slashes, strip query parameters and fragments, enforce exactly one
    /// trailing slash (root excepted), and fix scheme+host to the site's
    /// declared base. Idempotent: `normalize(normalize(x)) == normalize(x)`.
    #[must_use]
    pub fn normalize(&self, raw_path: &str) -> CanonicalIdentity {
        let without_fragment = raw_path.split('#').next().unwrap_or("");
        let without_query = without_fragment.split('?').next().unwrap_or("");

        let path = extract_path(without_query);
        let mut canonical = String::with_capacity(path.len() + 1);
        canonical.push('/');
        let mut previous_slash = true;
        for c in path.chars() {
            let c = c.to_ascii_lowercase();
            if c == '/' {
                if !previous_slash {
                    canonical.push('/');
                }
                previous_slash = true;
            } else {
                canonical.push(c);
                previous_slash = false;
            }
        }
        if canonical != "/" && !canonical.ends_with('/') {
            canonical.push('/');
        }

        CanonicalIdentity(format!("{}{canonical}", self.base))
    }
}

/// Pull the path out of a raw request string that may be a bare path or a
/// full URL. Fail-open: anything that does not look like a URL is treated
/// as a path, including bare paths whose text happens to contain `://`.
fn extract_path(raw: &str) -> &str {
    match raw.find("://") {
        Some(scheme_end) if is_scheme(&raw[..scheme_end]) => {
            let after = &raw[scheme_end + 3..];
            after.find('/').map_or("/", |slash| &after[slash..])
        },
        _ => raw,
    }
}

/// Whether a prefix before `://` is scheme-shaped: a letter followed by
/// letters, digits, `+`, `-`, or `.` (RFC 3986 syntax). A prefix containing
/// `/` is part of a path, not a scheme.
fn is_scheme(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> Normalizer {
        Normalizer::new("https://example.com")
    }

    #[test]
    fn test_normalize_worked_example() {
        let identity = normalizer().normalize("/Services//AI-Consulting//Dallas-TX/?utm_source=x");
        assert_eq!(
            identity.as_str(),
            "https://example.com/services/ai-consulting/dallas-tx/"
        );
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalizer().normalize("/").as_str(), "https://example.com/");
        assert_eq!(normalizer().normalize("").as_str(), "https://example.com/");
    }

    #[test]
    fn test_normalize_adds_trailing_slash() {
        assert_eq!(
            normalizer().normalize("/contact").as_str(),
            "https://example.com/contact/"
        );
    }

    #[test]
    fn test_normalize_strips_fragment() {
        assert_eq!(
            normalizer().normalize("/about/#team").as_str(),
            "https://example.com/about/"
        );
    }

    #[test]
    fn test_normalize_rehomes_foreign_host() {
        let identity = normalizer().normalize("http://other.example.org/Services/SEO/");
        assert_eq!(identity.as_str(), "https://example.com/services/seo/");
    }

    #[test]
    fn test_normalize_keeps_unrecognized_segments() {
        // Fail-open: nothing about the segment content is validated.
        let identity = normalizer().normalize("/weird..segment/%41bc/");
        assert_eq!(
            identity.as_str(),
            "https://example.com/weird..segment/%41bc/"
        );
    }

    #[test]
    fn test_bare_path_containing_url_text_keeps_its_segments() {
        // Fail-open: a path segment that happens to contain `://` is not a
        // URL, so the request is not rehomed to the root.
        let identity = normalizer().normalize("/redirect/a://b/");
        assert_eq!(identity.as_str(), "https://example.com/redirect/a:/b/");
        assert_eq!(
            normalizer().normalize(identity.as_str()),
            identity,
            "re-normalizing must not reinterpret the path"
        );
    }

    #[test]
    fn test_scheme_shapes() {
        assert!(is_scheme("https"));
        assert!(is_scheme("a"));
        assert!(is_scheme("coap+tcp"));
        assert!(!is_scheme(""));
        assert!(!is_scheme("/redirect/a"));
        assert!(!is_scheme("1http"));
    }

    #[test]
    fn test_identity_path_and_segments() {
        let identity = normalizer().normalize("/services/ai-consulting/dallas-tx/");
        assert_eq!(identity.path(), "/services/ai-consulting/dallas-tx/");
        assert_eq!(
            identity.segments(),
            vec!["services", "ai-consulting", "dallas-tx"]
        );
    }

    #[test]
    fn test_content_key_full_grammar() {
        let identity = normalizer().normalize("/services/ai-consulting/dallas-tx/");
        let key = ContentKey::parse(&identity);
        assert_eq!(key.service.as_deref(), Some("ai-consulting"));
        assert_eq!(key.locality.as_deref(), Some("dallas-tx"));
    }

    #[test]
    fn test_content_key_partial_and_foreign_paths() {
        let service_only = ContentKey::parse(&normalizer().normalize("/services/agentic-seo/"));
        assert_eq!(service_only.service.as_deref(), Some("agentic-seo"));
        assert_eq!(service_only.locality, None);

        let foreign = ContentKey::parse(&normalizer().normalize("/blog/some-post/"));
        assert_eq!(foreign.service, None);
        assert_eq!(foreign.locality, None);
    }

    #[test]
    fn test_base_url_with_port_and_trailing_slash() {
        let normalizer = Normalizer::new("http://localhost:8080/");
        assert_eq!(
            normalizer.normalize("/Contact").as_str(),
            "http://localhost:8080/contact/"
        );
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(raw in r".{0,120}") {
            let normalizer = normalizer();
            let once = normalizer.normalize(&raw);
            let twice = normalizer.normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_normalize_is_total_and_well_formed(raw in r".{0,120}") {
            let identity = normalizer().normalize(&raw);
            prop_assert!(identity.as_str().starts_with("https://example.com/"));
            prop_assert!(!identity.as_str().contains('?'));
            prop_assert!(!identity.as_str().contains('#'));
            prop_assert!(!identity.path().contains("//"));
        }
    }
}
