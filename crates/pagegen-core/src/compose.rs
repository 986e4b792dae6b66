//! The content composer.
//!
//! `compose` turns a (service, locality, canonical identity) triple into a
//! [`ComposedPage`]: every section is assembled from independently seeded
//! slots, facet placeholders are substituted from registry facts, and the
//! total free-text word count is corrected into the configured band by
//! appending seeded filler — never by truncating mid-sentence.
//!
//! Composition is a pure function of its inputs over frozen configuration.
//! The same key yields byte-identical output on every call, in every
//! process; nothing here reads a clock, a random number generator, or any
//! mutable state.

use tracing::warn;

use crate::canonical::CanonicalIdentity;
use crate::config::ContentConfig;
use crate::pool::PoolRegistry;
use crate::registry::{Locality, Registry, Service};
use crate::seed::{pick, section_seed, slot_seed};
use crate::types::{ComposedPage, Section, SectionKind};

/// Items taken from the benefits pool per page.
const LIST_ITEM_COUNT: usize = 4;

/// Facet facts substituted into fragment templates.
struct Facts {
    service_name: String,
    blurb: String,
    city: String,
    state: String,
    landmark: String,
    metro: String,
    industries: String,
}

impl Facts {
    fn resolve(
        registry: &Registry,
        service_slug: &str,
        locality_slug: &str,
    ) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();

        let (service_name, blurb) = match registry.service(service_slug) {
            Some(Service { name, blurb, .. }) => (name.clone(), blurb.clone()),
            None => {
                warn!(slug = service_slug, "unknown service slug, using generic service pool facts");
                warnings.push(format!(
                    "unknown service '{service_slug}': generic copy substituted"
                ));
                (
                    humanize(service_slug),
                    "practical, measurable improvements delivered by a senior team".to_string(),
                )
            },
        };

        let (city, state, landmark, metro, industries) = match registry.locality(locality_slug) {
            Some(locality) => (
                locality.name.clone(),
                locality.state.clone(),
                locality.landmark.clone(),
                locality.metro.clone(),
                locality.industries_phrase(),
            ),
            None => {
                warn!(slug = locality_slug, "unknown locality slug, using generic locality facts");
                warnings.push(format!(
                    "unknown locality '{locality_slug}': generic copy substituted"
                ));
                let (city, state) = split_city_state(locality_slug);
                (
                    city,
                    state,
                    "the city center".to_string(),
                    "the surrounding region".to_string(),
                    Locality::new(locality_slug, "", "", "", "").industries_phrase(),
                )
            },
        };

        (
            Self {
                service_name,
                blurb,
                city,
                state,
                landmark,
                metro,
                industries,
            },
            warnings,
        )
    }

    fn render(&self, template: &str) -> String {
        template
            .replace("{service}", &self.service_name)
            .replace("{blurb}", &self.blurb)
            .replace("{city}", &self.city)
            .replace("{state}", &self.state)
            .replace("{landmark}", &self.landmark)
            .replace("{metro}", &self.metro)
            .replace("{industries}", &self.industries)
    }
}

/// Turn a kebab-case slug into a display phrase ("ai-consulting" → "Ai Consulting").
fn humanize(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best-effort display split for an unknown `<city>-<st>` slug. Falls back
/// to the humanized whole slug and a generic region phrase.
fn split_city_state(slug: &str) -> (String, String) {
    match slug.rsplit_once('-') {
        Some((city, state))
            if !city.is_empty()
                && state.len() == 2
                && state.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            (humanize(city), state.to_ascii_uppercase())
        },
        _ => (humanize(slug), "the region".to_string()),
    }
}

/// Assembles pages from frozen registry and pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    registry: &'a Registry,
    pools: &'a PoolRegistry,
    min_words: usize,
    max_words: usize,
}

impl<'a> Composer<'a> {
    /// Create a composer over frozen configuration.
    #[must_use]
    pub fn new(registry: &'a Registry, pools: &'a PoolRegistry, content: &ContentConfig) -> Self {
        Self {
            registry,
            pools,
            min_words: content.min_words,
            max_words: content.max_words,
        }
    }

    /// Compose the page for one service × locality combination.
    ///
    /// Total: unknown slugs fall back to generic facts with a warning on
    /// the page; composition never fails.
    #[must_use]
    pub fn compose(
        &self,
        service_slug: &str,
        locality_slug: &str,
        identity: &CanonicalIdentity,
    ) -> ComposedPage {
        let (facts, mut warnings) = Facts::resolve(self.registry, service_slug, locality_slug);

        let mut sections: Vec<Section> = Vec::with_capacity(self.pools.sections().len() + 2);
        for spec in self.pools.sections() {
            let seed = section_seed(identity, &spec.name);
            let text = match spec.kind {
                SectionKind::Prose => {
                    let parts: Vec<String> = spec
                        .slots
                        .iter()
                        .enumerate()
                        .map(|(i, slot)| {
                            #[allow(clippy::cast_possible_truncation)]
                            let sub_seed = slot_seed(seed, i as u32);
                            facts.render(slot.get(sub_seed))
                        })
                        .collect();
                    parts.join(" ")
                },
                SectionKind::List => {
                    let pool = &spec.slots[0];
                    let start = pick(seed, pool.len());
                    (0..LIST_ITEM_COUNT.min(pool.len()))
                        .map(|offset| format!("- {}", facts.render(pool.get_wrapping(start + offset))))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            };
            sections.push(Section {
                name: spec.name.clone(),
                kind: spec.kind,
                text,
            });
        }

        // CTA comes from its own pool with its own section seed, so CTA
        // variety never correlates with intro or locality choices.
        let cta = Section {
            name: "cta".to_string(),
            kind: SectionKind::Prose,
            text: facts.render(self.pools.cta().get(section_seed(identity, "cta"))),
        };

        let base_words: usize = sections
            .iter()
            .map(Section::countable_words)
            .sum::<usize>()
            + cta.countable_words();

        if let Some(more) = self.fill_to_band(identity, &facts, base_words, &mut warnings) {
            sections.push(more);
        }
        sections.push(cta);

        let word_count = sections.iter().map(Section::countable_words).sum();
        if word_count > self.max_words {
            warn!(word_count, max = self.max_words, "composed page exceeds word-count band");
            warnings.push(format!(
                "word count {word_count} exceeds band maximum {}",
                self.max_words
            ));
        }

        ComposedPage {
            sections,
            word_count,
            warnings,
        }
    }

    /// Deterministic length correction: when the page is under the band
    /// minimum, draw seeded filler fragments (each at most once) until the
    /// minimum is met.
    fn fill_to_band(
        &self,
        identity: &CanonicalIdentity,
        facts: &Facts,
        base_words: usize,
        warnings: &mut Vec<String>,
    ) -> Option<Section> {
        if base_words >= self.min_words {
            return None;
        }

        let filler = self.pools.filler();
        let filler_seed = section_seed(identity, "filler");
        let mut used: Vec<usize> = Vec::new();
        let mut paragraphs: Vec<String> = Vec::new();
        let mut words = base_words;

        while words < self.min_words && used.len() < filler.len() {
            #[allow(clippy::cast_possible_truncation)]
            let mut index = pick(slot_seed(filler_seed, used.len() as u32), filler.len());
            while used.contains(&index) {
                index = (index + 1) % filler.len();
            }
            used.push(index);
            let paragraph = facts.render(filler.get_wrapping(index));
            words += paragraph.split_whitespace().count();
            paragraphs.push(paragraph);
        }

        if words < self.min_words {
            warn!(
                words,
                min = self.min_words,
                "filler pool exhausted before reaching the word-count band minimum"
            );
            warnings.push(format!(
                "word count {words} below band minimum {} after filler",
                self.min_words
            ));
        }

        Some(Section {
            name: "more".to_string(),
            kind: SectionKind::Prose,
            text: paragraphs.join(" "),
        })
    }
}
