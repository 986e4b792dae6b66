//! `pagegen audit` - batch checks over every deployed combination.
//!
//! These are the byte-identity, uniqueness, and word-band audits the core's
//! purity guarantees promise. Each walks the full service x locality grid
//! through the same public API the serving layer uses and exits non-zero
//! when the property does not hold.

use std::collections::HashMap;

use anyhow::bail;
use pagegen_core::{CanonicalIdentity, ComposedPage};
use tracing::info;

use crate::commands::Site;

fn each_combination(site: &Site) -> Vec<(String, String, CanonicalIdentity)> {
    let mut combos = Vec::new();
    for service in site.registry.services() {
        for locality in site.registry.localities() {
            let identity = site
                .normalizer
                .normalize(&format!("/services/{}/{}/", service.slug, locality.slug));
            combos.push((service.slug.clone(), locality.slug.clone(), identity));
        }
    }
    combos
}

/// Re-compose every page `rounds` times and verify byte-identical output.
pub fn determinism(site: &Site, rounds: usize) -> anyhow::Result<()> {
    let composer = site.composer();
    let combos = each_combination(site);
    let mut drifted = Vec::new();

    for (service, locality, identity) in &combos {
        let first = composer.compose(service, locality, identity);
        for round in 1..rounds.max(1) {
            let again = composer.compose(service, locality, identity);
            if again != first {
                drifted.push(format!("{service} x {locality} (round {round})"));
                break;
            }
        }
    }

    if drifted.is_empty() {
        info!(pages = combos.len(), rounds, "determinism audit passed");
        println!(
            "determinism: OK ({} pages x {} rounds, all byte-identical)",
            combos.len(),
            rounds
        );
        Ok(())
    } else {
        for page in &drifted {
            eprintln!("drift: {page}");
        }
        bail!("determinism audit failed for {} page(s)", drifted.len());
    }
}

/// Check that `intro` and `locals` are distinct across all combinations.
pub fn uniqueness(site: &Site) -> anyhow::Result<()> {
    let composer = site.composer();
    let combos = each_combination(site);
    let mut failures = 0usize;

    for section in ["intro", "locals"] {
        let mut seen: HashMap<String, String> = HashMap::new();
        for (service, locality, identity) in &combos {
            let page: ComposedPage = composer.compose(service, locality, identity);
            let Some(text) = page.section(section) else {
                continue;
            };
            let combo = format!("{service} x {locality}");
            if let Some(previous) = seen.insert(text.to_string(), combo.clone()) {
                eprintln!("duplicate {section}: {previous} == {combo}");
                failures += 1;
            }
        }
    }

    if failures == 0 {
        println!("uniqueness: OK ({} pages, intro and locals all distinct)", combos.len());
        Ok(())
    } else {
        bail!("uniqueness audit found {failures} duplicate section(s)");
    }
}

/// Check that every page's word count lies inside the configured band.
pub fn words(site: &Site) -> anyhow::Result<()> {
    let composer = site.composer();
    let combos = each_combination(site);
    let (min, max) = (site.config.content.min_words, site.config.content.max_words);
    let mut out_of_band = 0usize;

    for (service, locality, identity) in &combos {
        let page = composer.compose(service, locality, identity);
        if page.word_count < min || page.word_count > max {
            eprintln!(
                "out of band: {service} x {locality} has {} words (band [{min}, {max}])",
                page.word_count
            );
            out_of_band += 1;
        }
    }

    if out_of_band == 0 {
        println!(
            "words: OK ({} pages inside [{min}, {max}])",
            combos.len()
        );
        Ok(())
    } else {
        bail!("word-count audit found {out_of_band} page(s) outside the band");
    }
}
