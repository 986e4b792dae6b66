//! Token pools and the frozen pool registry.
//!
//! A token pool is a named, immutable, ordered collection of interchangeable
//! text fragments for one content slot. Sections are split into several
//! independently seeded slots so the effective combination space is the
//! product of per-slot pool sizes: three slots of six fragments give 216
//! variants per section from eighteen authored fragments, and independent
//! sections multiply again. That product is what keeps near-duplicate pages
//! negligible without authoring pools proportional to the number of deployed
//! service × locality combinations.
//!
//! Fragments are templates. `{service}`, `{blurb}`, `{city}`, `{state}`,
//! `{landmark}`, `{metro}`, and `{industries}` are substituted by the
//! composer from registry facts, which guarantees lexical divergence between
//! same-service-different-locality pages by construction rather than by
//! chance.
//!
//! The registry is built once at startup, validated, and never mutated.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::seed::pick;
use crate::types::SectionKind;
use crate::{Error, Result};

/// A named, immutable, ordered collection of fragments for one slot.
#[derive(Debug, Clone)]
pub struct TokenPool {
    name: String,
    fragments: Vec<String>,
}

impl TokenPool {
    /// Create a pool from static fragment text.
    #[must_use]
    pub fn new(name: &str, fragments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fragments: fragments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Pool name, `<section>.<slot>` by convention.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the pool has no fragments. Registry validation rejects this.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Select the fragment for a seed.
    #[must_use]
    pub fn get(&self, seed: u64) -> &str {
        &self.fragments[pick(seed, self.fragments.len())]
    }

    /// Fragment at a fixed index, wrapping. Used by list sections that take
    /// several consecutive items.
    #[must_use]
    pub fn get_wrapping(&self, index: usize) -> &str {
        &self.fragments[index % self.fragments.len()]
    }

    fn extend_from(&mut self, extra: &[String]) {
        self.fragments.extend(extra.iter().cloned());
    }
}

/// One section's slot layout: name, accounting kind, and its ordered slots.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    /// Section name as it appears on the composed page.
    pub name: String,
    /// Word-count accounting kind.
    pub kind: SectionKind,
    /// Independently seeded slots, composed in order.
    pub slots: Vec<TokenPool>,
}

/// Configuration-supplied pool extension: extra fragments appended to one
/// slot of one section (or to the `cta`/`filler` pools).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolExtension {
    /// Section name, or `cta` / `filler`.
    pub section: String,
    /// Slot index within the section. Ignored for `cta`/`filler`.
    #[serde(default)]
    pub slot: usize,
    /// Fragments to append.
    pub fragments: Vec<String>,
}

/// The frozen set of token pools for the whole site.
#[derive(Debug, Clone)]
pub struct PoolRegistry {
    sections: Vec<SectionSpec>,
    cta: TokenPool,
    filler: TokenPool,
}

impl PoolRegistry {
    /// Build the built-in pool set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any pool would be empty (cannot happen
    /// for the unmodified built-ins; the check guards future edits).
    pub fn builtin() -> Result<Self> {
        Self::with_extensions(&[])
    }

    /// Build the built-in pool set with configuration-supplied extensions
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unknown section name, an
    /// out-of-range slot index, or an empty pool after extension.
    pub fn with_extensions(extensions: &[PoolExtension]) -> Result<Self> {
        let mut registry = Self {
            sections: builtin_sections(),
            cta: builtin_cta(),
            filler: builtin_filler(),
        };

        for ext in extensions {
            match ext.section.as_str() {
                "cta" => registry.cta.extend_from(&ext.fragments),
                "filler" => registry.filler.extend_from(&ext.fragments),
                name => {
                    let section = registry
                        .sections
                        .iter_mut()
                        .find(|s| s.name == name)
                        .ok_or_else(|| {
                            Error::Config(format!("pool extension names unknown section '{name}'"))
                        })?;
                    let slot_count = section.slots.len();
                    let slot = section.slots.get_mut(ext.slot).ok_or_else(|| {
                        Error::Config(format!(
                            "pool extension for section '{name}' names slot {} but the section has {slot_count} slots",
                            ext.slot
                        ))
                    })?;
                    slot.extend_from(&ext.fragments);
                },
            }
        }

        registry.validate()?;
        Ok(registry)
    }

    /// Sections in render order. The CTA is not listed here; it is composed
    /// from its own decoupled pool.
    #[must_use]
    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    /// The call-to-action pool, decoupled from all section pools.
    #[must_use]
    pub fn cta(&self) -> &TokenPool {
        &self.cta
    }

    /// The filler pool used for deterministic length correction.
    #[must_use]
    pub fn filler(&self) -> &TokenPool {
        &self.filler
    }

    /// Saturating product of all slot pool sizes: the number of distinct
    /// template combinations before facet substitution.
    #[must_use]
    pub fn combination_capacity(&self) -> u128 {
        let mut capacity: u128 = 1;
        for pool in self
            .sections
            .iter()
            .flat_map(|s| s.slots.iter())
            .chain([&self.cta])
        {
            capacity = capacity.saturating_mul(pool.len() as u128);
        }
        capacity
    }

    /// Check pool sizing against the deployed combination count.
    ///
    /// Collision avoidance needs the combination capacity to exceed the
    /// deployed count by a comfortable margin (birthday bound: expected
    /// collisions ~ N²/2P). Thin margins are logged loudly but are not
    /// fatal; sizing is a deployment concern, not a correctness one.
    pub fn check_scale(&self, combinations: usize, margin: u32) {
        let capacity = self.combination_capacity();
        let needed = (combinations as u128).saturating_mul(u128::from(margin));
        if capacity < needed {
            warn!(
                capacity,
                combinations,
                margin,
                "token pool capacity is below the configured collision margin; author more fragments"
            );
        } else {
            debug!(capacity, combinations, "token pool capacity check passed");
        }
    }

    fn validate(&self) -> Result<()> {
        for pool in self
            .sections
            .iter()
            .flat_map(|s| s.slots.iter())
            .chain([&self.cta, &self.filler])
        {
            if pool.is_empty() {
                return Err(Error::Config(format!("token pool '{}' is empty", pool.name())));
            }
        }
        Ok(())
    }
}

fn builtin_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            name: "intro".to_string(),
            kind: SectionKind::Prose,
            slots: vec![
                TokenPool::new("intro.opening", &[
                    "Finding a {service} partner in {city} usually means choosing between national firms that never visit {state} and generalists who treat every engagement the same. Teams across {metro} keep telling us the same thing: they want {blurb}.",
                    "{city} businesses looking into {service} tend to arrive with the same question: what would this actually change in the next two quarters? Our answer is specific, because we deliver {blurb} rather than slideware.",
                    "We bring {service} to {city} the way it should be delivered: {blurb}, scoped against the realities of operating in {state} rather than against a generic playbook.",
                    "When a {city} company searches for {service}, it is rarely curiosity. Something concrete is stuck. This page explains how we unstick it, with {blurb} as the working method.",
                    "Our {service} practice serves {city} and the wider {metro} market with one promise: {blurb}, delivered by people who will know your name and your numbers.",
                    "There is no shortage of {service} advice aimed at {city} companies. What is scarce is execution, which is why our engagements center on {blurb} instead of another strategy deck.",
                ]),
                TokenPool::new("intro.differentiator", &[
                    "We keep engagements small on purpose. A senior lead stays on your account from the first workshop to the last handoff, so context never gets lost between a sales team and a delivery team.",
                    "Every recommendation we make ships with the evidence behind it. If we cannot show the data that motivated a change, the change does not go on the roadmap.",
                    "We work in two-week increments with a written deliverable at the end of each one, so you can stop at any point and still hold something complete.",
                    "Instead of long discovery phases, we start with the narrowest slice of work that can prove value, then widen only when the numbers say we should.",
                    "Our team has operated inside businesses like yours, not just advised them, which changes what we notice and what we refuse to recommend.",
                    "We put every assumption in writing before work begins, and we revisit that document together at each milestone, so there is never a quiet drift between what you expected and what we built.",
                ]),
                TokenPool::new("intro.closing", &[
                    "The rest of this page walks through what that looks like in practice, what it costs to get started, and the questions {state} clients ask us most often.",
                    "Below you will find the way we scope work, the benefits clients in {metro} report most often, and answers to the questions we hear in every first call.",
                    "Read on for the specifics: how engagements are structured, what local clients have seen, and how to tell whether this is the right time to start.",
                    "What follows is the same overview we give every prospective client in {city}: scope, process, outcomes, and the honest caveats.",
                    "Keep reading for a plain description of the work, including the parts other firms tend to leave out of the pitch.",
                    "The sections below cover scope, sequencing, and outcomes, so you can evaluate the fit before ever getting on a call.",
                ]),
            ],
        },
        SectionSpec {
            name: "benefits".to_string(),
            kind: SectionKind::List,
            slots: vec![TokenPool::new("benefits.items", &[
                "A named senior lead for the {city} engagement, not a rotating bench",
                "Fixed two-week increments with a written deliverable at the end of each",
                "Baseline metrics captured before any change ships",
                "Recommendations tied to evidence you can audit",
                "Working sessions run in your tools, not ours",
                "A handoff plan your own team can operate without us",
                "Pricing agreed before scope, never the other way around",
                "Local {state} references available on request",
            ])],
        },
        SectionSpec {
            name: "locals".to_string(),
            kind: SectionKind::Prose,
            slots: vec![
                TokenPool::new("locals.anchor", &[
                    "Ask anyone who commutes past {landmark}: {city} does business at its own tempo, and marketing built for another market shows immediately. Our locality work starts from what {city} customers actually search for.",
                    "From offices within sight of {landmark} to teams spread across {metro}, {city} companies share a trait we like: they ask for proof early. We plan for that in the first week.",
                    "{city} is not a market you can serve from a template. The companies here, from {landmark} to the edges of {metro}, compete on specifics, and the pages we build for them do too.",
                    "We have walked enough {city} clients through this work to know the city's rhythm, from the foot traffic around {landmark} to the budget cycles {state} firms plan around.",
                    "Every market has a tell. In {city} it is how quickly word travels across {metro}: work that performs gets referred, and work that does not gets named. We build for the first kind.",
                    "The {city} market rewards patience and punishes shortcuts. Companies near {landmark} have seen a decade of vendors come and go, and the ones still standing kept their promises small and kept them.",
                ]),
                TokenPool::new("locals.industries", &[
                    "The local economy runs on {industries}, and each of those industries brings its own buying cycle. We tune page content and outreach timing to match, rather than averaging them away.",
                    "Serving {industries} means serving very different decision makers. Our {city} work separates those audiences from the first draft instead of writing one page that convinces none of them.",
                    "{city}'s strength in {industries} shapes what prospects expect to read: concrete capability, local proof, and no filler. That is the standard we write to.",
                    "Because {metro} leans on {industries}, seasonality here is real. We schedule the work so results land when your buyers are actually looking.",
                    "Companies in {industries} dominate the local search landscape, which raises the bar for everyone else in {city}. Clearing that bar is the point of this engagement.",
                    "Our research starts with how {industries} buy in {state}, because those patterns decide which pages deserve to exist at all.",
                ]),
                TokenPool::new("locals.commitment", &[
                    "If you are evaluating {service} partners in {city}, ask each one what they know about {metro} that a national firm would miss. Our answer fills the first meeting.",
                    "We maintain current {service} market notes for {metro} and review them with every {city} client at kickoff, so the plan starts from this year's market, not last year's.",
                    "You will not be our first {state} {service} engagement, and the lessons from the earlier ones are baked into the process you are reading about now.",
                    "Local means reachable: {city} clients get {service} working sessions in their own timezone and a lead who has actually been to {metro}.",
                    "Everything on this page scopes {service} to the {city} market specifically; if your growth plan runs past {state}, we will say so and scope that separately.",
                    "We publish what our {service} work teaches us about the {metro} market back to our clients quarterly, so the value of the engagement compounds after the contract ends.",
                ]),
            ],
        },
        SectionSpec {
            name: "process".to_string(),
            kind: SectionKind::Prose,
            slots: vec![
                TokenPool::new("process.kickoff", &[
                    "Week one is diagnosis. We inventory what exists, capture baseline numbers, and interview the people who own the outcome, because every later decision gets measured against that baseline.",
                    "Engagements open with a working session, not a questionnaire. By the end of the first week you have a written map of the current state and the three constraints that matter most.",
                    "We start by reproducing your current results ourselves, so we understand the system as it is before proposing what it should become.",
                    "The first deliverable is always the same: a one-page statement of the problem, the metric that will prove progress, and what we will not be doing. Agreement on that page gates everything else.",
                    "Kickoff is a five-day sprint that ends with a prioritized backlog and an owner for every item on it, on your side or ours.",
                    "Before any changes ship, we establish the measurement: what gets tracked, where it is recorded, and who reads it. Unmeasured work is how engagements drift.",
                ]),
                TokenPool::new("process.build", &[
                    "The build phase runs in fixed two-week increments. Each one ends with something shipped and a short written review of what the numbers did, so course corrections happen in weeks, not quarters.",
                    "From there the work alternates between shipping and measuring. Nothing stays on the roadmap longer than two cycles without evidence it deserves the slot.",
                    "Execution is deliberately boring: small changes, shipped often, each one tied to the baseline we captured at kickoff. Boring compounds.",
                    "We do the work inside your systems and your repositories, so every artifact we produce is yours from the day it is created.",
                    "Mid-engagement reviews happen every other week on a fixed calendar. If a bet is not working, it is killed in that meeting, in writing, with a replacement proposed.",
                    "During the build we pair with one person on your team on every significant change, which is slower in week two and much faster by week ten.",
                ]),
                TokenPool::new("process.handoff", &[
                    "Engagements end with a handoff, not a cliff. The final increment is documentation, training, and a ninety-day checklist your team runs without us.",
                    "The close-out deliverable is an operations runbook: what was changed, why, what to monitor, and what to do when a number moves the wrong way.",
                    "We measure our exit by whether your team can explain every change we made. If they cannot, the handoff is not done and we stay until it is.",
                    "When the work concludes you keep everything: the data, the tooling, the documentation, and a standing offer of one advisory call a month for the next quarter.",
                    "The last two weeks are spent making ourselves unnecessary, transferring ownership item by item against a checklist both sides sign.",
                    "After the final increment we schedule a sixty-day review to check that results held, which is also where most clients decide what the next engagement should be.",
                ]),
            ],
        },
        SectionSpec {
            name: "faq".to_string(),
            kind: SectionKind::Prose,
            slots: vec![
                TokenPool::new("faq.practicals", &[
                    "How long does this take? Most engagements run eight to fourteen weeks. The range depends on how much of the groundwork, measurement in particular, already exists when we start.",
                    "What does it cost? Pricing is fixed per two-week increment and agreed before kickoff, so the total is a multiplication you can do before signing anything.",
                    "When do results show? Leading indicators move within the first month; the outcomes worth paying for typically take a full quarter to confirm. We will show you both, clearly labeled.",
                    "Do we need to pause other work? No. The process is designed to run alongside normal operations, and the increments are scoped so your team's involvement stays predictable.",
                    "What if it is not working? Every increment ends with a go or stop decision that you own. Stopping mid-engagement is a designed outcome, not a breach.",
                    "Is there a minimum commitment? Two increments. Anything shorter cannot produce evidence, and evidence is the product.",
                ]),
                TokenPool::new("faq.fit", &[
                    "Who is this wrong for? Teams that want an execution vendor without measurement, and teams that cannot name an owner for the outcome. Both patterns predict failure, and we decline them.",
                    "Do you work with small teams? Yes, and often best: fewer approvals between a finding and a fix. The scoping conversation is the same regardless of headcount.",
                    "Can our in-house team do this instead? Possibly, and we will tell you so in the first call if we think that is true. Several of our best references started exactly that way.",
                    "Do you replace our existing agency? Usually not. We define the work and the measurement; existing partners often execute parts of it under that structure.",
                    "What do you need from us? One accountable owner, access agreed in week one, and attendance at the biweekly review. Engagements that have all three succeed at a very different rate.",
                    "Will this work in a regulated industry? Yes, with the compliance review built into the increment cycle instead of bolted on at the end. Several current clients operate under exactly those constraints.",
                ]),
                TokenPool::new("faq.next", &[
                    "What happens after the contact form? A thirty-minute call with the person who would lead your engagement, not a salesperson. You leave it with a written summary either way.",
                    "How do we evaluate you against others? Ask every candidate for the metric they moved on their last three engagements and the names of the people who can confirm it. We will bring ours unprompted.",
                    "Can we start small? That is the default. The first two increments are deliberately the cheapest way to find out whether the larger engagement is justified.",
                    "Is there a proposal stage? A short one: a two-page scope with the metric, the increments, and the price. If it takes longer than a week to produce, something is wrong.",
                    "Who will we actually work with? The people named in the proposal, for the whole engagement. Substitutions require your sign-off in writing.",
                    "What if our situation is unusual? The first call is for exactly that. If we are not the right fit, we will say so and suggest who might be.",
                ]),
            ],
        },
    ]
}

fn builtin_cta() -> TokenPool {
    TokenPool::new("cta", &[
        "Book a thirty-minute working session and leave with a written summary of where you stand, whether or not we ever work together.",
        "Tell us the number you are trying to move, and we will tell you honestly whether we can help.",
        "Start with a two-increment pilot: small enough to cancel, large enough to prove the case.",
        "Request the two-page scope. If it does not convince you on its own, the price will not either.",
        "Reach out this week and the first diagnostic session costs nothing but an hour of your time.",
        "Send us your current numbers and we will come to the first call with a point of view, not a pitch.",
        "One conversation is enough to know whether this is a fit. We keep it short on purpose.",
        "Get in touch and ask for the references in your industry first; the rest of the conversation is easier after that.",
    ])
}

fn builtin_filler() -> TokenPool {
    TokenPool::new("filler", &[
        "A note on measurement, because it decides everything above: we treat analytics configuration as part of the engagement, not a prerequisite. If the tracking is wrong we fix it in week one, and if a number on a report cannot be traced to its source, it does not appear in our reviews.",
        "One more thing worth stating plainly: we write everything down. Decisions, assumptions, rejected options, and the reasons for each live in a shared document from day one, because six months from now the why matters more than the what, and memory is a poor system of record.",
        "On tooling: we adopt whatever your team already uses before proposing anything new. Most engagements need no new software at all, and when one genuinely does, the recommendation comes with the exit cost written next to the benefit, because tools are easy to adopt and expensive to leave.",
        "It is also worth saying what this work is not: it is not a guarantee of rankings, and anyone offering one is describing a liability, not a service. What we guarantee is the process: measured changes, honest reporting, and a paper trail connecting every result to the work that produced it.",
        "A brief word about communication cadence: you get a short written update at the end of every week, a working review every other week, and a phone number that reaches a person who knows your account. Escalations are rare, and that is a property of the increments, not of luck.",
        "Finally, continuity: everything produced during the engagement is stored in your accounts and owned by you outright. If we part ways mid-stream, you keep the work, the data, and the documentation, and the last deliverable is a briefing for whoever picks it up next.",
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pools_are_valid() {
        let registry = PoolRegistry::builtin().unwrap();
        for section in registry.sections() {
            for slot in &section.slots {
                assert!(!slot.is_empty(), "empty pool {}", slot.name());
            }
        }
        assert!(!registry.cta().is_empty());
        assert!(!registry.filler().is_empty());
    }

    #[test]
    fn test_capacity_exceeds_deployment_scale() {
        let registry = PoolRegistry::builtin().unwrap();
        // 50x margin over a deployment far larger than the built-in one.
        assert!(registry.combination_capacity() > 10_000 * 50);
    }

    #[test]
    fn test_pool_get_is_deterministic() {
        let registry = PoolRegistry::builtin().unwrap();
        let pool = &registry.sections()[0].slots[0];
        assert_eq!(pool.get(42), pool.get(42));
        assert_eq!(pool.get_wrapping(3), pool.get_wrapping(3 + pool.len()));
    }

    #[test]
    fn test_extension_appends_fragments() {
        let before = PoolRegistry::builtin().unwrap().cta().len();
        let registry = PoolRegistry::with_extensions(&[PoolExtension {
            section: "cta".to_string(),
            slot: 0,
            fragments: vec!["Call today.".to_string()],
        }])
        .unwrap();
        assert_eq!(registry.cta().len(), before + 1);
    }

    #[test]
    fn test_extension_appends_to_a_section_slot() {
        let before = PoolRegistry::builtin().unwrap().sections()[0].slots[1].len();
        let registry = PoolRegistry::with_extensions(&[PoolExtension {
            section: "intro".to_string(),
            slot: 1,
            fragments: vec!["We answer email the same day, every day.".to_string()],
        }])
        .unwrap();
        assert_eq!(registry.sections()[0].slots[1].len(), before + 1);
    }

    #[test]
    fn test_extension_rejects_unknown_section() {
        let err = PoolRegistry::with_extensions(&[PoolExtension {
            section: "sidebar".to_string(),
            slot: 0,
            fragments: vec!["x".to_string()],
        }])
        .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_extension_rejects_out_of_range_slot() {
        let err = PoolRegistry::with_extensions(&[PoolExtension {
            section: "intro".to_string(),
            slot: 9,
            fragments: vec!["x".to_string()],
        }])
        .unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
