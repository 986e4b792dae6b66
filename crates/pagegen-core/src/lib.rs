//! # pagegen-core
//!
//! Core functionality for pagegen - a deterministic page-generation engine
//! for large programmatic content sites.
//!
//! This crate produces thousands of distinct service × locality landing
//! pages without hand-authored copy per page, and attaches a role-aware,
//! machine-readable metadata policy to each one. Two pieces carry the
//! engineering weight:
//!
//! - **Procedural content synthesis**: every page is composed from seeded
//!   token pools, keyed by the page's canonical identity through a fixed
//!   64-bit FNV-1a hash. Identical identity means byte-identical output —
//!   across calls, processes, and restarts — while multi-slot composition
//!   keeps near-duplicates negligible across the combinatorial key space.
//! - **Schema rule engine**: a master matrix maps each page role to the
//!   structured-data node types that are allowed, forbidden, and required,
//!   and cleans or validates assembled graphs against that policy.
//!
//! ## Architecture
//!
//! - **Canonicalization**: one normalized identity per requested path
//! - **Seeding**: per-section, per-slot deterministic seed derivation
//! - **Pools & composition**: frozen fragment pools assembled into pages
//! - **Classification**: ordered path-pattern rules mapping paths to roles
//! - **Schema matrix**: per-role metadata policy with clean/validate twins
//!
//! ## Quick Start
//!
//! ```rust
//! use pagegen_core::{classify, Composer, Config, Normalizer, PoolRegistry};
//!
//! let config = Config::default();
//! let registry = config.registry();
//! let pools = PoolRegistry::builtin()?;
//! let composer = Composer::new(&registry, &pools, &config.content);
//!
//! let normalizer = Normalizer::new(&config.site.base_url);
//! let identity = normalizer.normalize("/Services//AI-Consulting//Dallas-TX/?utm_source=x");
//! assert_eq!(
//!     identity.as_str(),
//!     "https://example.com/services/ai-consulting/dallas-tx/"
//! );
//!
//! let page = composer.compose("ai-consulting", "dallas-tx", &identity);
//! assert!(page.word_count >= 500);
//! println!("role: {}", classify(&identity));
//! # Ok::<(), pagegen_core::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Every component is a pure function over configuration that is loaded
//! once and never mutated. There is no I/O and no shared mutable state on
//! the request path, so any number of pages can be composed concurrently
//! with zero locking.

/// Canonical key normalization and content-key parsing
pub mod canonical;
/// Ordered path-pattern page-role classification
pub mod classify;
/// Section and slot assembly into composed pages
pub mod compose;
/// Site configuration loading and validation
pub mod config;
/// Error types and result aliases
pub mod error;
/// Token pools and the frozen pool registry
pub mod pool;
/// Services and localities facts registry
pub mod registry;
/// Schema rule engine and the master matrix
pub mod schema;
/// Deterministic FNV-1a seed derivation
pub mod seed;
/// Core data types for composed pages
pub mod types;

// Re-export commonly used types
pub use canonical::{CanonicalIdentity, ContentKey, Normalizer};
pub use classify::{classify, PageRole};
pub use compose::Composer;
pub use config::{Config, ContentConfig, SiteConfig};
pub use error::{Error, Result};
pub use pool::{PoolExtension, PoolRegistry, SectionSpec, TokenPool};
pub use registry::{Locality, Registry, Service};
pub use schema::{
    CleanOutcome, MatrixRule, SchemaMatrix, SchemaNode, StructuredGraph, ValidationReport,
};
pub use types::{ComposedPage, Section, SectionKind};
