//! `pagegen validate` - read-only graph validation against a role.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use pagegen_core::{PageRole, SchemaMatrix, StructuredGraph};

/// Validate a structured-data graph file against a page role.
pub fn execute(file: &Path, role: &str) -> anyhow::Result<()> {
    let role: PageRole = role.parse()?;
    let json = fs::read_to_string(file)
        .with_context(|| format!("reading graph from {}", file.display()))?;
    let graph = StructuredGraph::from_json_str(&json)?;
    let matrix = SchemaMatrix::builtin()?;

    let report = matrix.validate_graph(&graph, role);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        eprintln!("error: {error}");
    }

    if report.is_clean() {
        println!(
            "validate: OK ({} node(s) legal for role '{role}')",
            graph.nodes.len()
        );
        Ok(())
    } else {
        bail!(
            "graph has {} error(s) for role '{role}'",
            report.errors.len()
        );
    }
}
