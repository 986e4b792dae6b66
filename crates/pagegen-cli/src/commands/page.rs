//! `pagegen page` - compose and print one page.

use pagegen_core::{classify, ContentKey, SectionKind};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::Site;

/// Normalize, classify, and compose the page for a requested path.
pub fn execute(site: &Site, path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let identity = site.normalizer.normalize(path);
    let role = classify(&identity);
    let key = ContentKey::parse(&identity);

    let (Some(service), Some(locality)) = (key.service.as_deref(), key.locality.as_deref())
    else {
        match format {
            OutputFormat::Text => {
                println!("identity: {identity}");
                println!("role:     {role}");
                println!("(not a service x locality page; nothing to compose)");
            },
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "identity": identity,
                        "role": role,
                        "page": null,
                    }))?
                );
            },
        }
        return Ok(());
    };

    let page = site.composer().compose(service, locality, &identity);

    match format {
        OutputFormat::Text => {
            println!("identity:   {identity}");
            println!("role:       {role}");
            println!("word count: {}", page.word_count);
            for warning in &page.warnings {
                println!("warning:    {warning}");
            }
            for section in &page.sections {
                let marker = match section.kind {
                    SectionKind::Prose => "",
                    SectionKind::List => " (list)",
                };
                println!("\n## {}{marker}\n{}", section.name, section.text);
            }
        },
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "identity": identity,
                    "role": role,
                    "page": page,
                }))?
            );
        },
    }

    Ok(())
}
