//! Core data types for composed pages.

use serde::{Deserialize, Serialize};

/// How a section's text is treated by word-count accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Free-running text; counted toward the word-count band.
    Prose,
    /// List or markup content; excluded from the word-count band.
    List,
}

/// One assembled section of a composed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section name (`intro`, `locals`, `cta`, ...).
    pub name: String,
    /// Accounting kind.
    pub kind: SectionKind,
    /// Assembled text.
    pub text: String,
}

impl Section {
    /// Words in this section, as counted toward the band. Zero for list
    /// sections.
    #[must_use]
    pub fn countable_words(&self) -> usize {
        match self.kind {
            SectionKind::Prose => self.text.split_whitespace().count(),
            SectionKind::List => 0,
        }
    }
}

/// A fully composed page: ordered sections plus aggregate word count.
///
/// A `ComposedPage` is a pure function of its content key given frozen
/// configuration — the same key produces byte-identical sections on every
/// call, in every process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedPage {
    /// Sections in render order.
    pub sections: Vec<Section>,
    /// Total words across prose sections (list sections excluded).
    pub word_count: usize,
    /// Non-fatal problems hit during composition (unknown facets).
    pub warnings: Vec<String>,
}

impl ComposedPage {
    /// Text of the named section, if present.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countable_words_by_kind() {
        let prose = Section {
            name: "intro".to_string(),
            kind: SectionKind::Prose,
            text: "five words of prose here".to_string(),
        };
        assert_eq!(prose.countable_words(), 5);

        let list = Section {
            name: "benefits".to_string(),
            kind: SectionKind::List,
            text: "- a\n- b\n- c".to_string(),
        };
        assert_eq!(list.countable_words(), 0);
    }

    #[test]
    fn test_section_lookup() {
        let page = ComposedPage {
            sections: vec![Section {
                name: "cta".to_string(),
                kind: SectionKind::Prose,
                text: "call us".to_string(),
            }],
            word_count: 2,
            warnings: Vec::new(),
        };
        assert_eq!(page.section("cta"), Some("call us"));
        assert_eq!(page.section("intro"), None);
    }
}
