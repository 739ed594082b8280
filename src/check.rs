//! Cross-file consistency findings for a theme catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ThemeCatalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// A `_name` declaration no private block file answers to.
    UnknownPrivateBlock { section: String, block_type: String },
    /// The section accepts `@theme` blocks but never renders them.
    ThemeBlocksNotRendered { section: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnknownPrivateBlock { section, block_type } => write!(
                f,
                "{}: declares private block '{}' but no such block exists",
                section, block_type
            ),
            Finding::ThemeBlocksNotRendered { section } => write!(
                f,
                "{}: accepts @theme blocks but does not render {{% content_for 'blocks' %}}",
                section
            ),
        }
    }
}

pub fn check_catalog(catalog: &ThemeCatalog) -> Vec<Finding> {
    let mut findings = Vec::new();

    for section in &catalog.sections {
        for reference in section.schema.private_block_references() {
            let known = catalog
                .private_blocks()
                .any(|block| block.identity.matches(&reference));
            if !known {
                findings.push(Finding::UnknownPrivateBlock {
                    section: section.file.clone(),
                    block_type: reference,
                });
            }
        }

        if section.schema.accepts_theme_blocks() && !section.renders_theme_blocks {
            findings.push(Finding::ThemeBlocksNotRendered {
                section: section.file.clone(),
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::TemplateSource;
    use crate::translations::TranslationTable;

    #[test]
    fn test_check_catalog_findings() {
        let sections = vec![
            TemplateSource::new(
                "good",
                "good.liquid",
                "{% content_for 'blocks' %}{% schema %}{\"blocks\":[{\"type\":\"@theme\"},{\"type\":\"_icon\"}]}{% endschema %}",
            ),
            TemplateSource::new(
                "bad",
                "bad.liquid",
                "{% schema %}{\"blocks\":[{\"type\":\"@theme\"},{\"type\":\"_missing\"}]}{% endschema %}",
            ),
        ];
        let blocks = vec![TemplateSource::new("_icon", "_icon.liquid", "")];
        let catalog = ThemeCatalog::build(&sections, &blocks, &TranslationTable::empty());

        let findings = check_catalog(&catalog);
        assert_eq!(
            findings,
            vec![
                Finding::UnknownPrivateBlock {
                    section: "bad.liquid".to_string(),
                    block_type: "_missing".to_string(),
                },
                Finding::ThemeBlocksNotRendered { section: "bad.liquid".to_string() },
            ]
        );
        assert!(findings[1].to_string().contains("content_for 'blocks'"));
    }

    #[test]
    fn test_clean_catalog_has_no_findings() {
        let catalog = ThemeCatalog::default();
        assert!(check_catalog(&catalog).is_empty());
    }
}
