//! Block nesting: which theme blocks can be added inside which section.
//!
//! First matching rule wins:
//!
//! 1. A named declaration matching the block (any addressable form) allows it,
//!    public or private.
//! 2. A `@theme` declaration allows every public block.
//! 3. Anything else is denied. Private blocks are never reached through `@theme`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{BlockEntry, SectionEntry, ThemeCatalog};
use crate::identity::BlockIdentity;
use crate::naming::compare_verdicts;
use crate::schema::{DeclarationKind, ThemeSchema};
use crate::translations::TranslationTable;

pub const PRIVATE_NOT_ALLOWED: &str = "Private block not explicitly allowed in this section";
pub const THEME_BLOCKS_NOT_ACCEPTED: &str =
    "Section does not accept @theme blocks and block not explicitly allowed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingVerdict {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NestingVerdict {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn denied(reason: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Whether a section names the block explicitly in its `blocks` list.
pub fn is_explicitly_allowed(schema: &ThemeSchema, block: &BlockIdentity) -> bool {
    schema.blocks.iter().any(|declaration| match declaration.kind() {
        DeclarationKind::Named(declared) => block.matches(declared),
        DeclarationKind::ThemeWildcard | DeclarationKind::AppWildcard => false,
    })
}

pub fn resolve(schema: &ThemeSchema, block: &BlockIdentity) -> NestingVerdict {
    if is_explicitly_allowed(schema, block) {
        return NestingVerdict::allowed();
    }

    if block.is_private() {
        NestingVerdict::denied(PRIVATE_NOT_ALLOWED)
    } else if schema.accepts_theme_blocks() {
        NestingVerdict::allowed()
    } else {
        NestingVerdict::denied(THEME_BLOCKS_NOT_ACCEPTED)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockCompatibility {
    pub name: String,
    pub file: String,
    pub display_name: String,
    pub is_private: bool,
    pub has_schema: bool,
    pub schema: Option<Value>,
    pub can_be_added_to_section: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A named declaration that no block file answers to: a block defined inside the
/// section itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailableBlocks {
    pub public_blocks: Vec<BlockCompatibility>,
    pub private_blocks: Vec<BlockCompatibility>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlocks {
    pub section_name: String,
    pub section_file: String,
    pub section_display_name: String,
    pub accepts_theme_blocks: bool,
    pub accepts_app_blocks: bool,
    pub renders_theme_blocks: bool,
    pub allowed_private_blocks: Vec<String>,
    pub local_blocks: Vec<LocalBlock>,
    pub available_blocks: AvailableBlocks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NestingSummary {
    pub total_sections: usize,
    pub total_blocks: usize,
    pub public_blocks: usize,
    pub private_blocks: usize,
    pub sections_accepting_theme_blocks: usize,
    pub sections_accepting_app_blocks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlocksBySection {
    pub summary: NestingSummary,
    pub section_blocks: Vec<SectionBlocks>,
}

/// Evaluate every block against every section with a schema.
pub fn blocks_by_section(catalog: &ThemeCatalog, translations: &TranslationTable) -> BlocksBySection {
    let mut section_blocks: Vec<SectionBlocks> = catalog
        .sections
        .iter()
        .map(|section| section_report(section, &catalog.blocks, translations))
        .collect();

    section_blocks.sort_by(|a, b| {
        crate::naming::compare_display_names(&a.section_display_name, &b.section_display_name)
            .then_with(|| a.section_name.cmp(&b.section_name))
    });

    let summary = NestingSummary {
        total_sections: catalog.section_files,
        total_blocks: catalog.block_files,
        public_blocks: catalog.public_blocks().count(),
        private_blocks: catalog.private_blocks().count(),
        sections_accepting_theme_blocks: section_blocks.iter().filter(|s| s.accepts_theme_blocks).count(),
        sections_accepting_app_blocks: section_blocks.iter().filter(|s| s.accepts_app_blocks).count(),
    };

    BlocksBySection {
        summary,
        section_blocks,
    }
}

fn section_report(section: &SectionEntry, blocks: &[BlockEntry], translations: &TranslationTable) -> SectionBlocks {
    let schema = &section.schema;
    let mut available = AvailableBlocks::default();

    for block in blocks {
        let verdict = resolve(schema, &block.identity);
        let info = BlockCompatibility {
            name: block.identity.name().to_string(),
            file: block.file.clone(),
            display_name: block.display_name.clone(),
            is_private: block.identity.is_private(),
            has_schema: block.schema.is_some(),
            schema: block.schema.as_ref().map(|s| s.raw.clone()),
            can_be_added_to_section: verdict.allowed,
            reason: verdict.reason,
        };

        if info.is_private {
            available.private_blocks.push(info);
        } else {
            available.public_blocks.push(info);
        }
    }

    sort_blocks(&mut available.public_blocks);
    sort_blocks(&mut available.private_blocks);

    let local_blocks = schema
        .named_declarations()
        .filter(|declaration| !blocks.iter().any(|b| b.identity.matches(&declaration.block_type)))
        .map(|declaration| LocalBlock {
            block_type: declaration.block_type.clone(),
            display_name: translations.display_name(declaration.name.as_deref(), &declaration.block_type),
        })
        .collect();

    SectionBlocks {
        section_name: section.name.clone(),
        section_file: section.file.clone(),
        section_display_name: section.display_name.clone(),
        accepts_theme_blocks: schema.accepts_theme_blocks(),
        accepts_app_blocks: schema.accepts_app_blocks(),
        renders_theme_blocks: section.renders_theme_blocks,
        allowed_private_blocks: schema.private_block_references(),
        local_blocks,
        available_blocks: available,
    }
}

fn sort_blocks(blocks: &mut [BlockCompatibility]) {
    blocks.sort_by(|a, b| {
        compare_verdicts(
            a.can_be_added_to_section,
            &a.display_name,
            b.can_be_added_to_section,
            &b.display_name,
        )
        .then_with(|| a.name.cmp(&b.name))
    });
}
