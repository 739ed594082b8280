//! Typed section and block collections built from raw template sources.

use crate::identity::BlockIdentity;
use crate::scanner::TemplateSource;
use crate::schema::ThemeSchema;
use crate::translations::TranslationTable;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionEntry {
    pub name: String,
    pub file: String,
    pub display_name: String,
    pub schema: ThemeSchema,
    pub renders_theme_blocks: bool,
}

impl SectionEntry {
    pub fn from_source(source: &TemplateSource, translations: &TranslationTable) -> Option<Self> {
        let schema = source.schema()?;
        Some(Self {
            name: source.name.clone(),
            file: source.file.clone(),
            display_name: translations.display_name(schema.name.as_deref(), &source.name),
            renders_theme_blocks: source.renders_theme_blocks(),
            schema,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntry {
    pub identity: BlockIdentity,
    pub file: String,
    pub display_name: String,
    /// Blocks stay listed even without a usable schema.
    pub schema: Option<ThemeSchema>,
}

impl BlockEntry {
    pub fn from_source(source: &TemplateSource, translations: &TranslationTable) -> Self {
        let schema = source.schema();
        let display_name = translations.display_name(
            schema.as_ref().and_then(|s| s.name.as_deref()),
            &source.name,
        );
        Self {
            identity: BlockIdentity::new(&source.name, &source.file, source.file.starts_with('_')),
            file: source.file.clone(),
            display_name,
            schema,
        }
    }
}

/// Sections with a parsable schema, and every discovered block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeCatalog {
    pub sections: Vec<SectionEntry>,
    pub blocks: Vec<BlockEntry>,
    /// Every section file found, schema or not.
    pub section_files: usize,
    pub block_files: usize,
}

impl ThemeCatalog {
    pub fn build(
        sections: &[TemplateSource],
        blocks: &[TemplateSource],
        translations: &TranslationTable,
    ) -> Self {
        let section_entries = sections
            .iter()
            .filter_map(|source| {
                let entry = SectionEntry::from_source(source, translations);
                if entry.is_none() {
                    tracing::debug!("No valid schema found for section {}", source.file);
                }
                entry
            })
            .collect();

        Self {
            sections: section_entries,
            blocks: blocks
                .iter()
                .map(|source| BlockEntry::from_source(source, translations))
                .collect(),
            section_files: sections.len(),
            block_files: blocks.len(),
        }
    }

    pub fn public_blocks(&self) -> impl Iterator<Item = &BlockEntry> {
        self.blocks.iter().filter(|b| !b.identity.is_private())
    }

    pub fn private_blocks(&self) -> impl Iterator<Item = &BlockEntry> {
        self.blocks.iter().filter(|b| b.identity.is_private())
    }
}
