use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a discovered block file can be addressed from a section's `blocks[].type`.
///
/// A block answers to its template name and its file stem, each with or without an
/// extra `_` in front. Private blocks (file name starting with `_`) additionally answer
/// to their name without the leading underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockIdentity {
    name: String,
    file_stem: String,
    is_private: bool,
}

impl BlockIdentity {
    pub fn new(name: impl Into<String>, file: &str, is_private: bool) -> Self {
        let file_stem = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string();

        Self {
            name: name.into(),
            file_stem,
            is_private,
        }
    }

    /// Identity for a file in the blocks directory; privacy follows the file name.
    pub fn from_file(file: &str) -> Self {
        let name = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string();
        let is_private = file.starts_with('_');
        Self::new(name, file, is_private)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    /// Name with the private marker removed.
    pub fn canonical_name(&self) -> &str {
        if self.is_private {
            self.name.strip_prefix('_').unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Exact, case-sensitive comparison against every addressable form.
    pub fn matches(&self, declared: &str) -> bool {
        [self.name.as_str(), self.file_stem.as_str()]
            .into_iter()
            .any(|form| {
                declared == form
                    || declared.strip_prefix('_') == Some(form)
                    || (self.is_private && form.strip_prefix('_') == Some(declared))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_block_forms() {
        let hero = BlockIdentity::from_file("hero.liquid");
        assert!(!hero.is_private());
        assert_eq!(hero.name(), "hero");
        assert_eq!(hero.canonical_name(), "hero");

        assert!(hero.matches("hero"));
        assert!(hero.matches("_hero"));
        assert!(!hero.matches("Hero"));
        assert!(!hero.matches("hero.liquid"));
        assert!(!hero.matches("hero-banner"));
        assert!(!hero.matches("@theme"));
    }

    #[test]
    fn test_private_block_forms() {
        let icon = BlockIdentity::from_file("_icon.liquid");
        assert!(icon.is_private());
        assert_eq!(icon.name(), "_icon");
        assert_eq!(icon.canonical_name(), "icon");

        assert!(icon.matches("_icon"));
        assert!(icon.matches("icon"));
        assert!(icon.matches("__icon"));
        assert!(!icon.matches("_badge"));
        assert!(!icon.matches("ICON"));
    }

    #[test]
    fn test_name_and_stem_can_differ() {
        let block = BlockIdentity::new("slide", "carousel-slide.liquid", false);
        assert!(block.matches("slide"));
        assert!(block.matches("carousel-slide"));
        assert!(block.matches("_carousel-slide"));
        assert!(!block.matches("carousel"));
    }

    #[test]
    fn test_punctuation_is_significant() {
        let block = BlockIdentity::from_file("product-card.liquid");
        assert!(block.matches("product-card"));
        assert!(!block.matches("product_card"));
        assert!(!block.matches("product card"));
    }
}
