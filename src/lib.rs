pub mod api;
pub mod catalog;
pub mod check;
pub mod cli;
pub mod cli_types;
pub mod config;
pub mod error;
pub mod identity;
pub mod inspector;
pub mod naming;
pub mod nesting;
pub mod pages;
pub mod placement;
pub mod scanner;
pub mod schema;
pub mod translations;

// Re-export commonly used types
pub use catalog::{BlockEntry, SectionEntry, ThemeCatalog};
pub use check::Finding;
pub use cli::CliApp;
pub use config::{InspectorConfig, ServerConfig, StructuralConfig, ThemeConfig};
pub use error::{Failure, FailureKind, Result, ThemeError};
pub use identity::BlockIdentity;
pub use inspector::{NestingReport, PlacementReport, ScanReport, ThemeInspector};
pub use nesting::{BlocksBySection, NestingVerdict};
pub use pages::{PageType, Zone, PAGE_TYPES};
pub use placement::{PlacementResolver, PlacementVerdict, SectionsByPage};
pub use scanner::{TemplateSource, ThemeFile, ThemeScanner};
pub use schema::ThemeSchema;
pub use translations::{SharedTranslations, TranslationTable};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
