//! Embedded schema handling.
//!
//! Template files carry their configuration as JSON between `{% schema %}` and
//! `{% endschema %}`. [`extract`] pulls that payload out of raw text; [`model`] gives it
//! types the resolvers can match on.

pub mod extract;
pub mod model;

pub use extract::{extract_schema, SchemaExtraction};
pub use model::{
    BlockDeclaration, DeclarationKind, GroupRule, PlacementRule, TemplateGate, ThemeSchema,
    APP_WILDCARD, THEME_WILDCARD,
};
