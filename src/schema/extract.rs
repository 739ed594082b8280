use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SCHEMA_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\{%\s*schema\s*%\}(.*?)\{%\s*endschema\s*%\}")
        .expect("schema block pattern is valid")
});

/// Result of looking for an embedded schema in a template's raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaExtraction {
    /// No `{% schema %}` block at all.
    Missing,
    /// A block exists but its payload is not valid JSON.
    Invalid { raw: String, message: String },
    Parsed { raw: String, value: Value },
}

impl SchemaExtraction {
    pub fn has_block(&self) -> bool {
        !matches!(self, SchemaExtraction::Missing)
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            SchemaExtraction::Parsed { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            SchemaExtraction::Parsed { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            SchemaExtraction::Missing => None,
            SchemaExtraction::Invalid { raw, .. } | SchemaExtraction::Parsed { raw, .. } => {
                Some(raw)
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SchemaExtraction::Invalid { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Find the first schema block in `content` and decode its payload.
pub fn extract_schema(content: &str) -> SchemaExtraction {
    let Some(captures) = SCHEMA_BLOCK.captures(content) else {
        return SchemaExtraction::Missing;
    };

    let raw = captures
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => SchemaExtraction::Parsed { raw, value },
        Err(e) => SchemaExtraction::Invalid {
            raw,
            message: e.to_string(),
        },
    }
}
