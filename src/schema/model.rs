use serde_json::Value;

/// Declaration accepting every public theme block.
pub const THEME_WILDCARD: &str = "@theme";
/// Declaration accepting app blocks. Recorded, never resolved further.
pub const APP_WILDCARD: &str = "@app";

/// One entry of a schema's `blocks` list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDeclaration {
    pub block_type: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind<'a> {
    ThemeWildcard,
    AppWildcard,
    Named(&'a str),
}

impl BlockDeclaration {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            name: None,
        }
    }

    pub fn kind(&self) -> DeclarationKind<'_> {
        match self.block_type.as_str() {
            THEME_WILDCARD => DeclarationKind::ThemeWildcard,
            APP_WILDCARD => DeclarationKind::AppWildcard,
            other => DeclarationKind::Named(other),
        }
    }

    pub fn is_private_reference(&self) -> bool {
        self.block_type.starts_with('_')
    }
}

/// Page-template gate from `enabled_on.templates`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateGate {
    Any,
    Only(Vec<String>),
}

impl TemplateGate {
    pub fn admits(&self, template: &str) -> bool {
        match self {
            TemplateGate::Any => true,
            TemplateGate::Only(templates) => templates.iter().any(|t| t == template),
        }
    }
}

/// Zone restriction from `enabled_on.groups` / `disabled_on.groups`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRule {
    Unrestricted,
    AllowList(Vec<String>),
    DenyList(Vec<String>),
}

/// Placement restrictions, decoded once from the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRule {
    pub templates: TemplateGate,
    pub groups: GroupRule,
}

impl Default for PlacementRule {
    fn default() -> Self {
        Self {
            templates: TemplateGate::Any,
            groups: GroupRule::Unrestricted,
        }
    }
}

impl PlacementRule {
    fn from_schema_value(value: &Value) -> Self {
        let enabled_on = value.get("enabled_on");
        let disabled_on = value.get("disabled_on");

        let templates = match string_list(enabled_on.and_then(|e| e.get("templates"))) {
            Some(templates) => TemplateGate::Only(templates),
            None => TemplateGate::Any,
        };

        // An allow-list shadows any deny-list
        let groups = match string_list(enabled_on.and_then(|e| e.get("groups"))) {
            Some(allowed) => GroupRule::AllowList(allowed),
            None => match string_list(disabled_on.and_then(|d| d.get("groups"))) {
                Some(denied) => GroupRule::DenyList(denied),
                None => GroupRule::Unrestricted,
            },
        };

        Self { templates, groups }
    }
}

/// Typed view of a template's embedded schema.
///
/// Decoding is lenient: wrong-typed fields read as absent, `blocks` entries without a
/// string `type` are dropped. The original JSON stays available in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSchema {
    pub name: Option<String>,
    pub blocks: Vec<BlockDeclaration>,
    pub presets: Vec<Value>,
    pub settings: Vec<Value>,
    pub limit: Option<u64>,
    pub placement: PlacementRule,
    pub raw: Value,
}

impl ThemeSchema {
    /// Returns `None` unless the payload is a JSON object; `null`, `false`, `0`, `""`
    /// and arrays carry no configuration.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let name = value.get("name").and_then(Value::as_str).map(str::to_string);

        let blocks = value
            .get("blocks")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let block_type = entry.get("type")?.as_str()?;
                        Some(BlockDeclaration {
                            block_type: block_type.to_string(),
                            name: entry.get("name").and_then(Value::as_str).map(str::to_string),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let presets = array_of(&value, "presets");
        let settings = array_of(&value, "settings");
        let limit = value.get("limit").and_then(Value::as_u64);
        let placement = PlacementRule::from_schema_value(&value);

        Some(Self {
            name,
            blocks,
            presets,
            settings,
            limit,
            placement,
            raw: value,
        })
    }

    pub fn has_presets(&self) -> bool {
        !self.presets.is_empty()
    }

    pub fn accepts_theme_blocks(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.kind() == DeclarationKind::ThemeWildcard)
    }

    pub fn accepts_app_blocks(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.kind() == DeclarationKind::AppWildcard)
    }

    /// Named declarations only, wildcards excluded.
    pub fn named_declarations(&self) -> impl Iterator<Item = &BlockDeclaration> {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind(), DeclarationKind::Named(_)))
    }

    /// `_`-prefixed block types, in declaration order.
    pub fn private_block_references(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|b| b.is_private_reference())
            .map(|b| b.block_type.clone())
            .collect()
    }

    pub fn enabled_on(&self) -> Option<&Value> {
        self.raw.get("enabled_on")
    }

    pub fn disabled_on(&self) -> Option<&Value> {
        self.raw.get("disabled_on")
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn array_of(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> ThemeSchema {
        ThemeSchema::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_schema_defaults() {
        let s = schema(json!({}));
        assert!(s.name.is_none());
        assert!(s.blocks.is_empty());
        assert!(!s.has_presets());
        assert_eq!(s.placement, PlacementRule::default());
    }

    #[test]
    fn test_non_object_payload_has_no_schema() {
        for payload in [Value::Null, json!(false), json!(0), json!(""), json!([]), json!("hero")] {
            assert!(ThemeSchema::from_value(payload.clone()).is_none(), "{}", payload);
        }
        assert!(ThemeSchema::from_value(json!({})).is_some());
    }

    #[test]
    fn test_block_declarations_and_wildcards() {
        let s = schema(json!({
            "blocks": [
                { "type": "@theme" },
                { "type": "@app" },
                { "type": "_icon" },
                { "type": "slide", "name": "Slide" },
                { "name": "no type" },
                { "type": 42 }
            ]
        }));
        assert_eq!(s.blocks.len(), 4);
        assert!(s.accepts_theme_blocks());
        assert!(s.accepts_app_blocks());
        assert_eq!(s.private_block_references(), vec!["_icon".to_string()]);

        let named: Vec<_> = s.named_declarations().map(|b| b.block_type.as_str()).collect();
        assert_eq!(named, vec!["_icon", "slide"]);
        assert_eq!(s.blocks[3].name.as_deref(), Some("Slide"));
    }

    #[test]
    fn test_placement_rule_decoding() {
        let s = schema(json!({ "enabled_on": { "templates": ["product"], "groups": ["header"] } }));
        assert_eq!(s.placement.templates, TemplateGate::Only(vec!["product".to_string()]));
        assert_eq!(s.placement.groups, GroupRule::AllowList(vec!["header".to_string()]));

        let s = schema(json!({ "disabled_on": { "groups": ["footer"] } }));
        assert_eq!(s.placement.templates, TemplateGate::Any);
        assert_eq!(s.placement.groups, GroupRule::DenyList(vec!["footer".to_string()]));
    }

    #[test]
    fn test_allow_list_shadows_deny_list() {
        let s = schema(json!({
            "enabled_on": { "groups": ["main"] },
            "disabled_on": { "groups": ["main"] }
        }));
        assert_eq!(s.placement.groups, GroupRule::AllowList(vec!["main".to_string()]));
    }

    #[test]
    fn test_template_gate() {
        assert!(TemplateGate::Any.admits("index"));
        let gate = TemplateGate::Only(vec!["product".to_string(), "collection".to_string()]);
        assert!(gate.admits("collection"));
        assert!(!gate.admits("index"));
        assert!(!TemplateGate::Only(vec![]).admits("index"));
    }

    #[test]
    fn test_presets_limit_and_passthrough() {
        let s = schema(json!({
            "presets": [{ "name": "Default" }],
            "settings": [{ "type": "text", "id": "title" }],
            "limit": 1,
            "enabled_on": { "groups": ["header"] }
        }));
        assert!(s.has_presets());
        assert_eq!(s.settings.len(), 1);
        assert_eq!(s.limit, Some(1));
        assert_eq!(s.enabled_on(), Some(&json!({ "groups": ["header"] })));
        assert!(s.disabled_on().is_none());
    }
}
