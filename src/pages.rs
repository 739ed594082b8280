use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Header,
    Main,
    Footer,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Header, Zone::Main, Zone::Footer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Header => "header",
            Zone::Main => "main",
            Zone::Footer => "footer",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Zone::Header),
            "main" => Ok(Zone::Main),
            "footer" => Ok(Zone::Footer),
            other => Err(format!("Unknown zone: {}", other)),
        }
    }
}

/// A class of storefront pages sharing one template key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageType {
    pub key: &'static str,
    pub name: &'static str,
    pub template: &'static str,
    pub zones: &'static [Zone],
}

pub const PAGE_TYPES: [PageType; 8] = [
    PageType { key: "index", name: "Home Page", template: "index", zones: &Zone::ALL },
    PageType { key: "product", name: "Product Page", template: "product", zones: &Zone::ALL },
    PageType { key: "collection", name: "Collection Page", template: "collection", zones: &Zone::ALL },
    PageType { key: "cart", name: "Cart Page", template: "cart", zones: &Zone::ALL },
    PageType { key: "blog", name: "Blog Pages", template: "blog", zones: &Zone::ALL },
    PageType { key: "404", name: "404 Error Page", template: "404", zones: &Zone::ALL },
    PageType { key: "search", name: "Search Page", template: "search", zones: &Zone::ALL },
    PageType { key: "page", name: "Regular Pages", template: "page", zones: &Zone::ALL },
];

pub fn page_type(key: &str) -> Option<&'static PageType> {
    PAGE_TYPES.iter().find(|p| p.key == key)
}
