//! Section placement: which sections can go in which zone of which page type.
//!
//! Rules, in order:
//!
//! 1. `enabled_on.templates` gates the whole page. A page outside the list denies every
//!    zone with the same reason and nothing else is consulted.
//! 2. `enabled_on.groups` allows exactly the listed zones.
//! 3. Otherwise `disabled_on.groups` denies exactly the listed zones.
//! 4. With no group rule, a zone is allowed when the section has presets. Structural
//!    sections are also allowed in `main` without presets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::catalog::{SectionEntry, ThemeCatalog};
use crate::config::StructuralConfig;
use crate::naming::compare_display_names;
use crate::pages::{PageType, Zone, PAGE_TYPES};
use crate::schema::{GroupRule, TemplateGate, ThemeSchema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneDecision {
    Allowed,
    Denied(String),
}

impl ZoneDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ZoneDecision::Allowed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAvailability {
    pub header: bool,
    pub main: bool,
    pub footer: bool,
}

impl ZoneAvailability {
    pub fn get(&self, zone: Zone) -> bool {
        match zone {
            Zone::Header => self.header,
            Zone::Main => self.main,
            Zone::Footer => self.footer,
        }
    }

    fn set(&mut self, zone: Zone, allowed: bool) {
        match zone {
            Zone::Header => self.header = allowed,
            Zone::Main => self.main = allowed,
            Zone::Footer => self.footer = allowed,
        }
    }
}

/// Outcome of evaluating one section against one page template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementVerdict {
    pub available: ZoneAvailability,
    pub restrictions: BTreeMap<Zone, String>,
}

pub struct PlacementResolver<'a> {
    structural: &'a StructuralConfig,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(structural: &'a StructuralConfig) -> Self {
        Self { structural }
    }

    pub fn resolve(&self, section_name: &str, schema: &ThemeSchema, template: &str, zone: Zone) -> bool {
        self.decide(section_name, schema, template, zone).is_allowed()
    }

    /// Reasons for every denied zone on `template`.
    pub fn restrictions(&self, section_name: &str, schema: &ThemeSchema, template: &str) -> BTreeMap<Zone, String> {
        self.evaluate(section_name, schema, template).restrictions
    }

    pub fn evaluate(&self, section_name: &str, schema: &ThemeSchema, template: &str) -> PlacementVerdict {
        let mut verdict = PlacementVerdict::default();
        for zone in Zone::ALL {
            match self.decide(section_name, schema, template, zone) {
                ZoneDecision::Allowed => verdict.available.set(zone, true),
                ZoneDecision::Denied(reason) => {
                    verdict.restrictions.insert(zone, reason);
                }
            }
        }
        verdict
    }

    pub fn decide(&self, section_name: &str, schema: &ThemeSchema, template: &str, zone: Zone) -> ZoneDecision {
        let rule = &schema.placement;

        if let TemplateGate::Only(templates) = &rule.templates {
            if !rule.templates.admits(template) {
                return ZoneDecision::Denied(format!(
                    "Only enabled on templates: {}",
                    templates.join(", ")
                ));
            }
        }

        match &rule.groups {
            GroupRule::AllowList(groups) => {
                if groups.iter().any(|g| g == zone.as_str()) {
                    ZoneDecision::Allowed
                } else {
                    ZoneDecision::Denied(format!("Only enabled in groups: {}", groups.join(", ")))
                }
            }
            GroupRule::DenyList(groups) => {
                if groups.iter().any(|g| g == zone.as_str()) {
                    ZoneDecision::Denied(format!("Disabled in group: {}", zone))
                } else {
                    ZoneDecision::Allowed
                }
            }
            GroupRule::Unrestricted => {
                let structural = zone == Zone::Main && self.structural.is_structural(section_name);
                if schema.has_presets() || structural {
                    ZoneDecision::Allowed
                } else if zone == Zone::Main {
                    ZoneDecision::Denied("No presets defined - not addable".to_string())
                } else {
                    ZoneDecision::Denied("No presets defined - not addable in header/footer".to_string())
                }
            }
        }
    }
}

/// Section record as listed in a page zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionPlacement {
    pub name: String,
    pub file: String,
    pub display_name: String,
    pub has_presets: bool,
    pub presets_count: usize,
    pub presets: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(rename = "enabled_on", skip_serializing_if = "Option::is_none")]
    pub enabled_on: Option<Value>,
    #[serde(rename = "disabled_on", skip_serializing_if = "Option::is_none")]
    pub disabled_on: Option<Value>,
    pub available_in_groups: ZoneAvailability,
    pub restrictions: BTreeMap<Zone, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageZones {
    pub header: Vec<SectionPlacement>,
    pub main: Vec<SectionPlacement>,
    pub footer: Vec<SectionPlacement>,
}

impl PageZones {
    pub fn zone(&self, zone: Zone) -> &[SectionPlacement] {
        match zone {
            Zone::Header => &self.header,
            Zone::Main => &self.main,
            Zone::Footer => &self.footer,
        }
    }

    fn zone_mut(&mut self, zone: Zone) -> &mut Vec<SectionPlacement> {
        match zone {
            Zone::Header => &mut self.header,
            Zone::Main => &mut self.main,
            Zone::Footer => &mut self.footer,
        }
    }

    pub fn total(&self) -> usize {
        self.header.len() + self.main.len() + self.footer.len()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneCounts {
    pub header: usize,
    pub main: usize,
    pub footer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub page_type: String,
    pub page_name: String,
    pub header: usize,
    pub main: usize,
    pub footer: usize,
    pub total: usize,
    pub with_presets: ZoneCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSummary {
    pub total_sections: usize,
    pub by_page: Vec<PageSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionsByPage {
    pub summary: PlacementSummary,
    /// Keyed by page type, in page-catalog order.
    pub sections_by_page: IndexMap<String, PageZones>,
}

/// Partition every section into the zones of every catalog page.
pub fn sections_by_page(catalog: &ThemeCatalog, structural: &StructuralConfig) -> SectionsByPage {
    sections_by_page_with(catalog, structural, &PAGE_TYPES)
}

pub fn sections_by_page_with(
    catalog: &ThemeCatalog,
    structural: &StructuralConfig,
    pages: &[PageType],
) -> SectionsByPage {
    let resolver = PlacementResolver::new(structural);
    let mut by_page: IndexMap<String, PageZones> = pages
        .iter()
        .map(|page| (page.key.to_string(), PageZones::default()))
        .collect();

    for section in &catalog.sections {
        for page in pages {
            let verdict = resolver.evaluate(&section.name, &section.schema, page.template);
            let record = placement_record(section, &verdict);
            let zones = by_page.entry(page.key.to_string()).or_default();

            for zone in page.zones {
                if verdict.available.get(*zone) {
                    zones.zone_mut(*zone).push(record.clone());
                }
            }
        }
    }

    for zones in by_page.values_mut() {
        for zone in Zone::ALL {
            zones.zone_mut(zone).sort_by(|a, b| {
                compare_display_names(&a.display_name, &b.display_name).then_with(|| a.name.cmp(&b.name))
            });
        }
    }

    let summary = PlacementSummary {
        total_sections: catalog.section_files,
        by_page: pages
            .iter()
            .map(|page| {
                let zones = &by_page[page.key];
                let with_presets = |zone: Zone| zones.zone(zone).iter().filter(|s| s.has_presets).count();
                PageSummary {
                    page_type: page.key.to_string(),
                    page_name: page.name.to_string(),
                    header: zones.header.len(),
                    main: zones.main.len(),
                    footer: zones.footer.len(),
                    total: zones.total(),
                    with_presets: ZoneCounts {
                        header: with_presets(Zone::Header),
                        main: with_presets(Zone::Main),
                        footer: with_presets(Zone::Footer),
                    },
                }
            })
            .collect(),
    };

    SectionsByPage {
        summary,
        sections_by_page: by_page,
    }
}

fn placement_record(section: &SectionEntry, verdict: &PlacementVerdict) -> SectionPlacement {
    let schema = &section.schema;
    SectionPlacement {
        name: section.name.clone(),
        file: section.file.clone(),
        display_name: section.display_name.clone(),
        has_presets: schema.has_presets(),
        presets_count: schema.presets.len(),
        presets: schema.presets.clone(),
        limit: schema.limit,
        enabled_on: schema.enabled_on().cloned(),
        disabled_on: schema.disabled_on().cloned(),
        available_in_groups: verdict.available,
        restrictions: verdict.restrictions.clone(),
    }
}
