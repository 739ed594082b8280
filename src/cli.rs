use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::info;

use crate::{
    check::Finding,
    cli_types::{BlocksArgs, CheckArgs, OutputFormat, PagesArgs, ScanArgs},
    config::InspectorConfig,
    inspector::{NestingReport, PlacementReport, ScanReport, ThemeInspector},
    naming::format_file_size,
    nesting::{BlockCompatibility, SectionBlocks},
    pages::{page_type, Zone, PAGE_TYPES},
    placement::SectionPlacement,
    scanner::group_files_by_directory,
};

pub struct CliApp {
    config: InspectorConfig,
    inspector: ThemeInspector,
    verbose: bool,
}

impl CliApp {
    pub fn new(config: InspectorConfig, verbose: bool, colors_enabled: bool) -> Self {
        info!("Initializing themelens CLI for {}", config.theme.root.display());

        if !colors_enabled {
            colored::control::set_override(false);
        }

        let inspector = ThemeInspector::new(config.clone());
        Self {
            config,
            inspector,
            verbose,
        }
    }

    pub fn scan(&self, args: ScanArgs) -> Result<()> {
        let mut report = self
            .inspector
            .scan()
            .with_context(|| format!("Failed to scan {}", self.config.theme.root.display()))?;

        if args.schemas_only {
            report.files.retain(|f| f.has_schema);
            report.count = report.files.len();
        }

        match args.format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => print!("{}", format_scan(&report, self.verbose)),
        }
        Ok(())
    }

    pub fn pages(&self, args: PagesArgs) -> Result<()> {
        if let Some(key) = &args.page {
            if page_type(key).is_none() {
                let known: Vec<_> = PAGE_TYPES.iter().map(|p| p.key).collect();
                bail!("Unknown page type: {} (available: {})", key, known.join(", "));
            }
        }

        let report = self
            .inspector
            .sections_by_page()
            .context("Failed to analyze sections by page")?;

        match args.format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => print!("{}", format_pages(&report, args.page.as_deref())),
        }
        Ok(())
    }

    pub fn blocks(&self, args: BlocksArgs) -> Result<()> {
        let mut report = self
            .inspector
            .blocks_by_section()
            .context("Failed to analyze blocks by section")?;

        if let Some(section) = &args.section {
            report.report.section_blocks.retain(|s| &s.section_name == section);
            if report.report.section_blocks.is_empty() {
                bail!("No section named '{}' with a valid schema", section);
            }
        }

        match args.format {
            OutputFormat::Json => print_json(&report)?,
            OutputFormat::Text => print!("{}", format_blocks(&report, args.all)),
        }
        Ok(())
    }

    /// Returns `true` when the theme has findings.
    pub fn check(&self, args: CheckArgs) -> Result<bool> {
        let findings = self.inspector.check().context("Failed to check theme")?;

        match args.format {
            OutputFormat::Json => print_json(&findings)?,
            OutputFormat::Text => print!("{}", format_findings(&findings)),
        }
        Ok(!findings.is_empty())
    }

    pub fn show_config(&self) -> Result<()> {
        print_header("Configuration");
        println!("{}", self.config.to_toml().context("Failed to serialize configuration")?);

        match InspectorConfig::default_path() {
            Some(path) if path.exists() => println!("Config file: {}", path.display()),
            Some(path) => println!("Config file: {} (not present)", path.display()),
            None => println!("Config file: unavailable on this platform"),
        }
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report to JSON")?;
    println!("{}", json);
    Ok(())
}

fn print_header(title: &str) {
    println!("{}", format!("=== {} ===", title).bold());
}

fn header_line(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", format!("=== {} ===", title).bold());
}

pub fn format_scan(report: &ScanReport, verbose: bool) -> String {
    let mut out = String::new();
    header_line(&mut out, "Template Files");
    let _ = writeln!(out, "Scanned {} ({} files)", report.scanned_path.display(), report.count);

    for (directory, files) in group_files_by_directory(&report.files) {
        let _ = writeln!(out, "\n{} ({})", directory.cyan().bold(), files.len());
        for file in files {
            let status = match (&file.schema_error, file.has_schema) {
                (Some(_), _) => "invalid schema".red().to_string(),
                (None, true) => "schema".green().to_string(),
                (None, false) => "-".dimmed().to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<40} {:>9}  {}",
                file.name,
                format_file_size(file.size),
                status
            );
            if verbose {
                if let Some(error) = &file.schema_error {
                    let _ = writeln!(out, "      {}", error.dimmed());
                }
            }
        }
    }
    out
}

pub fn format_pages(report: &PlacementReport, only: Option<&str>) -> String {
    let mut out = String::new();
    header_line(&mut out, "Sections by Page");
    let _ = writeln!(
        out,
        "Scanned {} ({} section files)",
        report.scanned_path.display(),
        report.report.summary.total_sections
    );

    for summary in &report.report.summary.by_page {
        if only.is_some_and(|key| key != summary.page_type) {
            continue;
        }
        let Some(zones) = report.report.sections_by_page.get(&summary.page_type) else {
            continue;
        };

        let _ = writeln!(
            out,
            "\n{} ({}) - {} placements",
            summary.page_name.bold(),
            summary.page_type,
            summary.total
        );
        for zone in Zone::ALL {
            let sections = zones.zone(zone);
            let names: Vec<String> = sections.iter().map(section_label).collect();
            let _ = writeln!(
                out,
                "  {:<7} {:>3}  {}",
                zone.as_str().cyan(),
                sections.len(),
                names.join(", ")
            );
        }
    }
    out
}

fn section_label(section: &SectionPlacement) -> String {
    if section.has_presets {
        section.display_name.clone()
    } else {
        format!("{}*", section.display_name)
    }
}

pub fn format_blocks(report: &NestingReport, include_denied: bool) -> String {
    let mut out = String::new();
    let summary = &report.report.summary;
    header_line(&mut out, "Blocks by Section");
    let _ = writeln!(
        out,
        "{} sections, {} blocks ({} public, {} private); @theme: {}, @app: {}",
        summary.total_sections,
        summary.total_blocks,
        summary.public_blocks,
        summary.private_blocks,
        summary.sections_accepting_theme_blocks,
        summary.sections_accepting_app_blocks
    );

    for section in &report.report.section_blocks {
        write_section_blocks(&mut out, section, include_denied);
    }
    out
}

fn write_section_blocks(out: &mut String, section: &SectionBlocks, include_denied: bool) {
    let flag = |on: bool| if on { "yes".green() } else { "no".red() };
    let _ = writeln!(
        out,
        "\n{} [{}]  @theme: {}  @app: {}",
        section.section_display_name.bold(),
        section.section_file,
        flag(section.accepts_theme_blocks),
        flag(section.accepts_app_blocks)
    );

    if !section.local_blocks.is_empty() {
        let local: Vec<_> = section.local_blocks.iter().map(|b| b.block_type.as_str()).collect();
        let _ = writeln!(out, "  local: {}", local.join(", "));
    }

    for (label, blocks) in [
        ("public", &section.available_blocks.public_blocks),
        ("private", &section.available_blocks.private_blocks),
    ] {
        let allowed: Vec<_> = blocks
            .iter()
            .filter(|b| b.can_be_added_to_section)
            .map(|b| b.display_name.as_str())
            .collect();
        let _ = writeln!(out, "  {:<8} {:>3}  {}", label.cyan(), allowed.len(), allowed.join(", "));

        if include_denied {
            for block in blocks.iter().filter(|b| !b.can_be_added_to_section) {
                write_denied(out, block);
            }
        }
    }
}

fn write_denied(out: &mut String, block: &BlockCompatibility) {
    let _ = writeln!(
        out,
        "    {} {} ({})",
        "x".red(),
        block.display_name,
        block.reason.as_deref().unwrap_or_default().dimmed()
    );
}

pub fn format_findings(findings: &[Finding]) -> String {
    let mut out = String::new();
    header_line(&mut out, "Theme Check");
    if findings.is_empty() {
        let _ = writeln!(out, "{}", "No issues found".green());
        return out;
    }
    for finding in findings {
        let _ = writeln!(out, "  {} {}", "!".yellow(), finding);
    }
    let _ = writeln!(out, "{} issue(s)", findings.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn create_test_theme() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "sections/slideshow.liquid",
            r#"{% content_for 'blocks' %}
{% schema %}
{ "name": "t:names.slideshow", "presets": [{ "name": "Slideshow" }],
  "blocks": [{ "type": "@theme" }, { "type": "_slide" }] }
{% endschema %}"#,
        );
        write(
            dir.path(),
            "sections/main-product.liquid",
            r#"{% schema %}{ "name": "Product information", "blocks": [{ "type": "@app" }, { "type": "_ghost" }] }{% endschema %}"#,
        );
        write(dir.path(), "blocks/_slide.liquid", r#"{% schema %}{ "name": "Slide" }{% endschema %}"#);
        write(dir.path(), "blocks/text.liquid", r#"{% schema %}{ "name": "Text" }{% endschema %}"#);
        write(dir.path(), "blocks/broken.liquid", "{% schema %}{ oops {% endschema %}");
        write(
            dir.path(),
            "locales/en.default.schema.json",
            r#"/* generated */ { "names": { "slideshow": "Slideshow" } }"#,
        );
        dir
    }

    fn create_test_app(dir: &TempDir) -> CliApp {
        CliApp::new(InspectorConfig::default().with_root(dir.path()), false, false)
    }

    #[test]
    fn test_format_scan_groups_by_directory() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);
        let report = app.inspector.scan().unwrap();
        let text = format_scan(&report, true);

        assert!(text.contains("Template Files"));
        assert!(text.contains("blocks (3)"));
        assert!(text.contains("sections (2)"));
        assert!(text.contains("invalid schema"));
    }

    #[test]
    fn test_format_pages_marks_sections_without_presets() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);
        let report = app.inspector.sections_by_page().unwrap();

        let text = format_pages(&report, Some("product"));
        assert!(text.contains("Product Page (product)"));
        assert!(!text.contains("Home Page"));
        assert!(text.contains("Product information*, Slideshow"));
    }

    #[test]
    fn test_format_blocks_lists_denied_with_reason() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);
        let report = app.inspector.blocks_by_section().unwrap();

        let text = format_blocks(&report, true);
        assert!(text.contains("2 sections, 3 blocks (2 public, 1 private); @theme: 1, @app: 1"));
        assert!(text.contains("local: _ghost"));
        assert!(text.contains("Private block not explicitly allowed in this section"));

        let brief = format_blocks(&report, false);
        assert!(!brief.contains("not explicitly allowed"));
    }

    #[test]
    fn test_check_reports_dangling_private_reference() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);
        let has_findings = app.check(CheckArgs { format: OutputFormat::Json }).unwrap();
        assert!(has_findings);

        let findings = app.inspector.check().unwrap();
        assert_eq!(findings.len(), 1);
        assert!(format_findings(&findings).contains("_ghost"));
        assert!(format_findings(&[]).contains("No issues found"));
    }

    #[test]
    fn test_commands_succeed() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);

        assert!(app.scan(ScanArgs { format: OutputFormat::Json, schemas_only: true }).is_ok());
        assert!(app.pages(PagesArgs { format: OutputFormat::Text, page: None }).is_ok());
        assert!(app
            .blocks(BlocksArgs { format: OutputFormat::Text, section: Some("slideshow".to_string()), all: false })
            .is_ok());
        assert!(app.show_config().is_ok());
    }

    #[test]
    fn test_unknown_page_and_section_are_errors() {
        let dir = create_test_theme();
        let app = create_test_app(&dir);

        let err = app.pages(PagesArgs { format: OutputFormat::Text, page: Some("checkout".to_string()) });
        assert!(err.unwrap_err().to_string().contains("Unknown page type"));

        let err = app.blocks(BlocksArgs { format: OutputFormat::Text, section: Some("nope".to_string()), all: false });
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_theme_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let app = CliApp::new(InspectorConfig::default().with_root(dir.path().join("missing")), false, false);
        assert!(app.scan(ScanArgs { format: OutputFormat::Text, schemas_only: false }).is_err());
    }
}
