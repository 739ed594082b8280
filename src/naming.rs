//! Display helpers shared by both reports.

use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// `image_banner` -> `image banner`, `_icon` -> ` icon`.
pub fn humanize(key: &str) -> String {
    key.replace('_', " ")
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style ordering for display names.
///
/// Base letters decide first, so `Écran` sorts with the `e`s. Accents break ties
/// (`ecran` before `écran`), then case (lowercase first), so the order is total.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Allowed entries first, then by display name.
pub fn compare_verdicts(a_allowed: bool, a_name: &str, b_allowed: bool, b_name: &str) -> Ordering {
    b_allowed
        .cmp(&a_allowed)
        .then_with(|| compare_display_names(a_name, b_name))
}

/// Human readable size: `0 B`, `512 B`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}
