//! Tables and lists.

use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;

/// Prints a two-column table of named checks.
///
/// `None` values render as a dimmed dash.
pub fn print_check_table(rows: &[(&str, Option<String>)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Check", "Value"].map(|h| Cell::new(h).add_attribute(Attribute::Bold)));

    for (check, value) in rows {
        let value = match value {
            Some(v) => Cell::new(v).fg(Color::Cyan),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![Cell::new(check), value]);
    }

    println!("{table}");
}

/// Prints paths one per line, followed by a count.
pub fn print_path_list(paths: &[PathBuf]) {
    for path in paths {
        println!("  {}", path.display());
    }

    let count = match paths.len() {
        0 => "no files".to_string(),
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    };
    println!("  {}", count.bright_black());
}
