//! Key/value output.

use owo_colors::OwoColorize;

/// Prints `items` in a box under `title`, keys padded to a common width.
pub fn print_summary_box(title: &str, items: &[(&str, &str)]) {
    let width = items.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);

    println!("┌─ {}", title.cyan().bold());
    for (key, value) in items {
        let key = format!("{:<width$}", key, width = width);
        println!("│ {}  {}", key.bright_black(), value.bold());
    }
    println!("└─");
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {}: {}", key.bright_black().bold(), value.white());
}
