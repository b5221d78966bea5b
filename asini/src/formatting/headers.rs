//! Section headers.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub enum SectionStyle {
    /// Title underlined with a rule of the same width.
    Primary,
    /// Dimmed title, no rule.
    Secondary,
}

pub fn print_section_header(title: &str, style: SectionStyle) {
    match style {
        SectionStyle::Primary => {
            let rule = "─".repeat(title.chars().count());
            println!("{}", title.cyan().bold());
            println!("{}", rule.bright_black());
        }
        SectionStyle::Secondary => println!("{}", title.bright_black().bold()),
    }
    println!();
}
