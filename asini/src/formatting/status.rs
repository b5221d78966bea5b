//! One-line status messages.
//!
//! Successes and notes go to stdout; warnings and errors go to stderr.

use std::fmt::Display;

use owo_colors::{OwoColorize, Style};

#[derive(Debug, Clone, Copy)]
enum Level {
    Done,
    Note,
    Caution,
    Failed,
}

impl Level {
    fn marker(self) -> &'static str {
        match self {
            Level::Done => "✓",
            Level::Note => "→",
            Level::Caution => "⚠",
            Level::Failed => "✗",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Done => Style::new().green().bold(),
            Level::Note => Style::new().cyan(),
            Level::Caution => Style::new().yellow().bold(),
            Level::Failed => Style::new().red().bold(),
        }
    }
}

fn status_line(level: Level, message: impl Display) -> String {
    let style = level.style();
    format!(
        "  {} {}",
        level.marker().style(style),
        message.to_string().style(style)
    )
}

pub fn print_success(message: impl Display) {
    println!("{}", status_line(Level::Done, message));
}

pub fn print_info(message: impl Display) {
    println!("{}", status_line(Level::Note, message));
}

pub fn print_warning(message: impl Display) {
    eprintln!("{}", status_line(Level::Caution, message));
}

pub fn print_error(message: impl Display) {
    eprintln!("{}", status_line(Level::Failed, message));
}
