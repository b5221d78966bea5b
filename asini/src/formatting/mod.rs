//! CLI output formatting.
//!
//! Colors, symbols and tables shared by every subcommand.

mod headers;
mod output;
mod progress;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{print_key_value, print_summary_box};
pub use progress::create_spinner;
pub use status::{print_error, print_info, print_success, print_warning};
pub use tables::{print_check_table, print_path_list};
