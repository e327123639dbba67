//! Terminal presentation for pgcheck.

pub mod banner;
pub mod report;
pub mod spinner;
pub mod terminal;

pub use banner::banner;
pub use report::{credentials_table, render_outcome};
pub use spinner::Spinner;
pub use terminal::{is_interactive, TerminalReader};
