pub mod progress_formatter;
pub mod terminal;
