pub const ERROR_PREFIX: &str = "Error";
pub const HEADING_MARKER: &str = "##";
pub const PLACEHOLDER_BULLET: &str = "-";
pub const ENTRY_INDENT: &str = "  ";
