/// Local file input and CSV output.
pub mod fs;
/// Blocking HTTP input.
pub mod http;
