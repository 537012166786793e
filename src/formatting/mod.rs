// Rendering parsed statements back to BAI2 record text

mod formatter;

// Re-export all public symbols
pub use formatter::*;
