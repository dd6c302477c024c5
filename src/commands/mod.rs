mod baseline;
mod check;
mod parse;

// Re-export command functions for convenience
pub use baseline::baseline;
pub use check::check;
pub use parse::parse;
