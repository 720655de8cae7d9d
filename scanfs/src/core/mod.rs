// === Sub-modules ===
pub mod checker;
pub mod errors;
pub mod formatter;
pub mod macros;
pub mod meta;

// === Core Traits ===
pub mod traits {
    pub use super::checker::FsChecker;
    pub use super::formatter::FsFormatter;
    pub use super::meta::FsMeta;
}

// === Error types ===
pub use errors::*;
