pub mod attr;
pub mod checker;
pub mod constant;
pub mod dir;
pub mod fat;
pub mod formatter;
pub mod meta;
pub mod types;
pub mod utils;

// === Public Interface ===
pub mod traits {
    pub use super::checker::{Fat12CheckOptions, Fat12Checker, SlackPolicy};
    pub use super::formatter::Fat12Formatter;
    pub use super::meta::Fat12Meta;
}

pub mod prelude {
    pub use super::attr::Fat12Attributes;
    pub use super::checker::{
        ChainMeasure, Finding, Severity, Verdict, VerifyPhases, VerifyReport, VisitedClusters,
        WalkMode,
    };
    pub use super::dir::DirRegion;
    pub use super::traits::*;
    pub use super::types::{DecodedEntry, DirEntryKind, Fat12Bpb, Fat12Entry};
    pub use crate::core::errors::*;
    pub use crate::core::traits::*;
    pub use scanio::prelude::*;
}
