#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
#[macro_use]
extern crate alloc;

// Core Modules
pub mod core;
pub mod fs;

// Reusable types and traits
pub use core::traits::*;

// Filesystem APIs
#[cfg(feature = "fat12")]
/// FAT12 checker and repairer.
///
/// See [`fat12::Fat12Checker`], [`fat12::Fat12Meta`] and [`fat12::Fat12Formatter`].
pub mod fat12 {
    pub use super::fs::fat12::prelude::*;
}
