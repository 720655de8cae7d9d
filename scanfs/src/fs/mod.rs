#[cfg(feature = "fat12")]
pub mod fat12;
