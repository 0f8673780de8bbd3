pub mod serde_helpers;
pub mod time;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "test")]
pub mod test;
