pub mod config;
pub mod error;
pub mod logging;
pub mod network;

pub use error::ScanError;
