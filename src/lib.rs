pub mod config;
pub mod error;
pub mod face;
pub mod http;
pub mod logger;
pub mod utils;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigLoader, ConfigOverrides};
pub use error::{FaceError, Result};
pub use face::{DetectParameters, Face, FaceAttribute};
