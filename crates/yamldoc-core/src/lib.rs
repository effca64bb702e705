//! # yamldoc Core
//!
//! Error type, encoding options, retry policy and configuration shared by
//! the `yamldoc` crates.
//!
//! ## Core Modules
//!
//! - [`error`] - Error enum, [`ErrorKind`] categories and the Result alias
//! - [`options`] - [`EncodeOptions`] flags and [`SchemaMode`]
//! - [`resilience`] - Bounded retry with fixed backoff
//! - [`config`] - Per-handle configuration with builder and YAML loading
//!
//! ## Usage Examples
//!
//! ### Configuration
//!
//! ```
//! use yamldoc_core::prelude::*;
//!
//! let config = HandleConfig::builder()
//!     .max_attempts(5)
//!     .backoff_ms(100)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.retry.max_attempts, 5);
//! ```
//!
//! ### Encoding flags
//!
//! ```
//! use yamldoc_core::EncodeOptions;
//!
//! let options = EncodeOptions::from_bits(448);
//! assert_eq!(options, EncodeOptions::default());
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod resilience;

pub use config::{HandleConfig, HandleConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use options::{EncodeOptions, SchemaMode};
pub use resilience::{RetryConfig, retry_with_backoff};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::HandleConfig;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::options::{EncodeOptions, SchemaMode};
    pub use crate::resilience::RetryConfig;
}
