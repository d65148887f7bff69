//! Error types for vrender.
//!
//! The render core never fails: every guard in the scheduler, dispatcher and
//! layout engine degrades to a no-op. Errors exist only at the edges where
//! untrusted input enters the crate.
//!
//! # Error Hierarchy
//!
//! - [`DriverError`] - Top-level error of the headless driver binary
//!   - [`OptionError`] - Renderer option name/value parsing
//!   - [`ConfigError`](crate::config::ConfigError) - Config file loading
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing initialization
//!   - [`FoldError`](crate::host::FoldError) - Folds requested on the command line
//!   - `std::io::Error` - Reading the input document

use crate::config::ConfigError;
use crate::host::FoldError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when turning a `name=value` pair into a `RendererOption`.
///
/// # Examples
///
/// ```
/// use vrender::config::RendererOption;
/// use vrender::model::error::OptionError;
///
/// let err = RendererOption::parse("noSuchOption", "true").unwrap_err();
/// assert_eq!(err, OptionError::UnknownOption("noSuchOption".to_string()));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// The option name is not part of the renderer option table.
    #[error("Unknown renderer option: {0}")]
    UnknownOption(String),

    /// The value could not be parsed into the option's type.
    #[error("Invalid value {value:?} for option {name}: expected {expected}")]
    InvalidValue {
        /// Option name as given.
        name: String,
        /// Raw value as given.
        value: String,
        /// Human readable description of the accepted values.
        expected: &'static str,
    },
}

/// Top-level error of the headless driver.
///
/// All domain errors convert via `From`, so the binary's `main` can use `?`
/// throughout.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Config file could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    /// A `--option name=value` flag was rejected.
    #[error("Invalid option: {0}")]
    Option(#[from] OptionError),

    /// A `--fold` range was rejected by the document.
    #[error("Invalid fold: {0}")]
    Fold(#[from] FoldError),

    /// A `--fold` flag was not of the form `START:END`.
    #[error("Invalid fold {0:?}: expected START:END")]
    FoldSyntax(String),

    /// The input document could not be read.
    #[error("Failed to read document at {path:?}: {source}")]
    DocumentRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the report failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
