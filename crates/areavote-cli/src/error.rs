//! Error types for the `areavote` binary.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! during startup, the run, and output rendering.

/// Top-level error for the `areavote` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: areavote_core::config::ConfigError,
    },

    /// The configured run could not be started.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: areavote_core::runner::RunnerError,
    },

    /// Rendering the report as JSON failed.
    #[error("failed to render report: {source}")]
    Render {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing the report to stdout failed.
    #[error("failed to write report: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
