/// Crate-level error types for doclink diagnostics.
use std::path::PathBuf;

/// All errors in doclink carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, span, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as doclink::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced document or config file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A strategy produced a span that cannot be sliced out of the text.
    /// Strategies must only emit in-bounds spans on UTF-8 boundaries.
    #[error("invalid span {start}..{end} in text of {len} bytes")]
    InvalidSpan {
        /// End offset of the offending span.
        end: usize,
        /// Length of the scanned text in bytes.
        len: usize,
        /// Start offset of the offending span.
        start: usize,
    },

    /// Underlying I/O error from the filesystem or an output stream.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of a stored object failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// A persistence sink refused an object.
    #[error("store failed: {reason}")]
    Store {
        /// Description of the sink failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A kind label in configuration or on the command line is not recognized.
    #[error("unknown kind: `{label}`")]
    UnknownKind {
        /// The label that did not match any kind.
        label: String,
    },
}
