//! Error model shared across the MTI1 codec.

use thiserror::Error;

/// All errors produced by the codec.
///
/// One variant per closed error code (see [`MtiError::code`]). Every
/// variant carries a human-readable message; the two compression variants
/// additionally carry the underlying codec error as a source.
#[derive(Debug, Error)]
pub enum MtiError {
    #[error("invalid magic: {0}")]
    InvalidMagic(String),
    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid header length: {0}")]
    InvalidHeaderLength(String),
    #[error("invalid field value: {0}")]
    InvalidFieldValue(String),
    #[error("missing required field: {0}")]
    MissingRequiredField(String),
    #[error("header checksum mismatch: {0}")]
    HeaderChecksumMismatch(String),
    #[error("invalid payload length: {0}")]
    InvalidPayloadLength(String),
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(String),
    #[error("compression failed: {message}")]
    CompressionFailed {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("decompression failed: {message}")]
    DecompressionFailed {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("payload checksum mismatch: {0}")]
    PayloadChecksumMismatch(String),
    #[error("internal failure: {0}")]
    InternalFailure(String),
}

impl MtiError {
    /// Stable screaming-snake-case code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            MtiError::InvalidMagic(_) => "INVALID_MAGIC",
            MtiError::UnsupportedVersion(_) => "UNSUPPORTED_VERSION",
            MtiError::InvalidHeaderLength(_) => "INVALID_HEADER_LENGTH",
            MtiError::InvalidFieldValue(_) => "INVALID_FIELD_VALUE",
            MtiError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            MtiError::HeaderChecksumMismatch(_) => "HEADER_CHECKSUM_MISMATCH",
            MtiError::InvalidPayloadLength(_) => "INVALID_PAYLOAD_LENGTH",
            MtiError::UnsupportedCompression(_) => "UNSUPPORTED_COMPRESSION",
            MtiError::CompressionFailed { .. } => "COMPRESSION_FAILED",
            MtiError::DecompressionFailed { .. } => "DECOMPRESSION_FAILED",
            MtiError::PayloadChecksumMismatch(_) => "PAYLOAD_CHECKSUM_MISMATCH",
            MtiError::InternalFailure(_) => "INTERNAL_FAILURE",
        }
    }

    pub(crate) fn invalid_field(msg: impl Into<String>) -> Self {
        MtiError::InvalidFieldValue(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        MtiError::InternalFailure(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, MtiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(MtiError::InvalidMagic("x".into()).code(), "INVALID_MAGIC");
        assert_eq!(
            MtiError::CompressionFailed {
                message: "x".into(),
                cause: None
            }
            .code(),
            "COMPRESSION_FAILED"
        );
    }

    #[test]
    fn test_display() {
        let e = MtiError::PayloadChecksumMismatch("expected a, got b".into());
        assert_eq!(e.to_string(), "payload checksum mismatch: expected a, got b");
    }
}
