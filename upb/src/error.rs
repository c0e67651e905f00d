/*!
Common error types for the UPB codec and UPE import.
*/

use thiserror::Error;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, UpbError>;

/// Error type for every codec and import operation
#[derive(Error, Debug)]
pub enum UpbError {
    /// A caller-supplied field is outside its legal domain
    #[error("{field} out of range: {value}")]
    Range { field: &'static str, value: u32 },

    /// The composed packet would exceed the wire limit
    #[error("packet length {length} exceeds maximum of {max} bytes")]
    Length { length: usize, max: usize },

    /// Malformed decoder input (short packet, empty payload, bad row)
    #[error("Invalid format: {0}")]
    Format(String),

    /// The byte sum of a received packet is not zero
    #[error("checksum mismatch: byte sum is 0x{sum:02X}, expected 0x00")]
    Checksum { sum: u8 },

    /// I/O errors while reading an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl UpbError {
    /// Create a new range error for the named field
    pub fn range(field: &'static str, value: impl Into<u32>) -> Self {
        Self::Range {
            field,
            value: value.into(),
        }
    }

    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

impl From<csv::Error> for UpbError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Self::Format(format!("CSV error: {}", err));
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            kind => Self::Format(format!("CSV error: {:?}", kind)),
        }
    }
}
