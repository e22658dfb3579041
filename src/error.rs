use thiserror::Error;

/// Errors surfaced by the codec. Every operation is total: it returns the
/// encoded/decoded value or exactly one of these, with no partial output.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("MTI is missing from the message")]
    MtiMissing,

    #[error("Invalid MTI: {0}")]
    MtiInvalid(String),

    #[error("Bitmap extraction failed: need {needed} bytes, {available} remain")]
    BitmapExtraction { needed: usize, available: usize },

    #[error("Invalid length: {offset}+{length} exceeds payload of {available} bytes")]
    InvalidLength {
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("Field {field}: length {actual} exceeds maximum {max}")]
    LengthExceeded {
        field: String,
        actual: usize,
        max: usize,
    },

    #[error("Field {field}: value does not match {expected}")]
    ValidationFailed { field: String, expected: String },

    #[error("Field {field}: no format descriptor")]
    UnknownField { field: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field}: invalid length prefix {prefix:?}")]
    InvalidLengthPrefix { field: String, prefix: String },

    #[error("Invalid composite data at tag {tag:?}, remaining: {remaining:?}")]
    InvalidCompositeData { tag: String, remaining: String },

    #[error("Format for field {field} is unusable: {attribute}")]
    FormatAmbiguous {
        field: String,
        attribute: &'static str,
    },

    #[error("Unknown sub-element codec for client {client:?}, field {field}")]
    UnknownClient { client: String, field: String },

    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("field {field}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Wrap an error with the identifier of the field being processed.
    pub fn in_field(self, field: &str) -> Self {
        CodecError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }
}
