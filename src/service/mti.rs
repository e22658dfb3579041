//! Message Type Indicator validation.

use crate::error::CodecError;

/// MTIs the codec accepts, 1987 version.
pub const KNOWN_MTIS: &[&str] = &[
    "0100", "0101", "0110", "0120", "0121", "0130", "0200", "0201", "0210", "0220", "0221",
    "0230", "0320", "0321", "0330", "0400", "0401", "0410", "0420", "0421", "0430", "0500",
    "0501", "0510", "0520", "0521", "0530", "0600", "0601", "0610", "0620", "0621", "0630",
    "0800", "0801", "0810", "0820",
];

/// Check a 4-character MTI against the allow-list.
pub fn validate_mti(mti: &str) -> Result<(), CodecError> {
    if mti.len() == 4 && KNOWN_MTIS.contains(&mti) {
        Ok(())
    } else {
        Err(CodecError::MtiInvalid(mti.to_string()))
    }
}

/// Is this the MTI of a response message?
pub fn is_response(mti: &str) -> bool {
    matches!(
        mti,
        "0110" | "0130" | "0210" | "0230" | "0330" | "0410" | "0430" | "0510" | "0530" | "0610"
            | "0630" | "0810"
    )
}

/// The response MTI paired with a request MTI.
pub fn response_mti(mti: &str) -> Option<&'static str> {
    match mti {
        "0100" => Some("0110"),
        "0200" => Some("0210"),
        "0400" => Some("0410"),
        "0500" => Some("0510"),
        "0600" => Some("0610"),
        "0800" => Some("0810"),
        _ => None,
    }
}
