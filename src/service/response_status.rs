//! Response code lookup: map an (MTI, DE 39) pair to a short status label.

use crate::error::CodecError;
use crate::models::message::Iso8583Message;
use crate::service::mti;

/// Response codes for ISO 8583 messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    /// 00 - Approved
    Approved,
    /// 05 - Do not honor
    DoNotHonor,
    /// 12 - Invalid transaction
    InvalidTransaction,
    /// 13 - Invalid amount
    InvalidAmount,
    /// 14 - Invalid card number
    InvalidCard,
    /// 30 - Format error
    FormatError,
    /// 51 - Insufficient funds
    InsufficientFunds,
    /// 54 - Expired card
    ExpiredCard,
    /// 55 - Incorrect PIN
    IncorrectPin,
    /// 57 - Transaction not permitted
    NotPermitted,
    /// 58 - Transaction not permitted to terminal
    NotPermittedTerminal,
    /// 61 - Exceeds withdrawal limit
    ExceedsLimit,
    /// 91 - Issuer or switch inoperative
    IssuerInoperative,
    /// 96 - System malfunction
    SystemMalfunction,
}

impl ResponseCode {
    pub fn as_str(&self) -> &str {
        match self {
            ResponseCode::Approved => "00",
            ResponseCode::DoNotHonor => "05",
            ResponseCode::InvalidTransaction => "12",
            ResponseCode::InvalidAmount => "13",
            ResponseCode::InvalidCard => "14",
            ResponseCode::FormatError => "30",
            ResponseCode::InsufficientFunds => "51",
            ResponseCode::ExpiredCard => "54",
            ResponseCode::IncorrectPin => "55",
            ResponseCode::NotPermitted => "57",
            ResponseCode::NotPermittedTerminal => "58",
            ResponseCode::ExceedsLimit => "61",
            ResponseCode::IssuerInoperative => "91",
            ResponseCode::SystemMalfunction => "96",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "00" => Some(ResponseCode::Approved),
            "05" => Some(ResponseCode::DoNotHonor),
            "12" => Some(ResponseCode::InvalidTransaction),
            "13" => Some(ResponseCode::InvalidAmount),
            "14" => Some(ResponseCode::InvalidCard),
            "30" => Some(ResponseCode::FormatError),
            "51" => Some(ResponseCode::InsufficientFunds),
            "54" => Some(ResponseCode::ExpiredCard),
            "55" => Some(ResponseCode::IncorrectPin),
            "57" => Some(ResponseCode::NotPermitted),
            "58" => Some(ResponseCode::NotPermittedTerminal),
            "61" => Some(ResponseCode::ExceedsLimit),
            "91" => Some(ResponseCode::IssuerInoperative),
            "96" => Some(ResponseCode::SystemMalfunction),
            _ => None,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ResponseCode::Approved => "Approved",
            ResponseCode::DoNotHonor => "Do not honor",
            ResponseCode::InvalidTransaction => "Invalid transaction",
            ResponseCode::InvalidAmount => "Invalid amount",
            ResponseCode::InvalidCard => "Invalid card number",
            ResponseCode::FormatError => "Format error",
            ResponseCode::InsufficientFunds => "Insufficient funds",
            ResponseCode::ExpiredCard => "Expired card",
            ResponseCode::IncorrectPin => "Incorrect PIN",
            ResponseCode::NotPermitted => "Transaction not permitted",
            ResponseCode::NotPermittedTerminal => "Transaction not permitted to terminal",
            ResponseCode::ExceedsLimit => "Exceeds withdrawal limit",
            ResponseCode::IssuerInoperative => "Issuer or switch inoperative",
            ResponseCode::SystemMalfunction => "System malfunction",
        }
    }
}

/// Status label for a decoded response message. Requires field 0 to be a
/// response-class MTI and field 39 to be present; codes outside the
/// catalogue yield a generic label rather than an error.
pub fn status(message: &Iso8583Message) -> Result<String, CodecError> {
    let mti_value = message.mti().ok_or(CodecError::MtiMissing)?;
    mti::validate_mti(mti_value)?;
    if !mti::is_response(mti_value) {
        return Err(CodecError::MtiInvalid(mti_value.to_string()));
    }
    let code = message
        .get_field("39")
        .ok_or_else(|| CodecError::MissingField("39".to_string()))?;
    Ok(match ResponseCode::from_str(code) {
        Some(known) => known.description().to_string(),
        None => "Unknown response".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_conversion() {
        let code = ResponseCode::Approved;
        assert_eq!(code.as_str(), "00");
        assert_eq!(ResponseCode::from_str("00"), Some(ResponseCode::Approved));

        let code = ResponseCode::InsufficientFunds;
        assert_eq!(code.as_str(), "51");
        assert_eq!(code.description(), "Insufficient funds");
    }

    #[test]
    fn test_status_approved() {
        let msg = Iso8583Message::from([("0", "0210"), ("39", "00")]);
        assert_eq!(status(&msg).unwrap(), "Approved");
    }

    #[test]
    fn test_status_network_management_pair() {
        let msg = Iso8583Message::from([("0", "0810"), ("39", "91")]);
        assert_eq!(status(&msg).unwrap(), "Issuer or switch inoperative");
    }

    #[test]
    fn test_status_requires_response_mti() {
        let msg = Iso8583Message::from([("0", "0200"), ("39", "00")]);
        assert!(matches!(
            status(&msg).unwrap_err(),
            CodecError::MtiInvalid(_)
        ));
    }

    #[test]
    fn test_status_requires_field_39() {
        let msg = Iso8583Message::from([("0", "0210")]);
        assert!(matches!(
            status(&msg).unwrap_err(),
            CodecError::MissingField(f) if f == "39"
        ));
    }

    #[test]
    fn test_status_unknown_code() {
        let msg = Iso8583Message::from([("0", "0110"), ("39", "XX")]);
        assert_eq!(status(&msg).unwrap(), "Unknown response");
    }
}
