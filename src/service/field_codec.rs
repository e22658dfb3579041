//! Encode/decode of a single data element against its format descriptor.
//!
//! Framing is entirely descriptor-driven: fixed fields occupy `max_len`
//! bytes (`max_len / 2` raw bytes for binary content), variable fields carry
//! an ASCII-decimal length prefix. Binary content travels as raw bytes on
//! the wire and as uppercase hex text in the message map; its length prefix
//! counts hex characters.

use regex::Regex;

use crate::error::CodecError;
use crate::models::format::{ContentType, FormatDescriptor, LenType, PadDirection};
use crate::service::byte_util;

/// Check a value against the descriptor without encoding it: content-type
/// pattern, optional extra pattern, then length bounds.
pub fn validate_value(field: &str, value: &str, fmt: &FormatDescriptor) -> Result<(), CodecError> {
    if !fmt.content_type.pattern().is_match(value) {
        return Err(CodecError::ValidationFailed {
            field: field.to_string(),
            expected: fmt.content_type.code().to_string(),
        });
    }
    apply_custom_validation(field, value, fmt)?;
    if value.len() > fmt.max_len {
        return Err(CodecError::LengthExceeded {
            field: field.to_string(),
            actual: value.len(),
            max: fmt.max_len,
        });
    }
    if let Some(min_len) = fmt.min_len {
        if value.len() < min_len {
            return Err(CodecError::ValidationFailed {
                field: field.to_string(),
                expected: format!("min_len {min_len}"),
            });
        }
    }
    Ok(())
}

fn apply_custom_validation(
    field: &str,
    value: &str,
    fmt: &FormatDescriptor,
) -> Result<(), CodecError> {
    let Some(pattern) = fmt.validation.as_deref() else {
        return Ok(());
    };
    let re = Regex::new(pattern).map_err(|_| CodecError::FormatAmbiguous {
        field: field.to_string(),
        attribute: "validation pattern does not compile",
    })?;
    if !re.is_match(value) {
        return Err(CodecError::ValidationFailed {
            field: field.to_string(),
            expected: pattern.to_string(),
        });
    }
    Ok(())
}

/// Encode one field. The caller is responsible for the bitmap bit; absent
/// fields simply never reach this function.
pub fn encode_field(
    field: &str,
    value: &str,
    fmt: &FormatDescriptor,
) -> Result<Vec<u8>, CodecError> {
    validate_value(field, value, fmt)?;

    let value = if fmt.len_type.is_fixed() {
        pad_fixed(value, fmt)
    } else {
        value.to_string()
    };

    if fmt.len_type.is_fixed() {
        return encode_content(field, &value, fmt.content_type);
    }

    let digits = fmt.len_type.prefix_digits();
    if fmt.max_len >= 10usize.pow(digits as u32) {
        return Err(CodecError::FormatAmbiguous {
            field: field.to_string(),
            attribute: "max_len exceeds length prefix capacity",
        });
    }
    let mut out = byte_util::pad_string(&value.len().to_string(), '0', digits).into_bytes();
    out.extend_from_slice(&encode_content(field, &value, fmt.content_type)?);
    Ok(out)
}

fn pad_fixed(value: &str, fmt: &FormatDescriptor) -> String {
    let Some(padding) = fmt.padding else {
        return value.to_string();
    };
    if value.len() >= fmt.max_len {
        return value.to_string();
    }
    match padding.direction {
        PadDirection::Left => byte_util::pad_string(value, padding.pad_char, fmt.max_len),
        PadDirection::Right => {
            let mut out = String::with_capacity(fmt.max_len);
            out.push_str(value);
            while out.len() < fmt.max_len {
                out.push(padding.pad_char);
            }
            out
        }
    }
}

fn encode_content(field: &str, value: &str, content_type: ContentType) -> Result<Vec<u8>, CodecError> {
    match content_type {
        ContentType::Binary => byte_util::hex_to_bytes(value).map_err(|e| e.in_field(field)),
        _ => Ok(value.as_bytes().to_vec()),
    }
}

/// Decode one field off the front of `payload`, returning the value and the
/// remaining bytes. A missing descriptor leaves the field empty without
/// consuming anything, so the bitmap walk can continue.
pub fn decode_field<'a>(
    field: &str,
    payload: &'a [u8],
    fmt: Option<&FormatDescriptor>,
) -> Result<(String, &'a [u8]), CodecError> {
    let Some(fmt) = fmt else {
        return Ok((String::new(), payload));
    };

    let (data_len, payload) = match fmt.len_type {
        LenType::Fixed => (fmt.max_len, payload),
        _ => decode_length_prefix(field, payload, fmt)?,
    };

    let (value, rest) = match fmt.content_type {
        ContentType::Binary => {
            if data_len % 2 != 0 {
                return Err(CodecError::InvalidLengthPrefix {
                    field: field.to_string(),
                    prefix: data_len.to_string(),
                });
            }
            let (head, rest) = byte_util::slice(payload, 0, data_len / 2)
                .map_err(|e| e.in_field(field))?;
            (byte_util::bytes_to_hex(head), rest)
        }
        _ => {
            let (head, rest) =
                byte_util::slice(payload, 0, data_len).map_err(|e| e.in_field(field))?;
            (String::from_utf8_lossy(head).to_string(), rest)
        }
    };

    apply_custom_validation(field, &value, fmt)?;
    Ok((value, rest))
}

fn decode_length_prefix<'a>(
    field: &str,
    payload: &'a [u8],
    fmt: &FormatDescriptor,
) -> Result<(usize, &'a [u8]), CodecError> {
    let digits = fmt.len_type.prefix_digits();
    let (head, rest) = byte_util::slice(payload, 0, digits).map_err(|e| e.in_field(field))?;
    let prefix = String::from_utf8_lossy(head).to_string();
    let data_len: usize = prefix
        .parse()
        .map_err(|_| CodecError::InvalidLengthPrefix {
            field: field.to_string(),
            prefix: prefix.clone(),
        })?;
    if data_len > fmt.max_len {
        return Err(CodecError::LengthExceeded {
            field: field.to_string(),
            actual: data_len,
            max: fmt.max_len,
        });
    }
    Ok((data_len, rest))
}
