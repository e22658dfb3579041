//! Top-level message orchestration: TCP length header, static meta, MTI,
//! bitmaps, and the field walk. Encode and decode are exact mirrors.
//!
//! Counters 0 and 64 of the combined bitmap are the secondary/tertiary
//! continuation markers and never correspond to data; counter 63 (DE 64)
//! does and is walked like any other. A 192-bit walk also skips counter 128
//! for the same reason.

use tracing::{debug, warn};

use crate::error::CodecError;
use crate::formats::FormatRegistry;
use crate::models::message::Iso8583Message;
use crate::models::options::{BitmapEncoding, CodecOptions};
use crate::service::{bitmap, byte_util, extension_codec, field_codec, mti};

const MTI_LEN: usize = 4;

fn is_continuation(counter: usize) -> bool {
    counter == 0 || counter == 64 || counter == 128
}

/// Encode a structured message to wire bytes.
pub fn encode(message: &Iso8583Message, opts: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut msg = message.clone();
    extension_codec::encode_extensions(&mut msg, &registry)?;

    let mti_value = msg.mti().ok_or(CodecError::MtiMissing)?.to_string();
    mti::validate_mti(&mti_value)?;

    let bitmap_hex = bitmap::create_bitmap(&msg, "", 128);

    let mut body = Vec::new();
    if let Some(meta) = &opts.static_meta {
        body.extend_from_slice(meta);
    }
    body.extend_from_slice(mti_value.as_bytes());
    match opts.bitmap_encoding {
        BitmapEncoding::Hex => body.extend_from_slice(&byte_util::hex_to_bytes(&bitmap_hex)?),
        BitmapEncoding::Ascii => body.extend_from_slice(bitmap_hex.as_bytes()),
    }

    for (counter, bit) in byte_util::iterable_bitmap(&bitmap_hex)?.iter().enumerate() {
        if is_continuation(counter) || *bit == 0 {
            continue;
        }
        let field = byte_util::construct_field(counter as u32 + 1, "");
        let value = msg
            .get_field(&field)
            .ok_or_else(|| CodecError::MissingField(field.clone()))?;
        let fmt = registry
            .get(&field)
            .ok_or_else(|| CodecError::UnknownField {
                field: field.clone(),
            })?;
        let encoded = field_codec::encode_field(&field, value, fmt)?;
        if opts.de_detail {
            debug!(field = %field, bytes = encoded.len(), "encoded data element");
        }
        body.extend_from_slice(&encoded);
    }

    if !opts.tcp_len_header {
        return Ok(body);
    }
    if body.len() > u16::MAX as usize {
        return Err(CodecError::LengthExceeded {
            field: "message".to_string(),
            actual: body.len(),
            max: u16::MAX as usize,
        });
    }
    let mut out = byte_util::encode_tcp_header(&body).to_vec();
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode wire bytes to a structured message. DE 127 and DE 127.25 are
/// expanded into their dotted sub-fields when present.
pub fn decode(payload: &[u8], opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut rest = payload;

    if opts.tcp_len_header {
        let (declared, tail) = byte_util::extract_tcp_header(rest)?;
        rest = tail;
        if declared != rest.len() {
            // advisory only, framing is driven by the bitmap and formats
            warn!(
                declared,
                actual = rest.len(),
                "TCP length header disagrees with payload length"
            );
        }
    }
    if let Some(meta) = &opts.static_meta {
        let (_, tail) = byte_util::slice(rest, 0, meta.len())?;
        rest = tail;
    }

    let (mti_bytes, tail) = byte_util::slice(rest, 0, MTI_LEN).map_err(|_| CodecError::MtiMissing)?;
    rest = tail;
    let mti_value = String::from_utf8_lossy(mti_bytes).to_string();
    mti::validate_mti(&mti_value)?;

    let (bitmap_hex, tail) = bitmap::extract_bitmap(rest, opts.bitmap_encoding)?;
    rest = tail;

    let mut msg = Iso8583Message::new();
    for (counter, bit) in byte_util::iterable_bitmap(&bitmap_hex)?.iter().enumerate() {
        if is_continuation(counter) || *bit == 0 {
            continue;
        }
        let field = byte_util::construct_field(counter as u32 + 1, "");
        let fmt = registry.get(&field);
        let (value, tail) = field_codec::decode_field(&field, rest, fmt)?;
        if opts.de_detail {
            debug!(field = %field, bytes = rest.len() - tail.len(), "decoded data element");
        }
        rest = tail;
        msg.set_field(field, value);
    }
    if !rest.is_empty() {
        warn!(
            trailing = rest.len(),
            "payload carries trailing bytes beyond the last field"
        );
    }

    msg.set_field("0", mti_value);
    extension_codec::expand_extensions(&mut msg, &registry)?;
    Ok(msg)
}

/// Validate a structured message against the effective format registry
/// without encoding it.
pub fn valid(message: &Iso8583Message, opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mti_value = message.mti().ok_or(CodecError::MtiMissing)?;
    mti::validate_mti(mti_value)?;
    for id in message.field_ids() {
        if id == "0" {
            continue;
        }
        let Some(value) = message.get_field(&id) else {
            continue;
        };
        // unknown-format fields decode to empty values; nothing to check
        if value.is_empty() {
            continue;
        }
        if let Some(fmt) = registry.get(&id) {
            field_codec::validate_value(&id, value, fmt)?;
        }
    }
    Ok(message.clone())
}

/// Decode and validate wire bytes in one step.
pub fn valid_bytes(payload: &[u8], opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    let message = decode(payload, opts)?;
    valid(&message, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_echo() -> Iso8583Message {
        Iso8583Message::from([
            ("0", "0800"),
            ("7", "0818160244"),
            ("11", "646465"),
            ("12", "160244"),
            ("13", "0818"),
            ("70", "001"),
        ])
    }

    #[test]
    fn test_encode_simple_0800() {
        let bytes = encode(&network_echo(), &CodecOptions::default()).unwrap();
        assert_eq!(bytes.len(), 51);
        assert_eq!(&bytes[..2], &[0x00, 0x31]);
        assert_eq!(&bytes[2..6], b"0800");
        assert_eq!(
            bytes[6..22],
            hex::decode("82380000000000000400000000000000").unwrap()
        );
        assert_eq!(&bytes[22..32], b"0818160244");
    }

    #[test]
    fn test_decode_simple_0800() {
        let msg = network_echo();
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        assert_eq!(decode(&bytes, &CodecOptions::default()).unwrap(), msg);
    }

    #[test]
    fn test_secondary_and_127_bits() {
        let msg = Iso8583Message::from([("0", "0800"), ("70", "001"), ("127.2", "12345678")]);
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        let bitmap = byte_util::bytes_to_hex(&bytes[6..22]);
        assert!(bitmap.starts_with('8'));
        let bits = byte_util::iterable_bitmap(&bitmap).unwrap();
        assert_eq!(bits[0], 1); // secondary always present
        assert_eq!(bits[69], 1); // field 70
        assert_eq!(bits[126], 1); // field 127

        let decoded = decode(&bytes, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.get_field("70"), Some("001"));
        assert_eq!(decoded.get_field("127.2"), Some("12345678"));
        assert_eq!(decoded.get_field("127.1"), Some("4000000000000000"));
        assert!(!decoded.has_field("127"));
    }

    #[test]
    fn test_validation_failure_emits_nothing() {
        let msg = Iso8583Message::from([("0", "0800"), ("2", "AAAA")]);
        let err = encode(&msg, &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ValidationFailed { ref field, .. } if field == "2"
        ));
    }

    #[test]
    fn test_field_64_is_data_not_continuation() {
        let msg = Iso8583Message::from([
            ("0", "0800"),
            ("64", "00112233445566AA"),
            ("66", "1"),
        ]);
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        let decoded = decode(&bytes, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.get_field("64"), Some("00112233445566AA"));
        assert_eq!(decoded.get_field("66"), Some("1"));
    }

    #[test]
    fn test_bitmap_boundary_fields() {
        // fields 2, 64, 66 and 128 sit right around the continuation
        // positions; all four are data and must survive the walk
        let msg = Iso8583Message::from([
            ("0", "0800"),
            ("2", "4111111111111111"),
            ("64", "AABBCCDD00112233"),
            ("66", "1"),
            ("128", "FFEEDDCC00112233"),
        ]);
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        let decoded = decode(&bytes, &CodecOptions::default()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_field_65_reserved_for_tertiary_marker() {
        let msg = Iso8583Message::from([
            ("0", "0800"),
            ("65", "0011223344556677"),
            ("66", "1"),
        ]);
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        let decoded = decode(&bytes, &CodecOptions::default()).unwrap();
        assert!(!decoded.has_field("65"));
        assert_eq!(decoded.get_field("66"), Some("1"));
    }

    #[test]
    fn test_decode_tertiary_bitmap() {
        // secondary and tertiary continuation bits set, field 130 present;
        // no format is registered above 128 so the field decodes empty
        let mut payload = vec![0x00, 0x1C];
        payload.extend_from_slice(b"0800");
        payload.extend_from_slice(&hex::decode("800000000000000080000000000000004000000000000000").unwrap());
        let decoded = decode(&payload, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.get_field("130"), Some(""));
        assert_eq!(decoded.field_count(), 2); // MTI + field 130
    }

    #[test]
    fn test_ascii_bitmap_encoding() {
        let opts = CodecOptions {
            bitmap_encoding: BitmapEncoding::Ascii,
            ..Default::default()
        };
        let msg = network_echo();
        let bytes = encode(&msg, &opts).unwrap();
        // 2 header + 4 MTI + 32 ASCII bitmap chars + 29 field bytes
        assert_eq!(bytes.len(), 67);
        assert_eq!(&bytes[6..38], b"82380000000000000400000000000000");
        assert_eq!(decode(&bytes, &opts).unwrap(), msg);
    }

    #[test]
    fn test_static_meta_and_no_tcp_header() {
        let opts = CodecOptions {
            tcp_len_header: false,
            static_meta: Some(b"ISO".to_vec()),
            ..Default::default()
        };
        let msg = network_echo();
        let bytes = encode(&msg, &opts).unwrap();
        assert_eq!(&bytes[..7], b"ISO0800");
        assert_eq!(bytes.len(), 52);
        assert_eq!(decode(&bytes, &opts).unwrap(), msg);
    }

    #[test]
    fn test_composite_round_trip_through_wire() {
        let msg = Iso8583Message::from([
            ("0", "0200"),
            ("2", "4111111111111111"),
            ("4", "000000012345"),
            ("127.25.2", "000000012345"),
            ("127.25.18", "840"),
        ]);
        let bytes = encode(&msg, &CodecOptions::default()).unwrap();
        let decoded = decode(&bytes, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.get_field("2"), Some("4111111111111111"));
        assert_eq!(decoded.get_field("127.25.2"), Some("000000012345"));
        assert_eq!(decoded.get_field("127.25.18"), Some("840"));
        // re-encoding the decoded message reproduces the wire bytes
        assert_eq!(encode(&decoded, &CodecOptions::default()).unwrap(), bytes);
    }

    #[test]
    fn test_encode_missing_mti() {
        let msg = Iso8583Message::from([("2", "4111111111111111")]);
        assert!(matches!(
            encode(&msg, &CodecOptions::default()).unwrap_err(),
            CodecError::MtiMissing
        ));
    }

    #[test]
    fn test_encode_unknown_field_with_replace_strategy() {
        use crate::models::format::{ContentType, FormatDescriptor, LenType};
        use crate::models::options::FormatStrategy;
        use std::collections::HashMap;

        let mut formats = HashMap::new();
        formats.insert(
            "0".to_string(),
            FormatDescriptor::new(ContentType::Numeric, LenType::Fixed, 4, "MTI"),
        );
        let opts = CodecOptions {
            formats: Some(formats),
            format_strategy: FormatStrategy::Replace,
            ..Default::default()
        };
        let msg = Iso8583Message::from([("0", "0800"), ("2", "123")]);
        assert!(matches!(
            encode(&msg, &opts).unwrap_err(),
            CodecError::UnknownField { ref field } if field == "2"
        ));
    }

    #[test]
    fn test_decode_invalid_mti() {
        let mut payload = vec![0x00, 0x14];
        payload.extend_from_slice(b"0900");
        payload.extend_from_slice(&[0x80; 16]);
        assert!(matches!(
            decode(&payload, &CodecOptions::default()).unwrap_err(),
            CodecError::MtiInvalid(_)
        ));
    }

    #[test]
    fn test_decode_truncated_bitmap() {
        let mut payload = vec![0x00, 0x08];
        payload.extend_from_slice(b"0800");
        payload.extend_from_slice(&[0x82, 0x38]);
        assert!(matches!(
            decode(&payload, &CodecOptions::default()).unwrap_err(),
            CodecError::BitmapExtraction { .. }
        ));
    }

    #[test]
    fn test_valid_accepts_and_rejects() {
        let opts = CodecOptions::default();
        assert!(valid(&network_echo(), &opts).is_ok());

        let bad = Iso8583Message::from([("0", "0800"), ("11", "ABC123")]);
        assert!(matches!(
            valid(&bad, &opts).unwrap_err(),
            CodecError::ValidationFailed { ref field, .. } if field == "11"
        ));
    }

    #[test]
    fn test_de_detail_logging_does_not_alter_result() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
        let opts = CodecOptions {
            de_detail: true,
            ..Default::default()
        };
        let msg = network_echo();
        let bytes = encode(&msg, &opts).unwrap();
        assert_eq!(decode(&bytes, &opts).unwrap(), msg);
    }

    #[test]
    fn test_valid_bytes() {
        let bytes = encode(&network_echo(), &CodecOptions::default()).unwrap();
        let msg = valid_bytes(&bytes, &CodecOptions::default()).unwrap();
        assert_eq!(msg.get_field("11"), Some("646465"));
    }
}
