//! DE 127 and DE 127.25 composite handling.
//!
//! Both composites are inner messages: a 64-bit bitmap in hex text followed
//! by the concatenated sub-field encodings. The same fold/expand engine
//! serves both, parameterised by key prefix; sub-field 1 is the bitmap slot
//! and never carries data of its own.

use tracing::warn;

use crate::error::CodecError;
use crate::formats::FormatRegistry;
use crate::models::message::Iso8583Message;
use crate::service::{bitmap, byte_util, field_codec};

const BITMAP_HEX_LEN: usize = 16;

/// Fold every composite the message carries sub-fields for, innermost
/// first: `127.25.k` into `127.25`, then `127.k` into `127`.
pub fn encode_extensions(
    message: &mut Iso8583Message,
    registry: &FormatRegistry<'_>,
) -> Result<(), CodecError> {
    encode_extension(message, "127.25.", "127.25", registry)?;
    encode_extension(message, "127.", "127", registry)
}

/// Fold the direct sub-fields of `prefix` into the composite value stored
/// under `target`. The composite bitmap also lands under sub-field 1
/// (`"127.1"` / `"127.25.1"`), which is what signals DE 127 presence to the
/// top-level bitmap builder. No-op when the message has no such sub-fields.
pub fn encode_extension(
    message: &mut Iso8583Message,
    prefix: &str,
    target: &str,
    registry: &FormatRegistry<'_>,
) -> Result<(), CodecError> {
    let has_sub_fields = message
        .sub_field_numbers(prefix)
        .into_iter()
        .any(|k| (2..=64).contains(&k));
    if !has_sub_fields {
        return Ok(());
    }

    let bitmap_hex = bitmap::create_bitmap(message, prefix, 64);
    let mut packed = bitmap_hex.clone().into_bytes();
    for (counter, bit) in byte_util::iterable_bitmap(&bitmap_hex)?.iter().enumerate() {
        if counter == 0 || *bit == 0 {
            continue;
        }
        let field = byte_util::construct_field(counter as u32 + 1, prefix);
        let value = message
            .get_field(&field)
            .ok_or_else(|| CodecError::MissingField(field.clone()))?;
        let fmt = registry
            .get(&field)
            .ok_or_else(|| CodecError::UnknownField {
                field: field.clone(),
            })?;
        packed.extend_from_slice(&field_codec::encode_field(&field, value, fmt)?);
    }

    let packed = String::from_utf8(packed).map_err(|_| CodecError::ValidationFailed {
        field: target.to_string(),
        expected: "printable composite content".to_string(),
    })?;
    message.set_field(byte_util::construct_field(1, prefix), bitmap_hex);
    message.set_field(target, packed);
    Ok(())
}

/// Expand every packed composite the message carries, outermost first.
pub fn expand_extensions(
    message: &mut Iso8583Message,
    registry: &FormatRegistry<'_>,
) -> Result<(), CodecError> {
    expand_extension(message, "127", "127.", registry)?;
    expand_extension(message, "127.25", "127.25.", registry)
}

/// Replace the packed composite under `key` with its dotted sub-fields.
/// The leading 16 hex chars are the inner bitmap and land under sub-field 1.
/// No-op when `key` is absent.
pub fn expand_extension(
    message: &mut Iso8583Message,
    key: &str,
    prefix: &str,
    registry: &FormatRegistry<'_>,
) -> Result<(), CodecError> {
    let Some(value) = message.remove_field(key) else {
        return Ok(());
    };
    let data = value.into_bytes();
    let (head, mut rest) =
        byte_util::slice(&data, 0, BITMAP_HEX_LEN).map_err(|_| CodecError::BitmapExtraction {
            needed: BITMAP_HEX_LEN,
            available: data.len(),
        })?;
    let bitmap_hex = String::from_utf8_lossy(head).to_uppercase();

    for (counter, bit) in byte_util::iterable_bitmap(&bitmap_hex)?.iter().enumerate() {
        if counter == 0 || *bit == 0 {
            continue;
        }
        let field = byte_util::construct_field(counter as u32 + 1, prefix);
        let fmt = registry.get(&field);
        let (sub_value, tail) = field_codec::decode_field(&field, rest, fmt)?;
        rest = tail;
        message.set_field(field, sub_value);
    }
    if !rest.is_empty() {
        warn!(
            composite = key,
            trailing = rest.len(),
            "composite carries trailing bytes beyond its bitmap"
        );
    }
    message.set_field(byte_util::construct_field(1, prefix), bitmap_hex);
    Ok(())
}
