//! DE 120 sub-element codec for the PPN client layout.
//!
//! Unlike the DE 127 composites, DE 120 is a tag-length-value sequence:
//! each sub-field is a 3-digit tag, a 3-digit decimal length, then that many
//! bytes of value. Packing always emits the canonical tag order; the
//! declared length always wins on unpack, including for tags 047/050/056.

use crate::error::CodecError;
use crate::models::message::Iso8583Message;
use crate::service::byte_util;

/// A client-specific composite field codec. Implementations serialize a set
/// of dotted sub-fields to a single field value and back.
pub trait SubElementCodec: Sync {
    /// Client tag the codec is registered under.
    fn client(&self) -> &'static str;
    /// Field the composite rides in.
    fn field(&self) -> &'static str;
    fn pack(&self, message: &Iso8583Message) -> Result<String, CodecError>;
    fn unpack(&self, data: &str) -> Result<Iso8583Message, CodecError>;
}

/// Canonical PPN sub-field table: wire tag, sub-field number, label.
const PPN_SUB_FIELDS: &[(&str, u32, &str)] = &[
    ("001", 1, "Transaction Type"),
    ("045", 45, "Remitter Name"),
    ("046", 46, "Beneficiary Name"),
    ("047", 47, "Original Transaction Detail"),
    ("050", 50, "Remitter Proc Info"),
    ("056", 56, "Channel Indicator"),
    ("062", 62, "Beneficiary Account Number"),
    ("070", 70, "Remitter Address"),
    ("071", 71, "Remitter SWIFT Code"),
    ("072", 72, "Beneficiary Address"),
    ("073", 73, "Beneficiary SWIFT Code"),
    ("074", 74, "Transaction Reason"),
    ("075", 75, "Remitter Transaction Reference"),
];

const TAG_LEN: usize = 3;
const LEN_LEN: usize = 3;
const MAX_SUB_FIELD_LEN: usize = 999;

/// DE 120 codec for the PPN layout.
pub struct PpnCodec;

static PPN: PpnCodec = PpnCodec;

impl PpnCodec {
    fn sub_field_for_tag(tag: &str) -> Option<u32> {
        PPN_SUB_FIELDS
            .iter()
            .find(|(t, _, _)| *t == tag)
            .map(|(_, n, _)| *n)
    }
}

impl SubElementCodec for PpnCodec {
    fn client(&self) -> &'static str {
        "PPN"
    }

    fn field(&self) -> &'static str {
        "120"
    }

    /// Emit the present `120.N` sub-fields in canonical tag order.
    fn pack(&self, message: &Iso8583Message) -> Result<String, CodecError> {
        let mut out = String::new();
        for (tag, n, _) in PPN_SUB_FIELDS {
            let field = byte_util::construct_field(*n, "120.");
            let Some(value) = message.get_field(&field) else {
                continue;
            };
            if value.len() > MAX_SUB_FIELD_LEN {
                return Err(CodecError::LengthExceeded {
                    field,
                    actual: value.len(),
                    max: MAX_SUB_FIELD_LEN,
                });
            }
            out.push_str(tag);
            out.push_str(&byte_util::pad_string(&value.len().to_string(), '0', LEN_LEN));
            out.push_str(value);
        }
        Ok(out)
    }

    /// Walk the TLV stream to the end of input. Unknown tags and truncated
    /// records abort with the remaining buffer for diagnostics.
    fn unpack(&self, data: &str) -> Result<Iso8583Message, CodecError> {
        let mut message = Iso8583Message::new();
        let mut rest = data;
        while !rest.is_empty() {
            let (tag, after_tag) = split_at_checked(rest, TAG_LEN).ok_or_else(|| {
                CodecError::InvalidCompositeData {
                    tag: rest.to_string(),
                    remaining: rest.to_string(),
                }
            })?;
            let sub_field = Self::sub_field_for_tag(tag).ok_or_else(|| {
                CodecError::InvalidCompositeData {
                    tag: tag.to_string(),
                    remaining: rest.to_string(),
                }
            })?;
            let (len_text, after_len) =
                split_at_checked(after_tag, LEN_LEN).ok_or_else(|| {
                    CodecError::InvalidCompositeData {
                        tag: tag.to_string(),
                        remaining: rest.to_string(),
                    }
                })?;
            let value_len: usize =
                len_text
                    .parse()
                    .map_err(|_| CodecError::InvalidLengthPrefix {
                        field: byte_util::construct_field(sub_field, "120."),
                        prefix: len_text.to_string(),
                    })?;
            let (value, tail) = split_at_checked(after_len, value_len).ok_or_else(|| {
                CodecError::InvalidCompositeData {
                    tag: tag.to_string(),
                    remaining: rest.to_string(),
                }
            })?;
            message.set_field(byte_util::construct_field(sub_field, "120."), value);
            rest = tail;
        }
        Ok(message)
    }
}

fn split_at_checked(s: &str, mid: usize) -> Option<(&str, &str)> {
    if s.len() < mid || !s.is_char_boundary(mid) {
        return None;
    }
    Some(s.split_at(mid))
}

/// Resolve the codec registered for a (client, field) pair.
pub fn sub_element_codec(
    client: &str,
    field: &str,
) -> Result<&'static dyn SubElementCodec, CodecError> {
    match (client.to_uppercase().as_str(), field) {
        ("PPN", "120") => Ok(&PPN),
        _ => Err(CodecError::UnknownClient {
            client: client.to_string(),
            field: field.to_string(),
        }),
    }
}
