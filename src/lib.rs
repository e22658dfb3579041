//! Bidirectional ISO 8583 codec for card payment messages.
//!
//! A structured message is a map from field identifier (`"2"`, `"127.25.3"`,
//! ...) to value; `encode` turns it into wire bytes and `decode` turns wire
//! bytes back into the map. Framing is driven by a per-field format table:
//! primary/secondary/tertiary bitmaps, fixed and `l..lvar` length classes,
//! binary/hex conversion, plus the DE 127 and DE 127.25 composites and a
//! pluggable TLV codec for DE 120.
//!
//! ```
//! use iso8583_codec::{CodecOptions, Iso8583Message};
//!
//! # fn main() -> Result<(), iso8583_codec::CodecError> {
//! let message = Iso8583Message::from([
//!     ("0", "0800"),
//!     ("7", "0818160244"),
//!     ("11", "646465"),
//!     ("70", "001"),
//! ]);
//! let opts = CodecOptions::default();
//! let bytes = iso8583_codec::encode(&message, &opts)?;
//! let decoded = iso8583_codec::decode(&bytes, &opts)?;
//! assert_eq!(decoded, message);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod formats;
pub mod models;
pub mod service;

pub use error::CodecError;
pub use formats::{DEFAULT_FORMATS, FormatRegistry};
pub use models::format::{ContentType, FormatDescriptor, LenType, PadDirection, Padding};
pub use models::message::Iso8583Message;
pub use models::options::{BitmapEncoding, CodecOptions, FormatStrategy};
pub use service::ppn_codec::{PpnCodec, SubElementCodec};
pub use service::response_status::ResponseCode;

/// Encode a structured message to wire bytes.
pub fn encode(message: &Iso8583Message, opts: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    service::message_codec::encode(message, opts)
}

/// Decode wire bytes to a structured message.
pub fn decode(payload: &[u8], opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    service::message_codec::decode(payload, opts)
}

/// Fold `127.*` sub-fields (and nested `127.25.*` ones) into a packed
/// DE 127 value, returning the updated message.
pub fn encode_127(
    message: &Iso8583Message,
    opts: &CodecOptions,
) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut msg = message.clone();
    service::extension_codec::encode_extensions(&mut msg, &registry)?;
    Ok(msg)
}

/// Expand a packed DE 127 value into `127.*` sub-fields, recursing into
/// DE 127.25 when present.
pub fn decode_127(
    message: &Iso8583Message,
    opts: &CodecOptions,
) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut msg = message.clone();
    service::extension_codec::expand_extensions(&mut msg, &registry)?;
    Ok(msg)
}

/// Fold `127.25.*` sub-fields into a packed DE 127.25 value.
pub fn encode_127_25(
    message: &Iso8583Message,
    opts: &CodecOptions,
) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut msg = message.clone();
    service::extension_codec::encode_extension(&mut msg, "127.25.", "127.25", &registry)?;
    Ok(msg)
}

/// Expand a packed DE 127.25 value into `127.25.*` sub-fields.
pub fn decode_127_25(
    message: &Iso8583Message,
    opts: &CodecOptions,
) -> Result<Iso8583Message, CodecError> {
    let registry = FormatRegistry::from_options(opts);
    let mut msg = message.clone();
    service::extension_codec::expand_extension(&mut msg, "127.25", "127.25.", &registry)?;
    Ok(msg)
}

/// Pack the sub-fields of a client-specific composite (e.g. client `"ppn"`,
/// field `"120"`) into the composite's wire value.
pub fn encode_field(
    client: &str,
    field: &str,
    message: &Iso8583Message,
    _opts: &CodecOptions,
) -> Result<String, CodecError> {
    service::ppn_codec::sub_element_codec(client, field)?.pack(message)
}

/// Unpack a client-specific composite value into its dotted sub-fields.
pub fn decode_field(
    client: &str,
    field: &str,
    payload: &str,
    _opts: &CodecOptions,
) -> Result<Iso8583Message, CodecError> {
    service::ppn_codec::sub_element_codec(client, field)?.unpack(payload)
}

/// Validate a structured message against the effective format registry.
pub fn valid(message: &Iso8583Message, opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    service::message_codec::valid(message, opts)
}

/// Decode and validate wire bytes in one step.
pub fn valid_bytes(payload: &[u8], opts: &CodecOptions) -> Result<Iso8583Message, CodecError> {
    service::message_codec::valid_bytes(payload, opts)
}

/// Map a response message's (MTI, DE 39) pair to a status label.
pub fn status(message: &Iso8583Message) -> Result<String, CodecError> {
    service::response_status::status(message)
}
