//! Bitmap construction and extraction.
//!
//! One engine serves the top-level message (128 bits over field keys "1" to
//! "128") and the DE 127 / 127.25 composites (64 bits over their dotted
//! sub-keys); only the prefix and width differ.

use crate::error::CodecError;
use crate::models::message::Iso8583Message;
use crate::models::options::BitmapEncoding;
use crate::service::byte_util;

/// Build the presence bitmap for all direct sub-fields of `prefix`,
/// rendered as uppercase hex of `width / 4` characters.
///
/// Top level (`prefix = ""`, `width = 128`): bit 1 is forced on (the
/// secondary bitmap is always emitted), bit 65 is forced off (no tertiary is
/// ever emitted), and bit 127 is forced on when `127.1` is present.
/// Composite levels: bit 1 is forced off, the bitmap occupies that slot
/// itself.
pub fn create_bitmap(message: &Iso8583Message, prefix: &str, width: usize) -> String {
    let mut bits = vec![0u8; width];
    for k in message.sub_field_numbers(prefix) {
        let k = k as usize;
        if (1..=width).contains(&k) {
            bits[k - 1] = 1;
        }
    }
    if prefix.is_empty() {
        bits[0] = 1;
        if width == 128 {
            bits[64] = 0;
            if message.has_field("127.1") {
                bits[126] = 1;
            }
        }
    } else {
        bits[0] = 0;
    }
    bits_to_hex(&bits)
}

fn bits_to_hex(bits: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, bit) in chunk.iter().enumerate() {
            if *bit != 0 {
                byte |= 1 << (7 - i);
            }
        }
        bytes.push(byte);
    }
    byte_util::bytes_to_hex(&bytes)
}

/// Pull the bitmap off the front of a decode payload, reading further
/// 64-bit segments while the continuation bit of the last one is set
/// (primary -> secondary -> tertiary). Returns the concatenated hex text
/// and the remaining payload.
pub fn extract_bitmap(
    payload: &[u8],
    encoding: BitmapEncoding,
) -> Result<(String, &[u8]), CodecError> {
    let mut hex = String::new();
    let mut rest = payload;
    for _ in 0..3 {
        let (segment, tail) = read_segment(rest, encoding)?;
        rest = tail;
        let continued = continuation_set(&segment);
        hex.push_str(&segment);
        if !continued {
            break;
        }
    }
    Ok((hex, rest))
}

fn read_segment(payload: &[u8], encoding: BitmapEncoding) -> Result<(String, &[u8]), CodecError> {
    match encoding {
        BitmapEncoding::Hex => {
            let (head, rest) = byte_util::slice(payload, 0, 8).map_err(|_| {
                CodecError::BitmapExtraction {
                    needed: 8,
                    available: payload.len(),
                }
            })?;
            Ok((byte_util::bytes_to_hex(head), rest))
        }
        BitmapEncoding::Ascii => {
            let (head, rest) = byte_util::slice(payload, 0, 16).map_err(|_| {
                CodecError::BitmapExtraction {
                    needed: 16,
                    available: payload.len(),
                }
            })?;
            let text = std::str::from_utf8(head)
                .map_err(|_| CodecError::BitmapExtraction {
                    needed: 16,
                    available: payload.len(),
                })?
                .to_uppercase();
            // reject non-hex segments before the bit walk does
            byte_util::hex_to_bytes(&text)?;
            Ok((text, rest))
        }
    }
}

fn continuation_set(segment_hex: &str) -> bool {
    segment_hex
        .chars()
        .next()
        .and_then(|c| c.to_digit(16))
        .map(|nibble| nibble & 0x8 != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bitmap_forces_secondary() {
        let msg = Iso8583Message::from([
            ("0", "0800"),
            ("7", "0818160244"),
            ("11", "646465"),
            ("12", "160244"),
            ("13", "0818"),
            ("70", "001"),
        ]);
        assert_eq!(create_bitmap(&msg, "", 128), "82380000000000000400000000000000");
    }

    #[test]
    fn test_create_bitmap_field_127_1_sets_bit_127() {
        let msg = Iso8583Message::from([("2", "123"), ("127.1", "0000000000000000")]);
        let hex = create_bitmap(&msg, "", 128);
        let bits = byte_util::iterable_bitmap(&hex).unwrap();
        assert_eq!(bits[1], 1); // field 2
        assert_eq!(bits[126], 1); // field 127
        assert_eq!(bits[0], 1); // always
    }

    #[test]
    fn test_create_bitmap_never_signals_tertiary() {
        let msg = Iso8583Message::from([("65", "0000000000000000"), ("66", "1")]);
        let hex = create_bitmap(&msg, "", 128);
        let bits = byte_util::iterable_bitmap(&hex).unwrap();
        assert_eq!(bits[64], 0);
        assert_eq!(bits[65], 1);
    }

    #[test]
    fn test_create_bitmap_composite_clears_bit_one() {
        let msg = Iso8583Message::from([
            ("127.1", "stale"),
            ("127.2", "a"),
            ("127.25", "b"),
        ]);
        let hex = create_bitmap(&msg, "127.", 64);
        assert_eq!(hex.len(), 16);
        let bits = byte_util::iterable_bitmap(&hex).unwrap();
        assert_eq!(bits[0], 0);
        assert_eq!(bits[1], 1);
        assert_eq!(bits[24], 1);
    }

    #[test]
    fn test_extract_single_segment_raw() {
        let mut payload = hex::decode("1238000000000000").unwrap();
        payload.extend_from_slice(b"rest");
        let (hex_text, rest) = extract_bitmap(&payload, BitmapEncoding::Hex).unwrap();
        assert_eq!(hex_text, "1238000000000000");
        assert_eq!(rest, b"rest");
    }

    #[test]
    fn test_extract_two_segments_raw() {
        let payload = hex::decode("82380000000000000400000000000000").unwrap();
        let (hex_text, rest) = extract_bitmap(&payload, BitmapEncoding::Hex).unwrap();
        assert_eq!(hex_text, "82380000000000000400000000000000");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_extract_three_segments_raw() {
        let payload =
            hex::decode("820000000000000080000000000000000100000000000000").unwrap();
        let (hex_text, _) = extract_bitmap(&payload, BitmapEncoding::Hex).unwrap();
        assert_eq!(hex_text.len(), 48);
    }

    #[test]
    fn test_extract_ascii_segments() {
        let payload = b"82380000000000000400000000000000";
        let (hex_text, rest) = extract_bitmap(payload, BitmapEncoding::Ascii).unwrap();
        assert_eq!(hex_text, "82380000000000000400000000000000");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_extract_truncated_secondary() {
        let payload = hex::decode("8238000000000000").unwrap();
        let err = extract_bitmap(&payload, BitmapEncoding::Hex).unwrap_err();
        assert!(matches!(err, CodecError::BitmapExtraction { .. }));
    }
}
