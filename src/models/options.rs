use std::collections::HashMap;

use crate::models::format::FormatDescriptor;

/// Wire representation of bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapEncoding {
    /// Each 64-bit segment travels as 8 raw bytes (the hex bitmap decoded).
    #[default]
    Hex,
    /// Each 64-bit segment travels as 16 ASCII hex characters.
    Ascii,
}

/// How caller-supplied formats combine with the default catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatStrategy {
    /// Caller formats overlay the defaults.
    #[default]
    Merge,
    /// Caller formats are the whole catalogue.
    Replace,
}

/// Call-scoped options. The codec keeps no state between calls; everything
/// that varies per integration travels here.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Prepend/consume a 2-byte big-endian length header.
    pub tcp_len_header: bool,
    pub bitmap_encoding: BitmapEncoding,
    /// Per-field format overrides, combined per `format_strategy`.
    pub formats: Option<HashMap<String, FormatDescriptor>>,
    pub format_strategy: FormatStrategy,
    /// Fixed byte sequence between the TCP header and the MTI.
    pub static_meta: Option<Vec<u8>>,
    /// Emit a debug trace per data element.
    pub de_detail: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            tcp_len_header: true,
            bitmap_encoding: BitmapEncoding::default(),
            formats: None,
            format_strategy: FormatStrategy::default(),
            static_meta: None,
            de_detail: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CodecOptions::default();
        assert!(opts.tcp_len_header);
        assert_eq!(opts.bitmap_encoding, BitmapEncoding::Hex);
        assert_eq!(opts.format_strategy, FormatStrategy::Merge);
        assert!(opts.formats.is_none());
        assert!(opts.static_meta.is_none());
        assert!(!opts.de_detail);
    }
}
