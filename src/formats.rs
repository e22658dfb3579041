//! Default format catalogue and per-call format resolution.
//!
//! One descriptor per field ID drives the whole codec. The defaults follow
//! the 1987 interchange table for DE 1-128 and the common private-use layout
//! for the DE 127 and DE 127.25 composites; callers overlay or replace them
//! through [`CodecOptions::formats`](crate::models::options::CodecOptions).

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::format::{ContentType, FormatDescriptor, LenType, PadDirection};
use crate::models::options::{CodecOptions, FormatStrategy};

use ContentType::*;
use LenType::*;

fn fixed(content_type: ContentType, max_len: usize, label: &str) -> FormatDescriptor {
    let fmt = FormatDescriptor::new(content_type, Fixed, max_len, label);
    match content_type {
        Numeric | Binary => fmt.with_padding(PadDirection::Left, '0'),
        SignedNumeric => fmt,
        _ => fmt.with_padding(PadDirection::Right, ' '),
    }
}

fn var(
    content_type: ContentType,
    len_type: LenType,
    max_len: usize,
    label: &str,
) -> FormatDescriptor {
    FormatDescriptor::new(content_type, len_type, max_len, label)
}

/// The default catalogue, keyed by field identifier ("2", "127.25.4", ...).
pub static DEFAULT_FORMATS: Lazy<HashMap<String, FormatDescriptor>> = Lazy::new(|| {
    let mut m = HashMap::new();
    let mut ins = |id: &str, fmt: FormatDescriptor| {
        m.insert(id.to_string(), fmt);
    };

    ins("0", fixed(Numeric, 4, "Message Type Indicator"));
    ins("1", fixed(Binary, 16, "Bitmap, secondary"));
    ins("2", var(Numeric, Llvar, 19, "Primary account number (PAN)"));
    ins("3", fixed(Numeric, 6, "Processing code"));
    ins("4", fixed(Numeric, 12, "Amount, transaction"));
    ins("5", fixed(Numeric, 12, "Amount, settlement"));
    ins("6", fixed(Numeric, 12, "Amount, cardholder billing"));
    ins("7", fixed(Numeric, 10, "Transmission date & time"));
    ins("8", fixed(Numeric, 8, "Amount, cardholder billing fee"));
    ins("9", fixed(Numeric, 8, "Conversion rate, settlement"));
    ins("10", fixed(Numeric, 8, "Conversion rate, cardholder billing"));
    ins("11", fixed(Numeric, 6, "System trace audit number"));
    ins("12", fixed(Numeric, 6, "Time, local transaction"));
    ins("13", fixed(Numeric, 4, "Date, local transaction"));
    ins("14", fixed(Numeric, 4, "Date, expiration"));
    ins("15", fixed(Numeric, 4, "Date, settlement"));
    ins("16", fixed(Numeric, 4, "Date, conversion"));
    ins("17", fixed(Numeric, 4, "Date, capture"));
    ins("18", fixed(Numeric, 4, "Merchant type"));
    ins("19", fixed(Numeric, 3, "Acquiring institution country code"));
    ins("20", fixed(Numeric, 3, "PAN extended, country code"));
    ins("21", fixed(Numeric, 3, "Forwarding institution country code"));
    ins("22", fixed(Numeric, 3, "Point of service entry mode"));
    ins("23", fixed(Numeric, 3, "Application PAN sequence number"));
    ins("24", fixed(Numeric, 3, "Network international identifier"));
    ins("25", fixed(Numeric, 2, "Point of service condition code"));
    ins("26", fixed(Numeric, 2, "Point of service capture code"));
    ins("27", fixed(Numeric, 1, "Authorizing identification response length"));
    ins("28", fixed(SignedNumeric, 9, "Amount, transaction fee"));
    ins("29", fixed(SignedNumeric, 9, "Amount, settlement fee"));
    ins("30", fixed(SignedNumeric, 9, "Amount, transaction processing fee"));
    ins("31", fixed(SignedNumeric, 9, "Amount, settlement processing fee"));
    ins("32", var(Numeric, Llvar, 11, "Acquiring institution identification code"));
    ins("33", var(Numeric, Llvar, 11, "Forwarding institution identification code"));
    ins("34", var(NumericSpecial, Llvar, 28, "Primary account number, extended"));
    ins("35", var(Track, Llvar, 37, "Track 2 data"));
    ins("36", var(Numeric, Lllvar, 104, "Track 3 data"));
    ins("37", fixed(AlphaNumeric, 12, "Retrieval reference number"));
    ins("38", fixed(AlphaNumeric, 6, "Authorization identification response"));
    ins("39", fixed(AlphaNumeric, 2, "Response code"));
    ins("40", fixed(AlphaNumeric, 3, "Service restriction code"));
    ins("41", fixed(AlphaNumericSpecial, 8, "Card acceptor terminal identification"));
    ins("42", fixed(AlphaNumericSpecial, 15, "Card acceptor identification code"));
    ins("43", fixed(AlphaNumericSpecial, 40, "Card acceptor name/location"));
    ins("44", var(AlphaNumeric, Llvar, 25, "Additional response data"));
    ins("45", var(AlphaNumeric, Llvar, 76, "Track 1 data"));
    ins("46", var(AlphaNumeric, Lllvar, 999, "Additional data - ISO"));
    ins("47", var(AlphaNumeric, Lllvar, 999, "Additional data - national"));
    ins("48", var(AlphaNumeric, Lllvar, 999, "Additional data - private"));
    ins("49", fixed(Numeric, 3, "Currency code, transaction"));
    ins("50", fixed(Numeric, 3, "Currency code, settlement"));
    ins("51", fixed(Numeric, 3, "Currency code, cardholder billing"));
    ins("52", fixed(Binary, 16, "Personal identification number data"));
    ins("53", fixed(Numeric, 16, "Security related control information"));
    ins("54", var(AlphaNumeric, Lllvar, 120, "Additional amounts"));
    ins("55", var(Binary, Lllvar, 999, "Integrated circuit card data"));
    ins("56", var(AlphaNumericSpecial, Lllvar, 999, "Reserved ISO"));
    ins("57", var(AlphaNumericSpecial, Lllvar, 999, "Reserved national"));
    ins("58", var(AlphaNumericSpecial, Lllvar, 999, "Reserved national"));
    ins("59", var(AlphaNumericSpecial, Lllvar, 999, "Reserved national"));
    ins("60", var(AlphaNumericSpecial, Lllvar, 999, "Reserved national"));
    ins("61", var(AlphaNumericSpecial, Lllvar, 999, "Reserved private"));
    ins("62", var(AlphaNumericSpecial, Lllvar, 999, "Reserved private"));
    ins("63", var(AlphaNumericSpecial, Lllvar, 999, "Reserved private"));
    ins("64", fixed(Binary, 16, "Message authentication code"));
    ins("65", fixed(Binary, 16, "Bitmap, tertiary"));
    ins("66", fixed(Numeric, 1, "Settlement code"));
    ins("67", fixed(Numeric, 2, "Extended payment code"));
    ins("68", fixed(Numeric, 3, "Receiving institution country code"));
    ins("69", fixed(Numeric, 3, "Settlement institution country code"));
    ins("70", fixed(Numeric, 3, "Network management information code"));
    ins("71", fixed(Numeric, 4, "Message number"));
    ins("72", fixed(Numeric, 4, "Message number, last"));
    ins("73", fixed(Numeric, 6, "Date, action"));
    ins("74", fixed(Numeric, 10, "Credits, number"));
    ins("75", fixed(Numeric, 10, "Credits, reversal number"));
    ins("76", fixed(Numeric, 10, "Debits, number"));
    ins("77", fixed(Numeric, 10, "Debits, reversal number"));
    ins("78", fixed(Numeric, 10, "Transfer, number"));
    ins("79", fixed(Numeric, 10, "Transfer, reversal number"));
    ins("80", fixed(Numeric, 10, "Inquiries, number"));
    ins("81", fixed(Numeric, 10, "Authorizations, number"));
    ins("82", fixed(Numeric, 12, "Credits, processing fee amount"));
    ins("83", fixed(Numeric, 12, "Credits, transaction fee amount"));
    ins("84", fixed(Numeric, 12, "Debits, processing fee amount"));
    ins("85", fixed(Numeric, 12, "Debits, transaction fee amount"));
    ins("86", fixed(Numeric, 16, "Credits, amount"));
    ins("87", fixed(Numeric, 16, "Credits, reversal amount"));
    ins("88", fixed(Numeric, 16, "Debits, amount"));
    ins("89", fixed(Numeric, 16, "Debits, reversal amount"));
    ins("90", fixed(Numeric, 42, "Original data elements"));
    ins("91", fixed(AlphaNumeric, 1, "File update code"));
    ins("92", fixed(AlphaNumeric, 2, "File security code"));
    ins("93", fixed(AlphaNumeric, 5, "Response indicator"));
    ins("94", fixed(AlphaNumeric, 7, "Service indicator"));
    ins("95", fixed(AlphaNumeric, 42, "Replacement amounts"));
    ins("96", fixed(Binary, 16, "Message security code"));
    ins("97", fixed(SignedNumeric, 17, "Amount, net settlement"));
    ins("98", fixed(AlphaNumericSpecial, 25, "Payee"));
    ins("99", var(Numeric, Llvar, 11, "Settlement institution identification code"));
    ins("100", var(Numeric, Llvar, 11, "Receiving institution identification code"));
    ins("101", var(AlphaNumericSpecial, Llvar, 17, "File name"));
    ins("102", var(AlphaNumericSpecial, Llvar, 28, "Account identification 1"));
    ins("103", var(AlphaNumericSpecial, Llvar, 28, "Account identification 2"));
    ins("104", var(AlphaNumericSpecial, Lllvar, 100, "Transaction description"));
    ins("105", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("106", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("107", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("108", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("109", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("110", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("111", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for ISO use"));
    ins("112", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("113", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("114", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("115", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("116", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("117", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("118", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("119", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for national use"));
    ins("120", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("121", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("122", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("123", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("124", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("125", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("126", var(AlphaNumericSpecial, Lllvar, 999, "Reserved for private use"));
    ins("127", var(AlphaNumericSpecial, Llllllvar, 999999, "Reserved for private use"));
    ins("128", fixed(Binary, 16, "Message authentication code 2"));

    // DE 127 composite sub-fields.
    ins("127.1", fixed(Binary, 16, "Bitmap"));
    ins("127.2", var(Numeric, Llvar, 32, "Switch key"));
    ins("127.3", fixed(AlphaNumericSpecial, 48, "Routing information"));
    ins("127.4", fixed(AlphaNumericSpecial, 22, "POS data"));
    ins("127.5", fixed(AlphaNumericSpecial, 73, "Service station data"));
    ins("127.6", fixed(Numeric, 2, "Authorization profile"));
    ins("127.7", var(AlphaNumericSpecial, Llvar, 70, "Check data"));
    ins("127.8", var(AlphaNumericSpecial, Lllvar, 999, "Retention data"));
    ins("127.9", var(AlphaNumericSpecial, Lllvar, 255, "Additional node data"));
    ins("127.10", fixed(Numeric, 3, "CVV2"));
    ins("127.11", var(AlphaNumericSpecial, Llvar, 32, "Original key"));
    ins("127.12", var(AlphaNumericSpecial, Llvar, 25, "Terminal owner"));
    ins("127.13", fixed(AlphaNumericSpecial, 17, "POS geographic data"));
    ins("127.14", fixed(AlphaNumericSpecial, 8, "Sponsor bank"));
    ins("127.15", var(AlphaNumericSpecial, Llvar, 29, "Address verification data"));
    ins("127.16", fixed(AlphaNumericSpecial, 1, "Address verification result"));
    ins("127.17", fixed(AlphaNumericSpecial, 1, "Cardholder information"));
    ins("127.18", fixed(AlphaNumericSpecial, 1, "Validation data"));
    ins("127.19", fixed(AlphaNumericSpecial, 13, "Bank details"));
    ins("127.20", fixed(Numeric, 8, "Originator / authorizer date settlement"));
    ins("127.21", var(AlphaNumericSpecial, Llvar, 12, "Record identification"));
    ins("127.22", var(AlphaNumericSpecial, Llllvar, 9999, "Structured data"));
    ins("127.23", fixed(AlphaNumericSpecial, 253, "Payee name and address"));
    ins("127.24", var(AlphaNumericSpecial, Llvar, 28, "Payer account"));
    ins("127.25", var(AlphaNumericSpecial, Llllvar, 9999, "Integrated circuit card data"));
    ins("127.26", var(AlphaNumericSpecial, Llvar, 12, "Original node"));
    ins("127.27", fixed(AlphaNumericSpecial, 1, "Card verification result"));
    ins("127.28", fixed(Numeric, 4, "American Express card identifier"));
    ins("127.29", fixed(Binary, 40, "3-D Secure data"));
    ins("127.30", fixed(AlphaNumericSpecial, 1, "3-D Secure result"));
    ins("127.31", var(AlphaNumericSpecial, Llvar, 11, "Issuer network identifier"));
    ins("127.32", var(Binary, Llvar, 33, "UCAF data"));
    ins("127.33", fixed(Numeric, 4, "Extended transaction type"));
    ins("127.34", fixed(AlphaNumeric, 2, "Account type qualifiers"));
    ins("127.35", var(AlphaNumericSpecial, Llvar, 11, "Acquirer network identifier"));
    ins("127.36", var(AlphaNumericSpecial, Llvar, 25, "Customer identifier"));
    ins("127.37", fixed(AlphaNumeric, 4, "Extended response code"));
    ins("127.38", var(AlphaNumeric, Llvar, 99, "Additional POS data code"));
    ins("127.39", fixed(AlphaNumeric, 2, "Original response code"));

    // DE 127.25 composite sub-fields.
    ins("127.25.1", fixed(Binary, 16, "Bitmap"));
    ins("127.25.2", fixed(Numeric, 12, "Amount, authorized"));
    ins("127.25.3", fixed(Numeric, 12, "Amount, other"));
    ins("127.25.4", var(AlphaNumericSpecial, Llvar, 32, "Application identifier"));
    ins("127.25.5", fixed(Binary, 4, "Application interchange profile"));
    ins("127.25.6", fixed(Binary, 4, "Application transaction counter"));
    ins("127.25.7", fixed(Binary, 16, "Application request cryptogram"));
    ins("127.25.8", fixed(AlphaNumeric, 2, "Authorization response code"));
    ins("127.25.9", fixed(Binary, 6, "Cardholder verification method results"));
    ins("127.25.10", fixed(Binary, 2, "Cryptogram information data"));
    ins("127.25.11", fixed(Numeric, 2, "Cryptogram transaction type"));
    ins("127.25.12", fixed(Binary, 6, "Terminal capabilities"));
    ins("127.25.13", fixed(Numeric, 3, "Terminal country code"));
    ins("127.25.14", fixed(AlphaNumericSpecial, 8, "Terminal serial number"));
    ins("127.25.15", fixed(Numeric, 2, "Terminal type"));
    ins("127.25.16", fixed(Binary, 10, "Terminal verification result"));
    ins("127.25.17", fixed(AlphaNumeric, 1, "Transaction category code"));
    ins("127.25.18", fixed(Numeric, 3, "Transaction currency code"));
    ins("127.25.19", fixed(Numeric, 6, "Transaction date"));
    ins("127.25.20", var(Numeric, Llvar, 8, "Transaction sequence counter"));
    ins("127.25.21", fixed(Numeric, 2, "Transaction type"));
    ins("127.25.22", fixed(Binary, 8, "Unpredictable number"));
    ins("127.25.23", var(Binary, Llvar, 64, "Issuer application data"));
    ins("127.25.24", fixed(Binary, 16, "Transaction certificate"));
    ins("127.25.25", var(Binary, Llvar, 64, "Cardholder verification method list"));
    ins("127.25.26", var(AlphaNumericSpecial, Lllvar, 999, "Issuer script results"));
    ins("127.25.27", var(Binary, Llvar, 32, "Issuer authentication data"));
    ins("127.25.28", var(Binary, Lllvar, 999, "Issuer script template 1"));
    ins("127.25.29", var(Binary, Lllvar, 999, "Issuer script template 2"));
    ins("127.25.30", fixed(Numeric, 3, "Cryptogram version number"));
    ins("127.25.31", var(Binary, Llvar, 16, "Dedicated file name"));
    ins("127.25.32", var(AlphaNumericSpecial, Llvar, 99, "Form factor indicator"));
    ins("127.25.33", var(AlphaNumericSpecial, Lllvar, 255, "Additional chip data"));

    m
});

/// Per-call view over the default catalogue and the caller's overrides.
#[derive(Debug, Clone, Copy)]
pub struct FormatRegistry<'a> {
    custom: Option<&'a HashMap<String, FormatDescriptor>>,
    strategy: FormatStrategy,
}

impl<'a> FormatRegistry<'a> {
    pub fn from_options(opts: &'a CodecOptions) -> Self {
        Self {
            custom: opts.formats.as_ref(),
            strategy: opts.format_strategy,
        }
    }

    /// Look up the descriptor for a field identifier.
    pub fn get(&self, field: &str) -> Option<&'a FormatDescriptor> {
        if let Some(custom) = self.custom {
            if let Some(fmt) = custom.get(field) {
                return Some(fmt);
            }
            if self.strategy == FormatStrategy::Replace {
                return None;
            }
        }
        DEFAULT_FORMATS.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup() {
        let opts = CodecOptions::default();
        let registry = FormatRegistry::from_options(&opts);
        let pan = registry.get("2").unwrap();
        assert_eq!(pan.content_type, Numeric);
        assert_eq!(pan.len_type, Llvar);
        assert_eq!(pan.max_len, 19);
        assert!(registry.get("129").is_none());
    }

    #[test]
    fn test_merge_overlays_defaults() {
        let mut custom = HashMap::new();
        custom.insert(
            "2".to_string(),
            var(Numeric, Lllvar, 28, "Primary account number (PAN)"),
        );
        let opts = CodecOptions {
            formats: Some(custom),
            ..Default::default()
        };
        let registry = FormatRegistry::from_options(&opts);
        assert_eq!(registry.get("2").unwrap().len_type, Lllvar);
        // untouched entries still resolve
        assert_eq!(registry.get("11").unwrap().max_len, 6);
    }

    #[test]
    fn test_replace_drops_defaults() {
        let mut custom = HashMap::new();
        custom.insert("2", var(Numeric, Llvar, 19, "PAN"));
        let custom = custom
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let opts = CodecOptions {
            formats: Some(custom),
            format_strategy: FormatStrategy::Replace,
            ..Default::default()
        };
        let registry = FormatRegistry::from_options(&opts);
        assert!(registry.get("2").is_some());
        assert!(registry.get("11").is_none());
    }

    #[test]
    fn test_composite_sub_fields_present() {
        let opts = CodecOptions::default();
        let registry = FormatRegistry::from_options(&opts);
        assert!(registry.get("127.1").is_some());
        assert_eq!(registry.get("127.25").unwrap().len_type, Llllvar);
        assert_eq!(registry.get("127.25.2").unwrap().max_len, 12);
        assert_eq!(registry.get("127").unwrap().len_type, Llllllvar);
    }
}
