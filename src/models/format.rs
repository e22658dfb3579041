use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Content class of a data element, as named by the interchange specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// `n` - numeric digits
    #[serde(rename = "n")]
    Numeric,
    /// `a` - alphabetic (space allowed)
    #[serde(rename = "a")]
    Alpha,
    /// `an` - alphanumeric
    #[serde(rename = "an")]
    AlphaNumeric,
    /// `ans` - alphanumeric plus special (any printable ASCII)
    #[serde(rename = "ans")]
    AlphaNumericSpecial,
    /// `anp` - alphanumeric plus pad
    #[serde(rename = "anp")]
    AlphaNumericPad,
    /// `ns` - numeric plus special
    #[serde(rename = "ns")]
    NumericSpecial,
    /// `b` - binary, carried as even-length hex text in the message map
    #[serde(rename = "b")]
    Binary,
    /// `z` - track 2/3 data
    #[serde(rename = "z")]
    Track,
    /// `x+n` - amount with a leading C/D debit-credit indicator
    #[serde(rename = "x+n")]
    SignedNumeric,
}

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static ALPHA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z ]+$").unwrap());
static ALPHA_NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z ]+$").unwrap());
static PRINTABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\x20-\x7E]+$").unwrap());
static NUMERIC_SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\x20-\x2F\x3A-\x40\x5B-\x60\x7B-\x7E]+$").unwrap());
static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]+$").unwrap());
static TRACK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9;=?D^]+$").unwrap());
static SIGNED_NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[CD][0-9]+$").unwrap());

impl ContentType {
    /// The interchange mnemonic, used in error context.
    pub fn code(&self) -> &'static str {
        match self {
            ContentType::Numeric => "n",
            ContentType::Alpha => "a",
            ContentType::AlphaNumeric => "an",
            ContentType::AlphaNumericSpecial => "ans",
            ContentType::AlphaNumericPad => "anp",
            ContentType::NumericSpecial => "ns",
            ContentType::Binary => "b",
            ContentType::Track => "z",
            ContentType::SignedNumeric => "x+n",
        }
    }

    /// Pattern a value of this class must match.
    pub fn pattern(&self) -> &'static Regex {
        match self {
            ContentType::Numeric => &NUMERIC_RE,
            ContentType::Alpha => &ALPHA_RE,
            ContentType::AlphaNumeric | ContentType::AlphaNumericPad => &ALPHA_NUMERIC_RE,
            ContentType::AlphaNumericSpecial => &PRINTABLE_RE,
            ContentType::NumericSpecial => &NUMERIC_SPECIAL_RE,
            ContentType::Binary => &HEX_RE,
            ContentType::Track => &TRACK_RE,
            ContentType::SignedNumeric => &SIGNED_NUMERIC_RE,
        }
    }
}

/// Length class of a data element. Variable classes carry an ASCII-decimal
/// length prefix of as many digits as there are `l`s in the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LenType {
    Fixed,
    Llvar,
    Lllvar,
    Llllvar,
    Llllllvar,
}

impl LenType {
    /// Number of ASCII digits in the length prefix (0 for fixed).
    pub fn prefix_digits(&self) -> usize {
        match self {
            LenType::Fixed => 0,
            LenType::Llvar => 2,
            LenType::Lllvar => 3,
            LenType::Llllvar => 4,
            LenType::Llllllvar => 6,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, LenType::Fixed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadDirection {
    Left,
    Right,
}

/// Padding applied to fixed-length fields before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub direction: PadDirection,
    pub pad_char: char,
}

/// Format descriptor for a single field. The codec is entirely table-driven:
/// one of these per field ID decides framing, content conversion, padding
/// and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub content_type: ContentType,
    pub len_type: LenType,
    pub max_len: usize,
    #[serde(default)]
    pub min_len: Option<usize>,
    #[serde(default)]
    pub padding: Option<Padding>,
    /// Extra validation pattern applied on top of the content-type check.
    #[serde(default)]
    pub validation: Option<String>,
    pub label: String,
}

impl FormatDescriptor {
    pub fn new(content_type: ContentType, len_type: LenType, max_len: usize, label: &str) -> Self {
        Self {
            content_type,
            len_type,
            max_len,
            min_len: None,
            padding: None,
            validation: None,
            label: label.to_string(),
        }
    }

    pub fn with_padding(mut self, direction: PadDirection, pad_char: char) -> Self {
        self.padding = Some(Padding {
            direction,
            pad_char,
        });
        self
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    pub fn with_validation(mut self, pattern: &str) -> Self {
        self.validation = Some(pattern.to_string());
        self
    }
}
