//! §4.E/§4.F: the mini-language of replacement fields (`{id:spec}`) and
//! the format-specs record each field compiles down to.

mod charset;
mod parser;

pub use charset::CharSet;
pub use parser::{parse, parse_checked};

use crate::args::ArgTypeTag;

/// `fill-align` from the grammar: `none` when neither was given, `Left`/
/// `Right`/`Center` when the field named `<`/`>`/`^`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Right,
    Center,
}

/// Which regex engine behaviors a `/.../flags` field requested.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub multiline: bool,
    pub singleline: bool,
    pub nocase: bool,
    pub nocapture: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexSpec {
    pub pattern: String,
    pub flags: RegexFlags,
}

/// The presentation-type letter (or `[...]`/`/.../`) that selects which
/// scanner variant handles a field, per §4.E's grammar and §4.E's
/// "Presentation type validation per argument type" table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presentation {
    Default,
    Binary,
    Octal,
    Decimal,
    Hex,
    Unsigned,
    IntAuto,
    ArbitraryBase(u32),
    Char,
    HexFloat,
    HexFloatUpper,
    Scientific,
    ScientificUpper,
    Fixed,
    FixedUpper,
    General,
    GeneralUpper,
    S,
    CharSet(CharSet),
    Regex(RegexSpec),
    PointerHex,
}

impl Presentation {
    pub fn is_integer_like(&self) -> bool {
        matches!(
            self,
            Presentation::Binary
                | Presentation::Octal
                | Presentation::Decimal
                | Presentation::Hex
                | Presentation::Unsigned
                | Presentation::IntAuto
                | Presentation::ArbitraryBase(_)
        )
    }

    pub fn is_float_like(&self) -> bool {
        matches!(
            self,
            Presentation::HexFloat
                | Presentation::HexFloatUpper
                | Presentation::Scientific
                | Presentation::ScientificUpper
                | Presentation::Fixed
                | Presentation::FixedUpper
                | Presentation::General
                | Presentation::GeneralUpper
        )
    }

    /// Base implied by an integer presentation; `0` means "auto-detect
    /// from a `0b`/`0x`/leading-`0` prefix", as in `{:i}`.
    pub fn integer_base(&self) -> Option<u32> {
        match self {
            Presentation::Binary => Some(2),
            Presentation::Octal => Some(8),
            Presentation::Decimal | Presentation::Unsigned => Some(10),
            Presentation::Hex => Some(16),
            Presentation::IntAuto | Presentation::Default => Some(0),
            Presentation::ArbitraryBase(n) => Some(*n),
            _ => None,
        }
    }
}

/// One field's fully-parsed spec: `[fill-align] [width] [.precision] [L] [type]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: char,
    pub align: Align,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    pub localized: bool,
    pub presentation: Presentation,
    /// Unparsed text between `:` and `}`, kept for custom-type fields
    /// whose own `CustomScan::parse_spec` needs the original spec body.
    pub body: String,
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec {
            fill: ' ',
            align: Align::None,
            width: None,
            precision: None,
            localized: false,
            presentation: Presentation::Default,
            body: String::new(),
        }
    }
}

impl FormatSpec {
    pub fn custom_body(&self) -> &str {
        &self.body
    }

    pub fn skips_leading_whitespace(&self) -> bool {
        !matches!(
            self.presentation,
            Presentation::Char | Presentation::CharSet(_) | Presentation::Regex(_)
        )
    }
}

/// One piece of a parsed format string: either text to match verbatim,
/// or a replacement field bound to an argument index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Literal(String),
    Replacement { id: usize, spec: FormatSpec },
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FormatString {
    pub fields: Vec<Field>,
}

/// Re-exported here since both the parser and the checker need it: the
/// tags of arguments available for `{:N}`/`{}`-style id resolution.
pub type ArgTags<'a> = &'a [ArgTypeTag];
