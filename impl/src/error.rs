//! The error model shared by every other module in this crate: one flat
//! enum of kinds plus a short message, no wrapped `source()`.

use std::borrow::Cow;
use std::fmt;

/// Which family of problem a [`Error`] describes.
///
/// Source errors (`EndOfInput`, `InvalidSourceState`) mean the source
/// cannot be read further or cannot satisfy a putback request.
/// Format-string errors (`InvalidFormatString`) mean the grammar itself,
/// the argument indices, or a presentation-type/argument-type mismatch
/// was rejected before any scanning happened.
/// Value errors are everything else: the source content did not match
/// the requested type or fell outside its representable range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EndOfInput,
    InvalidFormatString,
    InvalidScannedValue,
    InvalidLiteral,
    InvalidFill,
    LengthTooShort,
    InvalidSourceState,
    ValuePositiveOverflow,
    ValueNegativeOverflow,
    ValuePositiveUnderflow,
    ValueNegativeUnderflow,
    TypeNotSupported,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EndOfInput => "end of input",
            ErrorKind::InvalidFormatString => "invalid format string",
            ErrorKind::InvalidScannedValue => "invalid scanned value",
            ErrorKind::InvalidLiteral => "invalid literal",
            ErrorKind::InvalidFill => "invalid fill character",
            ErrorKind::LengthTooShort => "length too short",
            ErrorKind::InvalidSourceState => "invalid source state",
            ErrorKind::ValuePositiveOverflow => "value positive overflow",
            ErrorKind::ValueNegativeOverflow => "value negative overflow",
            ErrorKind::ValuePositiveUnderflow => "value positive underflow",
            ErrorKind::ValueNegativeUnderflow => "value negative underflow",
            ErrorKind::TypeNotSupported => "type not supported",
        }
    }
}

/// `{kind, message}` as described in §3 DATA MODEL. Cheap to construct and
/// to clone; `message` is almost always a `&'static str` literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for the common case where the kind's own description is
    /// the whole message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.as_str())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == ErrorKind::EndOfInput
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
