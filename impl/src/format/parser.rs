//! §4.E/§4.F: a hand-written recursive-descent parser over the format
//! string's characters. A PEG/grammar-crate approach (the teacher's own
//! `impl/src/parser.rs` leans on `pest`) doesn't fit here: fill/align
//! disambiguation needs one code point of lookahead decided procedurally,
//! and automatic/manual argument-index mixing needs state carried across
//! fields — both are far more natural as a few mutable fields on a
//! `Parser` struct than as grammar productions. See DESIGN.md.

use std::iter::Peekable;
use std::str::Chars;

use super::{Align, CharSet, Field, FormatSpec, FormatString, Presentation, RegexFlags, RegexSpec};
use crate::args::ArgTypeTag;
use crate::error::{Error, ErrorKind, Result};

/// Parse `fmt` without argument-type information. Used for specs that
/// don't come from a `scan`-call's top-level format string, e.g. a
/// custom type revisiting its own inner grammar; still enforces the
/// grammar and the automatic/manual mixing rule, but cannot check
/// argument indices or presentation/type compatibility since it has no
/// argument vector to check against.
pub fn parse(fmt: &str) -> Result<FormatString> {
    Parser::new(fmt, &[]).run()
}

/// Parse `fmt` and validate every field's argument id and presentation
/// type against `arg_tags`. This is §4.F's compile-time checker and
/// §4.E's runtime parser unified into one function, run with validation
/// either on (`arg_tags` non-empty) or off (`arg_tags` empty) — exactly
/// the "same parser, validation layer disabled" relationship spec.md
/// describes.
pub fn parse_checked(fmt: &str, arg_tags: &[ArgTypeTag]) -> Result<FormatString> {
    Parser::new(fmt, arg_tags).run()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Indexing {
    Automatic,
    Manual,
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    arg_tags: &'a [ArgTypeTag],
    indexing: Option<Indexing>,
    next_auto_id: usize,
    used: Vec<bool>,
    checked: bool,
}

impl<'a> Parser<'a> {
    fn new(fmt: &'a str, arg_tags: &'a [ArgTypeTag]) -> Self {
        Parser {
            chars: fmt.chars().peekable(),
            arg_tags,
            indexing: None,
            next_auto_id: 0,
            used: vec![false; arg_tags.len()],
            checked: !arg_tags.is_empty(),
        }
    }

    fn run(mut self) -> Result<FormatString> {
        let mut fields = Vec::new();
        let mut literal = String::new();
        loop {
            match self.chars.next() {
                None => break,
                Some('{') => {
                    if self.chars.peek() == Some(&'{') {
                        self.chars.next();
                        literal.push('{');
                        continue;
                    }
                    if !literal.is_empty() {
                        fields.push(Field::Literal(std::mem::take(&mut literal)));
                    }
                    fields.push(self.parse_field()?);
                }
                Some('}') => {
                    if self.chars.peek() == Some(&'}') {
                        self.chars.next();
                        literal.push('}');
                        continue;
                    }
                    return Err(Error::new(
                        ErrorKind::InvalidFormatString,
                        "unmatched '}' in format string",
                    ));
                }
                Some(c) => literal.push(c),
            }
        }
        if !literal.is_empty() {
            fields.push(Field::Literal(literal));
        }
        if self.checked && self.used.iter().any(|u| !u) {
            return Err(Error::new(
                ErrorKind::InvalidFormatString,
                "not every argument was consumed by the format string",
            ));
        }
        Ok(FormatString { fields })
    }

    fn parse_field(&mut self) -> Result<Field> {
        let id = self.parse_arg_id()?;
        let mut spec = FormatSpec::default();
        if self.chars.peek() == Some(&':') {
            self.chars.next();
            spec = self.parse_spec()?;
        }
        match self.chars.next() {
            Some('}') => {}
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    "replacement field is missing its closing '}'",
                ))
            }
        }
        if self.checked {
            if id >= self.arg_tags.len() {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    format!("argument index {id} is out of range"),
                ));
            }
            if self.used[id] {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    format!("argument index {id} was referenced more than once"),
                ));
            }
            self.used[id] = true;
            let tag = self.arg_tags[id];
            if !tag.accepts(&spec.presentation) {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    format!("presentation type is not valid for argument {id}'s type"),
                ));
            }
            if tag == ArgTypeTag::StringOwned
                && matches!(spec.presentation, Presentation::Char)
                && spec.precision.is_none()
            {
                return Err(Error::new(
                    ErrorKind::InvalidFormatString,
                    "'c' on a string argument requires an explicit precision",
                ));
            }
        }
        Ok(Field::Replacement { id, spec })
    }

    fn parse_arg_id(&mut self) -> Result<usize> {
        if let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                if self.indexing == Some(Indexing::Automatic) {
                    return Err(Error::new(
                        ErrorKind::InvalidFormatString,
                        "cannot mix automatic and manual argument indexing",
                    ));
                }
                self.indexing = Some(Indexing::Manual);
                return Ok(self.parse_decimal()?.expect("checked is_ascii_digit above"));
            }
        }
        if self.indexing == Some(Indexing::Manual) {
            return Err(Error::new(
                ErrorKind::InvalidFormatString,
                "cannot mix automatic and manual argument indexing",
            ));
        }
        self.indexing = Some(Indexing::Automatic);
        let id = self.next_auto_id;
        self.next_auto_id += 1;
        Ok(id)
    }

    fn parse_decimal(&mut self) -> Result<Option<usize>> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse()
            .map(Some)
            .map_err(|_| Error::new(ErrorKind::InvalidFormatString, "decimal integer too large"))
    }

    fn parse_spec(&mut self) -> Result<FormatSpec> {
        let mut spec = FormatSpec::default();
        self.parse_fill_align(&mut spec);
        if let Some(w) = self.parse_decimal()? {
            spec.width = Some(w);
        }
        if self.chars.peek() == Some(&'.') {
            self.chars.next();
            let p = self.parse_decimal()?.ok_or_else(|| {
                Error::new(ErrorKind::InvalidFormatString, "'.' must be followed by a decimal precision")
            })?;
            spec.precision = Some(p);
        }
        if self.chars.peek() == Some(&'L') {
            self.chars.next();
            spec.localized = true;
        }
        spec.presentation = self.parse_presentation(&mut spec.body)?;
        if spec.localized && !spec.presentation.is_integer_like()
            && !spec.presentation.is_float_like()
            && !matches!(spec.presentation, Presentation::Default | Presentation::S)
        {
            return Err(Error::new(
                ErrorKind::InvalidFormatString,
                "'L' requires an integer, float, or bool presentation",
            ));
        }
        Ok(spec)
    }

    /// One code point of lookahead decides fill vs. alignment, per
    /// §4.E's disambiguation rule: `P` followed by `<`/`>`/`^` makes `P`
    /// the fill character; otherwise `P` itself may *be* the alignment
    /// (fill defaults to space); otherwise neither is present.
    fn parse_fill_align(&mut self, spec: &mut FormatSpec) {
        let mut lookahead = self.chars.clone();
        if let Some(maybe_fill) = lookahead.next() {
            if let Some(&align_char) = lookahead.peek() {
                if let Some(align) = align_of(align_char) {
                    if maybe_fill != '{' {
                        spec.fill = maybe_fill;
                        spec.align = align;
                        self.chars.next();
                        self.chars.next();
                        return;
                    }
                }
            }
            if let Some(align) = align_of(maybe_fill) {
                spec.align = align;
                self.chars.next();
            }
        }
    }

    fn parse_presentation(&mut self, body: &mut String) -> Result<Presentation> {
        match self.chars.peek().copied() {
            None | Some('}') => Ok(Presentation::Default),
            Some('[') => {
                self.chars.next();
                body.push('[');
                let negated = if self.chars.peek() == Some(&'^') {
                    self.chars.next();
                    body.push('^');
                    true
                } else {
                    false
                };
                let inner = self.scan_bracket_body(body)?;
                Ok(Presentation::CharSet(CharSet::compile(&inner, negated, body.clone())?))
            }
            Some('/') => {
                self.chars.next();
                body.push('/');
                let pattern = self.scan_regex_pattern(body)?;
                let flags = self.scan_regex_flags(body)?;
                Ok(Presentation::Regex(RegexSpec { pattern, flags }))
            }
            Some(c @ ('r' | 'R')) => {
                self.chars.next();
                body.push(c);
                let base = self.parse_decimal()?.ok_or_else(|| {
                    Error::new(ErrorKind::InvalidFormatString, "'r'/'R' must be followed by a base")
                })?;
                if !(2..=36).contains(&base) {
                    return Err(Error::new(
                        ErrorKind::InvalidFormatString,
                        "arbitrary base must be between 2 and 36",
                    ));
                }
                body.push_str(&base.to_string());
                Ok(Presentation::ArbitraryBase(base as u32))
            }
            Some(c) => {
                self.chars.next();
                body.push(c);
                presentation_from_letter(c)
            }
        }
    }

    fn scan_bracket_body(&mut self, body: &mut String) -> Result<String> {
        let mut inner = String::new();
        // A literal ']' right after '[' or '[^' is a member, not the terminator.
        if self.chars.peek() == Some(&']') {
            self.chars.next();
            inner.push(']');
            body.push(']');
        }
        loop {
            match self.chars.next() {
                None => {
                    return Err(Error::new(
                        ErrorKind::InvalidFormatString,
                        "unterminated '[' charset in format string",
                    ))
                }
                Some(']') => {
                    body.push(']');
                    return Ok(inner);
                }
                Some('\\') => {
                    let escaped = self.chars.next().ok_or_else(|| {
                        Error::new(ErrorKind::InvalidFormatString, "dangling '\\' in charset")
                    })?;
                    inner.push('\\');
                    inner.push(escaped);
                    body.push('\\');
                    body.push(escaped);
                }
                Some(c) => {
                    inner.push(c);
                    body.push(c);
                }
            }
        }
    }

    fn scan_regex_pattern(&mut self, body: &mut String) -> Result<String> {
        let mut pattern = String::new();
        loop {
            match self.chars.next() {
                None => {
                    return Err(Error::new(
                        ErrorKind::InvalidFormatString,
                        "unterminated '/' regex in format string",
                    ))
                }
                Some('/') => {
                    body.push('/');
                    return Ok(pattern);
                }
                Some('\\') => {
                    let escaped = self.chars.next().ok_or_else(|| {
                        Error::new(ErrorKind::InvalidFormatString, "dangling '\\' in regex")
                    })?;
                    pattern.push('\\');
                    pattern.push(escaped);
                    body.push('\\');
                    body.push(escaped);
                }
                Some(c) => {
                    pattern.push(c);
                    body.push(c);
                }
            }
        }
    }

    fn scan_regex_flags(&mut self, body: &mut String) -> Result<RegexFlags> {
        let mut flags = RegexFlags::default();
        while let Some(&c) = self.chars.peek() {
            let recognized = match c {
                'm' => {
                    flags.multiline = true;
                    true
                }
                's' => {
                    flags.singleline = true;
                    true
                }
                'i' => {
                    flags.nocase = true;
                    true
                }
                'n' => {
                    flags.nocapture = true;
                    true
                }
                _ => false,
            };
            if !recognized {
                break;
            }
            body.push(c);
            self.chars.next();
        }
        Ok(flags)
    }
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        _ => None,
    }
}

fn presentation_from_letter(c: char) -> Result<Presentation> {
    Ok(match c {
        'b' | 'B' => Presentation::Binary,
        'o' | 'O' => Presentation::Octal,
        'd' => Presentation::Decimal,
        'x' | 'X' => Presentation::Hex,
        'u' => Presentation::Unsigned,
        'i' => Presentation::IntAuto,
        'c' => Presentation::Char,
        'a' => Presentation::HexFloat,
        'A' => Presentation::HexFloatUpper,
        'e' => Presentation::Scientific,
        'E' => Presentation::ScientificUpper,
        'f' => Presentation::Fixed,
        'F' => Presentation::FixedUpper,
        'g' => Presentation::General,
        'G' => Presentation::GeneralUpper,
        's' => Presentation::S,
        'p' => Presentation::PointerHex,
        other => {
            return Err(Error::new(
                ErrorKind::InvalidFormatString,
                format!("unknown presentation type '{other}'"),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_and_auto_fields() {
        let fs = parse("{} {} {}").unwrap();
        assert_eq!(fs.fields.len(), 5);
        assert!(matches!(fs.fields[0], Field::Replacement { id: 0, .. }));
        assert!(matches!(fs.fields[1], Field::Literal(ref s) if s == " "));
        assert!(matches!(fs.fields[2], Field::Replacement { id: 1, .. }));
    }

    #[test]
    fn mixing_automatic_and_manual_is_rejected() {
        assert!(parse("{} {0}").is_err());
        assert!(parse("{0} {}").is_err());
    }

    #[test]
    fn manual_ids_checked_against_arg_count() {
        let tags = [ArgTypeTag::I32, ArgTypeTag::F64];
        assert!(parse_checked("{0} {1}", &tags).is_ok());
        assert!(parse_checked("{0} {2}", &tags).is_err());
        assert!(parse_checked("{0} {0}", &tags).is_err());
    }

    #[test]
    fn all_arguments_must_be_consumed() {
        let tags = [ArgTypeTag::I32, ArgTypeTag::F64];
        assert!(parse_checked("{0}", &tags).is_err());
        assert!(parse_checked("{0} {1}", &tags).is_ok());
    }

    #[test]
    fn fill_align_lookahead() {
        let fs = parse("{:*>5}").unwrap();
        match &fs.fields[0] {
            Field::Replacement { spec, .. } => {
                assert_eq!(spec.fill, '*');
                assert_eq!(spec.align, Align::Right);
                assert_eq!(spec.width, Some(5));
            }
            _ => panic!("expected a replacement field"),
        }
    }

    #[test]
    fn align_without_explicit_fill_defaults_to_space() {
        let fs = parse("{:<8}").unwrap();
        match &fs.fields[0] {
            Field::Replacement { spec, .. } => {
                assert_eq!(spec.fill, ' ');
                assert_eq!(spec.align, Align::Left);
            }
            _ => panic!("expected a replacement field"),
        }
    }

    #[test]
    fn arbitrary_base_presentation() {
        let fs = parse("{:r16}").unwrap();
        match &fs.fields[0] {
            Field::Replacement { spec, .. } => {
                assert_eq!(spec.presentation, Presentation::ArbitraryBase(16));
            }
            _ => panic!("expected a replacement field"),
        }
    }

    #[test]
    fn charset_with_leading_literal_bracket() {
        let fs = parse("{:[]ab]}").unwrap();
        match &fs.fields[0] {
            Field::Replacement { spec, .. } => match &spec.presentation {
                Presentation::CharSet(cs) => {
                    assert!(cs.matches(']'));
                    assert!(cs.matches('a'));
                    assert!(!cs.matches('c'));
                }
                _ => panic!("expected a charset presentation"),
            },
            _ => panic!("expected a replacement field"),
        }
    }

    #[test]
    fn regex_field_with_flags() {
        let fs = parse("{:/[a-z]+/i}").unwrap();
        match &fs.fields[0] {
            Field::Replacement { spec, .. } => match &spec.presentation {
                Presentation::Regex(r) => {
                    assert_eq!(r.pattern, "[a-z]+");
                    assert!(r.flags.nocase);
                }
                _ => panic!("expected a regex presentation"),
            },
            _ => panic!("expected a replacement field"),
        }
    }

    #[test]
    fn presentation_must_fit_argument_type() {
        let tags = [ArgTypeTag::I32];
        assert!(parse_checked("{:d}", &tags).is_ok());
        assert!(parse_checked("{:s}", &tags).is_err());
    }

    #[test]
    fn char_presentation_on_a_string_requires_precision() {
        let tags = [ArgTypeTag::StringOwned];
        assert!(parse_checked("{:c}", &tags).is_err());
        assert!(parse_checked("{:.3c}", &tags).is_ok());
    }

    #[test]
    fn literal_braces_escape() {
        let fs = parse("{{}} {}").unwrap();
        assert!(matches!(fs.fields[0], Field::Literal(ref s) if s == "{} "));
    }

    #[test]
    fn unmatched_closing_brace_is_rejected() {
        assert!(parse("abc}").is_err());
    }

    proptest::proptest! {
        #[test]
        fn mixing_automatic_and_manual_ids_is_always_rejected(manual_id in 0usize..6) {
            let fmt = format!("{{}} {{{manual_id}}}");
            proptest::prop_assert!(parse(&fmt).is_err());
            let fmt = format!("{{{manual_id}}} {{}}");
            proptest::prop_assert!(parse(&fmt).is_err());
        }
    }
}
