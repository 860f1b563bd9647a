//! §4.D ARGUMENT STORE: the type-erased mapping from a positional index
//! to a destination slot, plus the closed [`ArgTypeTag`] enumeration that
//! the format parser/checker validates presentation types against.
//!
//! The original's split between a bit-packed header word (for ≤ N args)
//! and a linear `{tag, value}` array (for more) exists to avoid a heap
//! allocation in the common case while keeping the representation one
//! machine word. Rust's `&mut dyn Scannable` is already a fat pointer, so
//! packing it further into a header bitfield buys nothing and would need
//! `unsafe` niche tricks with no portability guarantee — see DESIGN.md.
//! What's kept is the *shape* of the decision: an inline array for small
//! arities, a `Vec` only once that's exceeded.

use crate::buffer::{Cursor, ScanCursor};
use crate::error::Result;
use crate::format::FormatSpec;
use crate::locale::LocaleRef;

/// The closed set of argument types the scanner dispatches on. Each
/// built-in Rust type that can appear as a `scan` argument maps to
/// exactly one tag; user types implementing [`CustomScan`] all share
/// `Custom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgTypeTag {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    Bool,
    Char,
    CodePoint,
    Pointer,
    F32,
    F64,
    StringOwned,
    Custom,
}

impl ArgTypeTag {
    /// Whether this tag may ever legally pair with `presentation`, used
    /// by the format-string checker (§4.F) before any scanning happens.
    pub fn accepts(self, presentation: &crate::format::Presentation) -> bool {
        use crate::format::Presentation as P;
        match self {
            ArgTypeTag::I8
            | ArgTypeTag::I16
            | ArgTypeTag::I32
            | ArgTypeTag::I64
            | ArgTypeTag::I128
            | ArgTypeTag::Isize
            | ArgTypeTag::U8
            | ArgTypeTag::U16
            | ArgTypeTag::U32
            | ArgTypeTag::U64
            | ArgTypeTag::U128
            | ArgTypeTag::Usize => matches!(
                presentation,
                P::Default
                    | P::Binary
                    | P::Octal
                    | P::Decimal
                    | P::Hex
                    | P::Unsigned
                    | P::IntAuto
                    | P::ArbitraryBase(_)
                    | P::Char
            ),
            ArgTypeTag::Bool => matches!(
                presentation,
                P::Default | P::S | P::Decimal | P::IntAuto | P::Hex | P::Octal | P::Binary
            ),
            ArgTypeTag::Char => matches!(
                presentation,
                P::Default
                    | P::Char
                    | P::Binary
                    | P::Octal
                    | P::Decimal
                    | P::Hex
                    | P::Unsigned
                    | P::IntAuto
                    | P::ArbitraryBase(_)
            ),
            ArgTypeTag::CodePoint => matches!(presentation, P::Default | P::Char),
            ArgTypeTag::F32 | ArgTypeTag::F64 => matches!(
                presentation,
                P::Default | P::HexFloat | P::HexFloatUpper | P::Scientific
                    | P::ScientificUpper | P::Fixed | P::FixedUpper | P::General | P::GeneralUpper
            ),
            ArgTypeTag::StringOwned => matches!(
                presentation,
                P::Default | P::S | P::Char | P::CharSet(_) | P::Regex(_)
            ),
            ArgTypeTag::Pointer => matches!(presentation, P::Default | P::PointerHex),
            ArgTypeTag::Custom => true,
        }
    }
}

/// Written to by the dispatcher once a field's value has been scanned.
/// Built-ins implement this directly; user types implement
/// [`CustomScan`] instead and get a blanket impl for free — that blanket
/// impl is the "trampoline" of §4.D, re-parsing the field's raw spec text
/// with the user type's own parser before calling its own scanner.
pub trait Scannable {
    fn tag(&self) -> ArgTypeTag;

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor>;
}

/// A user type scanned through a custom replacement field. `ParsedSpec`
/// is whatever that type wants to remember from the spec body (e.g. a
/// `[...]`-like mini-grammar of its own); [`FormatSpec::custom_body`]
/// hands over the raw, unparsed text between `:` and `}` for this
/// purpose, mirroring the trampoline's `parse-ctx* -> scan-ctx*` step.
pub trait CustomScan: Sized {
    type ParsedSpec;

    fn parse_spec(raw: &str) -> Result<Self::ParsedSpec>;

    fn scan(
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &Self::ParsedSpec,
        locale: &dyn LocaleRef,
    ) -> Result<(Self, Cursor)>;
}

impl<T: CustomScan> Scannable for T {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::Custom
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let raw = spec.custom_body();
        let parsed = T::parse_spec(raw)?;
        let (value, new_pos) = T::scan(cursor, pos, &parsed, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

/// Inline capacity before the store spills to a heap `Vec`; chosen, as
/// in spec.md, to cover the overwhelming majority of real format
/// strings without allocating.
pub const INLINE_CAPACITY: usize = 8;

/// The type-erased argument vector a `scan` call is dispatched against.
/// `args[i]` is `(tag, destination)` for positional argument `i`.
pub enum ArgStore<'a> {
    Inline {
        len: usize,
        slots: [Option<(ArgTypeTag, &'a mut dyn Scannable)>; INLINE_CAPACITY],
    },
    Spilled(Vec<(ArgTypeTag, &'a mut dyn Scannable)>),
}

impl<'a> ArgStore<'a> {
    pub fn from_vec(args: Vec<&'a mut dyn Scannable>) -> Self {
        let tagged: Vec<(ArgTypeTag, &'a mut dyn Scannable)> =
            args.into_iter().map(|a| (a.tag(), a)).collect();
        if tagged.len() <= INLINE_CAPACITY {
            let mut slots: [Option<(ArgTypeTag, &'a mut dyn Scannable)>; INLINE_CAPACITY] =
                std::array::from_fn(|_| None);
            let len = tagged.len();
            for (slot, item) in slots.iter_mut().zip(tagged) {
                *slot = Some(item);
            }
            ArgStore::Inline { len, slots }
        } else {
            ArgStore::Spilled(tagged)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArgStore::Inline { len, .. } => *len,
            ArgStore::Spilled(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tag(&self, index: usize) -> Option<ArgTypeTag> {
        match self {
            ArgStore::Inline { len, slots } => {
                if index < *len {
                    slots[index].as_ref().map(|(t, _)| *t)
                } else {
                    None
                }
            }
            ArgStore::Spilled(v) => v.get(index).map(|(t, _)| *t),
        }
    }

    /// Visit argument `index`'s destination through the dispatcher's
    /// scanner invocation. Returns `None` if `index` is out of range —
    /// callers treat that as `invalid_format_string` (§4.H step 1).
    pub fn scan_into(
        &mut self,
        index: usize,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Option<Result<Cursor>> {
        let slot = match self {
            ArgStore::Inline { len, slots } => {
                if index >= *len {
                    return None;
                }
                slots[index].as_mut().map(|(_, v)| v)
            }
            ArgStore::Spilled(v) => v.get_mut(index).map(|(_, v)| v),
        }?;
        Some(slot.scan_field(cursor, pos, spec, locale))
    }
}

macro_rules! impl_scannable_int {
    ($($t:ty => $tag:ident),* $(,)?) => {
        $(
            impl Scannable for $t {
                fn tag(&self) -> ArgTypeTag {
                    ArgTypeTag::$tag
                }

                fn scan_field(
                    &mut self,
                    cursor: &mut dyn ScanCursor,
                    pos: Cursor,
                    spec: &FormatSpec,
                    locale: &dyn LocaleRef,
                ) -> Result<Cursor> {
                    let (value, new_pos) = crate::scanners::integer::scan::<$t>(cursor, pos, spec, locale)?;
                    *self = value;
                    Ok(new_pos)
                }
            }
        )*
    };
}

impl_scannable_int!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, i128 => I128, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128, usize => Usize,
);

impl Scannable for bool {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::Bool
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::boolean::scan(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for char {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::Char
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::character::scan_char(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for f32 {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::F32
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::float::scan::<f32>(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for f64 {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::F64
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::float::scan::<f64>(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for String {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::StringOwned
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::string::scan(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for crate::scanners::character::CodePoint {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::CodePoint
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::character::scan_code_point(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

impl Scannable for crate::scanners::pointer::Pointer {
    fn tag(&self) -> ArgTypeTag {
        ArgTypeTag::Pointer
    }

    fn scan_field(
        &mut self,
        cursor: &mut dyn ScanCursor,
        pos: Cursor,
        spec: &FormatSpec,
        locale: &dyn LocaleRef,
    ) -> Result<Cursor> {
        let (value, new_pos) = crate::scanners::pointer::scan(cursor, pos, spec, locale)?;
        *self = value;
        Ok(new_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_arities_stay_inline() {
        let mut a = 0i32;
        let mut b = 0.0f64;
        let store = ArgStore::from_vec(vec![&mut a, &mut b]);
        assert!(matches!(store, ArgStore::Inline { len: 2, .. }));
        assert_eq!(store.tag(0), Some(ArgTypeTag::I32));
        assert_eq!(store.tag(1), Some(ArgTypeTag::F64));
        assert_eq!(store.tag(2), None);
    }

    #[test]
    fn large_arities_spill() {
        let mut vals = [0i32; INLINE_CAPACITY + 1];
        let store = ArgStore::from_vec(vals.iter_mut().map(|v| v as &mut dyn Scannable).collect());
        assert!(matches!(store, ArgStore::Spilled(_)));
        assert_eq!(store.len(), INLINE_CAPACITY + 1);
    }
}
