// MIT License
//
// Copyright (c) 2024 the vscan contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Derives [`vscan::CustomScan`] for a struct with named fields, wiring it
//! into `vscan`'s custom-type dispatch so it can appear as a replacement
//! field's destination like any built-in type.
//!
//! ```ignore
//! #[derive(vscan_derive::Scan)]
//! #[vscan(fmt = "({}, {})")]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut p = Point { x: 0, y: 0 };
//! vscan::scan("(3, 4)", "{}", vec![&mut p]).unwrap();
//! assert_eq!((p.x, p.y), (3, 4));
//! ```
//!
//! Every field's type must implement `Default + vscan::Scannable`. The
//! `#[vscan(fmt = "...")]` attribute gives the inner format string the
//! derived type always scans with; the embedding field's own spec body
//! (width, fill, alignment, ...) is not forwarded to it — a custom
//! replacement field is expected to look like plain `{}`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

#[proc_macro_derive(Scan, attributes(vscan))]
pub fn derive_scan(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let default_fmt = fmt_attr(&input.attrs)?;

    let fields = named_fields(&input)?;
    let idents: Vec<_> = fields.iter().map(|f| f.ident.clone().unwrap()).collect();
    let types: Vec<_> = fields.iter().map(|f| f.ty.clone()).collect();

    Ok(quote! {
        impl ::vscan::CustomScan for #name {
            type ParsedSpec = ::vscan::FormatString;

            fn parse_spec(_raw: &str) -> ::vscan::Result<Self::ParsedSpec> {
                #( let #idents: #types = ::std::default::Default::default(); )*
                let tags = [ #( ::vscan::Scannable::tag(&#idents) ),* ];
                ::vscan::parse_checked(#default_fmt, &tags)
            }

            fn scan(
                cursor: &mut dyn ::vscan::ScanCursor,
                pos: ::vscan::Cursor,
                spec: &Self::ParsedSpec,
                locale: &dyn ::vscan::LocaleRef,
            ) -> ::vscan::Result<(Self, ::vscan::Cursor)> {
                #( let mut #idents: #types = ::std::default::Default::default(); )*
                let args: ::std::vec::Vec<&mut dyn ::vscan::Scannable> =
                    ::std::vec![ #( &mut #idents ),* ];
                let new_pos = ::vscan::scan_nested(cursor, pos, spec, args, locale)?;
                Ok((Self { #( #idents ),* }, new_pos))
            }
        }
    })
}

fn named_fields(
    input: &DeriveInput,
) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(&named.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Scan)] only supports structs with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "#[derive(Scan)] only supports structs",
        )),
    }
}

/// Reads the `#[vscan(fmt = "...")]` attribute, the derive's one required
/// piece of configuration.
fn fmt_attr(attrs: &[syn::Attribute]) -> syn::Result<String> {
    for attr in attrs {
        if !attr.path().is_ident("vscan") {
            continue;
        }
        let mut fmt = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("fmt") {
                let lit: LitStr = meta.value()?.parse()?;
                fmt = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported `vscan` attribute, expected `fmt`"))
            }
        })?;
        if let Some(fmt) = fmt {
            return Ok(fmt);
        }
    }
    Err(syn::Error::new(
        proc_macro2::Span::call_site(),
        "missing #[vscan(fmt = \"...\")] attribute",
    ))
}
