use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, Result, Type,
    parse::{Parse, ParseStream},
};

const SOURCES: [&str; 4] = ["Signal", "Background", "Reference", "Live"];

pub(crate) fn expand_from_frame_sets(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`FromFrameSets` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`FromFrameSets` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.source == field.source) {
            Err(Error::new_spanned(
                &field.source,
                "Source identifiers must be unique.",
            ))?
        }
    }

    let cases = fields.iter().map(|FieldMetadata { name, source }| {
        quote! {
            Source::#source => Some(self.#name.insert(Default::default())),
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromFrameSets for #name {
            #[allow(unreachable_patterns)]
            fn add_frame_set(&mut self, source: Source) -> Option<&mut dyn FromProperties> {
                match source {
                    #(#cases)*
                    _ => None,
                }
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    source: Ident,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("source")) else {
            return Ok(None);
        };

        let SourceAttribute { source } = attr.meta.require_list()?.parse_args()?;

        let Type::Path(path) = &field.ty else {
            Err(Error::new_spanned(
                &field.ty,
                "Field must have a type annotation.",
            ))?
        };

        let Some(segment) = path.path.segments.last() else {
            Err(Error::new_spanned(
                &path.path.segments,
                "Field must have an `Option<T>` type.",
            ))?
        };

        if segment.ident != "Option" {
            Err(Error::new_spanned(
                &segment.ident,
                "Field must have an `Option<T>` type.",
            ))?
        }

        Ok(Some(Self { name, source }))
    }
}

#[derive(Debug)]
struct SourceAttribute {
    source: Ident,
}

impl Parse for SourceAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let source = input.parse::<Ident>()?;

        if !SOURCES.iter().any(|s| source == s) {
            Err(Error::new_spanned(
                &source,
                "Source must be one of `Signal`, `Background`, `Reference` or `Live`.",
            ))?
        }

        Ok(Self { source })
    }
}
