use std::collections::HashSet;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitStr, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_properties(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromProperties` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromProperties` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut property_cases = Vec::new();
    let mut raw_cases = Vec::new();
    let mut seen_properties = HashSet::new();
    let mut seen_raw = HashSet::new();

    for field in fields {
        let name = field.name;

        match field.identifier {
            FieldIdentifier::Property(property) => {
                if !seen_properties.insert(property.to_string()) {
                    Err(Error::new_spanned(
                        &property,
                        "Property identifiers must be unique.",
                    ))?
                }

                let value_type = field.value_type;

                let assignment = if let Some((field_type, handler)) = field.handler {
                    let body = handler.body;
                    let acc = &handler.inputs[0];
                    let val = &handler.inputs[1];

                    quote! {
                        (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
                    }
                } else {
                    quote! {
                        self.#name = Some(value)
                    }
                };

                property_cases.push(quote! {
                    Property::#property => {
                        if let Some(value) = <#value_type as FromValue>::from_value(value) {
                            #assignment;
                        }
                    }
                });
            }
            FieldIdentifier::Raw(line) => {
                if !seen_raw.insert(line.value()) {
                    Err(Error::new_spanned(
                        &line,
                        "Raw line names must be unique.",
                    ))?
                }

                raw_cases.push(quote! {
                    #line => { self.#name = Some(text.into()); }
                });
            }
        }
    }

    let property_method = (!property_cases.is_empty()).then(|| {
        quote! {
            fn add_property(&mut self, property: Property, value: &Value) {
                match property {
                    #(#property_cases)*
                    _ => {}
                };
            }
        }
    });

    let raw_method = (!raw_cases.is_empty()).then(|| {
        quote! {
            fn add_raw(&mut self, name: &str, text: &str) {
                match name {
                    #(#raw_cases)*
                    _ => {}
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromProperties for #name {
            #property_method
            #raw_method
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    value_type: Type,
    identifier: FieldIdentifier,
    handler: Option<(Type, ExprClosure)>,
}

#[derive(Debug)]
enum FieldIdentifier {
    Property(Ident),
    Raw(LitStr),
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(name) = field.ident.clone() else {
            Err(Error::new_spanned(field, "Field must be named."))?
        };

        let attr = field
            .attrs
            .iter()
            .find(|a| a.path().is_ident("property") || a.path().is_ident("raw"));

        let Some(attr) = attr else {
            return Ok(None);
        };

        if attr.path().is_ident("raw") {
            let line = attr.meta.require_list()?.parse_args::<LitStr>()?;

            return Ok(Some(Self {
                name,
                value_type: option_inner(&field.ty)?,
                identifier: FieldIdentifier::Raw(line),
                handler: None,
            }));
        }

        let PropertyAttribute { property, handler } = attr.meta.require_list()?.parse_args()?;

        let value_type = if let Some(handler) = &handler {
            if handler.inputs.len() != 2 {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            }

            let parameter = &handler.inputs[1];

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected value type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            option_inner(&field.ty)?
        };

        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            value_type,
            identifier: FieldIdentifier::Property(property),
            handler,
        }))
    }
}

/// Extract `T` from a field of type `Option<T>`.
fn option_inner(ty: &Type) -> Result<Type> {
    let Type::Path(path) = ty else {
        Err(Error::new_spanned(ty, "Field must have a type annotation."))?
    };

    let Some(segment) = path.path.segments.last() else {
        Err(Error::new_spanned(
            &path.path.segments,
            "Field must have a type annotation.",
        ))?
    };

    if segment.ident != "Option" {
        Err(Error::new_spanned(
            &segment.ident,
            "Field without a handler must have type `Option<T>`.",
        ))?
    }

    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        Err(Error::new_spanned(
            &segment.arguments,
            "Field of type `Option<T>` must have a generic parameter.",
        ))?
    };

    let Some(GenericArgument::Type(inner_type)) = arguments.args.first() else {
        Err(Error::new_spanned(
            &arguments.args,
            "Generic argument of a field of type `Option<T>` must be a type.",
        ))?
    };

    Ok(inner_type.clone())
}

#[derive(Debug)]
struct PropertyAttribute {
    property: Ident,
    handler: Option<ExprClosure>,
}

impl Parse for PropertyAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let property = input.parse::<Ident>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self { property, handler })
    }
}
