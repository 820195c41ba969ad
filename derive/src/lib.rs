use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_frame_sets;
mod from_properties;

#[proc_macro_derive(FromProperties, attributes(property, raw))]
pub fn derive_from_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_properties::expand_from_properties(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

#[proc_macro_derive(FromFrameSets, attributes(source))]
pub fn derive_from_frame_sets(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match from_frame_sets::expand_from_frame_sets(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}
