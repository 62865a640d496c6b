use parse::{AttrGenerator, Flavor};
use proc_macro::TokenStream as TokenStream1;
use proc_macro2::Ident;
use quote::ToTokens;
use syn::{
    ext::IdentExt, parse::Parser, parse_macro_input, punctuated::Punctuated, token::Comma, Error,
};

mod gen_visit;
mod parse;
mod process;

#[proc_macro_attribute]
pub fn generator(args: TokenStream1, input: TokenStream1) -> TokenStream1 {
    let mut input = parse_macro_input!(input as AttrGenerator);

    fn parser(input: syn::parse::ParseStream) -> syn::Result<Punctuated<Ident, Comma>> {
        Punctuated::<Ident, Comma>::parse_terminated_with(input, Ident::parse_any)
    }
    let kinds = match parser.parse(args) {
        Ok(x) => x,
        Err(e) => return e.to_compile_error().into(),
    };
    for kind in kinds {
        let flavor = match kind.to_string().as_str() {
            "lazy" => Flavor::Lazy,
            "bounded" => Flavor::Bounded,
            _other => {
                return Error::new(kind.span(), "unknown generator kind, expected `lazy` or `bounded`")
                    .into_compile_error()
                    .into()
            }
        };
        if let Err(e) = input.set_flavor(flavor, kind.span()) {
            return e.into_compile_error().into();
        }
    }

    input
        .process()
        .map_or_else(|e| e.to_compile_error(), ToTokens::into_token_stream)
        .into()
}
