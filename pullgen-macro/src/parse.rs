use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{parse::Parse, Error, ItemFn, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    Lazy,
    Bounded,
}

impl Flavor {
    pub fn handle(self) -> TokenStream {
        match self {
            Flavor::Lazy => quote! { ::pullgen::LazyGenerator },
            Flavor::Bounded => quote! { ::pullgen::BoundedGenerator },
        }
    }
}

pub struct AttrGenerator {
    pub func: ItemFn,
    pub flavor: Option<Flavor>,
}

impl AttrGenerator {
    pub fn set_flavor(&mut self, flavor: Flavor, span: Span) -> Result<()> {
        match self.flavor.replace(flavor) {
            Some(previous) if previous != flavor => {
                Err(Error::new(span, "a generator is either `lazy` or `bounded`"))
            }
            _ => Ok(()),
        }
    }
}

impl Parse for AttrGenerator {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        Ok(AttrGenerator {
            func: input.parse()?,
            flavor: None,
        })
    }
}
