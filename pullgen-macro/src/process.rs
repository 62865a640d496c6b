use proc_macro2::Span;
use rand::{distributions::Alphanumeric, Rng};
use syn::spanned::Spanned;
use syn::{
    parse2, parse_quote,
    visit_mut::{visit_type_reference_mut, VisitMut},
    Attribute, Error, Expr, ExprLit, FnArg, GenericParam, Lifetime, LifetimeParam, Lit, Meta,
    Result, Signature, Stmt, Type, TypeParamBound, TypeReference,
};

use crate::{
    gen_visit::GenVisitor,
    parse::{AttrGenerator, Flavor},
};

impl AttrGenerator {
    pub fn process(mut self) -> Result<syn::ItemFn> {
        let flavor = self.flavor.unwrap_or(Flavor::Lazy);
        let syn::ItemFn {
            attrs, sig, block, ..
        } = &mut self.func;

        if let Some(asyncness) = sig.asyncness {
            return Err(Error::new(
                asyncness.span(),
                "generator functions are written without `async`; the body already runs as one",
            ));
        }

        let random: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();

        let yield_ty = Self::parse_yield_ty(sig);
        let fail_ty = Self::parse_fail_ty(attrs)?;
        let lifetime = Self::output_lifetime(sig, &random);

        let handle = flavor.handle();
        sig.output = parse_quote! { -> #handle<#lifetime, #yield_ty, #fail_ty> };

        let visitor = GenVisitor::new(&random);
        let body = visitor.into_generator(&mut block.stmts, handle, &yield_ty, &fail_ty)?;
        block.stmts = vec![Stmt::Expr(body, None)];

        // the implicit `Ok(())` after an endless loop
        attrs.push(parse_quote! { #[allow(unreachable_code)] });
        Ok(self.func)
    }

    fn parse_yield_ty(sig: &Signature) -> Type {
        match &sig.output {
            syn::ReturnType::Default => parse_quote! { () },
            syn::ReturnType::Type(_, t) => match &**t {
                Type::Paren(t) => (*t.elem).clone(),
                t => t.clone(),
            },
        }
    }

    fn parse_fail_ty(attrs: &mut Vec<Attribute>) -> Result<Type> {
        let Some(index) = attrs.iter().position(|attr| attr.path().is_ident("fails")) else {
            return Ok(parse_quote! { ::core::convert::Infallible });
        };
        match attrs.remove(index).meta {
            Meta::Path(path) => Err(Error::new(path.span(), "needs a failure type")),
            Meta::List(list) => parse2(list.tokens),
            Meta::NameValue(nv) => match nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(ty), ..
                }) => ty.parse(),
                value => Err(Error::new(
                    value.span(),
                    "needs a string value representing a type",
                )),
            },
        }
    }

    /// Picks the lifetime the producer may borrow for.
    ///
    /// A declared lifetime wins. Arguments with elided lifetimes get the
    /// elided one.
    /// Otherwise a fresh lifetime is introduced that every type parameter
    /// and `impl Trait` argument must outlive.
    fn output_lifetime(sig: &mut Signature, suffix: &str) -> Lifetime {
        if let Some(declared) = sig.generics.lifetimes().next() {
            return declared.lifetime.clone();
        }

        let mut borrows = Borrows { found: false };
        for arg in sig.inputs.clone().iter_mut() {
            borrows.visit_fn_arg_mut(arg);
        }
        if borrows.found {
            return Lifetime::new("'_", Span::call_site());
        }

        let fresh = Lifetime::new(&format!("'__gen_{suffix}"), Span::call_site());
        let type_params: Vec<_> = sig.generics.type_params().map(|p| p.ident.clone()).collect();
        sig.generics
            .params
            .insert(0, GenericParam::Lifetime(LifetimeParam::new(fresh.clone())));
        if !type_params.is_empty() {
            let where_clause = sig.generics.make_where_clause();
            for ident in type_params {
                where_clause.predicates.push(parse_quote! { #ident: #fresh });
            }
        }
        for arg in sig.inputs.iter_mut() {
            if let FnArg::Typed(typed) = arg {
                if let Type::ImplTrait(impl_trait) = &mut *typed.ty {
                    impl_trait
                        .bounds
                        .push(TypeParamBound::Lifetime(fresh.clone()));
                }
            }
        }
        fresh
    }
}

struct Borrows {
    found: bool,
}

impl VisitMut for Borrows {
    fn visit_type_reference_mut(&mut self, i: &mut TypeReference) {
        if i.lifetime.as_ref().map_or(true, |lt| lt.ident == "_") {
            self.found = true;
        }
        visit_type_reference_mut(self, i)
    }

    fn visit_lifetime_mut(&mut self, i: &mut Lifetime) {
        if i.ident == "_" {
            self.found = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;
    use syn::parse_quote;

    use crate::parse::{AttrGenerator, Flavor};

    fn expand(flavor: Option<Flavor>, func: syn::ItemFn) -> String {
        AttrGenerator { func, flavor }
            .process()
            .unwrap()
            .into_token_stream()
            .to_string()
    }

    #[test]
    fn defaults_to_lazy_and_infallible() {
        let out = expand(
            None,
            parse_quote! {
                fn naturals() -> u32 {
                    for n in 0.. {
                        yield_!(n);
                    }
                }
            },
        );
        assert!(out.contains(":: pullgen :: LazyGenerator"), "{out}");
        assert!(out.contains(":: core :: convert :: Infallible"), "{out}");
        assert!(out.contains(". produce (n) . await"), "{out}");
        assert!(!out.contains("yield_"), "{out}");
    }

    #[test]
    fn bounded_with_failure_type() {
        let out = expand(
            Some(Flavor::Bounded),
            parse_quote! {
                #[fails(std::num::ParseIntError)]
                fn parse(words: Vec<String>) -> i64 {
                    for word in words {
                        yield_!(word.parse::<i64>()?);
                    }
                }
            },
        );
        assert!(out.contains(":: pullgen :: BoundedGenerator"), "{out}");
        assert!(out.contains("std :: num :: ParseIntError"), "{out}");
        assert!(!out.contains("fails"), "{out}");
    }

    #[test]
    fn await_borrows_inner_generator() {
        let out = expand(
            None,
            parse_quote! {
                fn doubled(inner: pullgen::LazyGenerator<'static, u32>) -> u32 {
                    let mut inner = inner;
                    while let Some(v) = await_!(inner)? {
                        yield_!(v * 2);
                    }
                }
            },
        );
        assert!(out.contains(". chain (& mut inner) . await ?"), "{out}");
    }

    #[test]
    fn bare_return_ends_the_sequence() {
        let out = expand(
            None,
            parse_quote! {
                fn one() -> u8 {
                    yield_!(1);
                    return;
                }
            },
        );
        assert!(out.contains("return :: core :: result :: Result :: Ok (())"), "{out}");
    }

    #[test]
    fn borrowed_arguments_use_the_elided_lifetime() {
        let out = expand(
            None,
            parse_quote! {
                fn each(items: &[u8]) -> u8 {
                    for item in items {
                        yield_!(*item);
                    }
                }
            },
        );
        assert!(out.contains("LazyGenerator < '_ , u8"), "{out}");
    }

    #[test]
    fn static_borrows_do_not_count_as_elided() {
        let out = expand(
            None,
            parse_quote! {
                fn words(input: Vec<&'static str>) -> &'static str {
                    for word in input {
                        yield_!(word);
                    }
                }
            },
        );
        assert!(out.contains("LazyGenerator < '__gen_"), "{out}");
    }

    #[test]
    fn type_parameters_outlive_the_fresh_lifetime() {
        let out = expand(
            None,
            parse_quote! {
                fn repeat<T: Clone>(item: T) -> T {
                    loop {
                        yield_!(item.clone());
                    }
                }
            },
        );
        assert!(out.contains("where T : '__gen_"), "{out}");
    }

    #[test]
    fn async_functions_are_rejected() {
        let func: syn::ItemFn = parse_quote! {
            async fn nope() -> u8 {}
        };
        let Err(err) = (AttrGenerator { func, flavor: None }).process() else {
            panic!("async fn was accepted");
        };
        assert!(err.to_string().contains("without `async`"));
    }
}
