use proc_macro2::{Ident, TokenStream};
use quote::format_ident;
use syn::{
    parse_quote,
    visit_mut::{visit_expr_mut, visit_stmt_mut, VisitMut},
    Error, Expr, ExprReturn, Macro, Stmt, Type,
};

/// Rewrites `yield_!`, `await_!` and bare `return`s of a generator body
/// into operations on the producer's `Yielder`.
pub struct GenVisitor {
    pub co: Ident,
    pub error: Option<Error>,
}

enum BodyMacro {
    Yield,
    Await,
}

impl GenVisitor {
    pub fn new(suffix: &str) -> Self {
        GenVisitor {
            co: format_ident!("__co_{}", suffix),
            error: None,
        }
    }

    /// Wraps the rewritten statements into a producer closure handed to
    /// `handle::new`.
    pub fn into_generator(
        mut self,
        stmts: &mut [Stmt],
        handle: TokenStream,
        yield_ty: &Type,
        fail_ty: &Type,
    ) -> syn::Result<Expr> {
        stmts.iter_mut().for_each(|stmt| self.visit_stmt_mut(stmt));
        if let Some(error) = self.error {
            return Err(error);
        }
        // the body's tail is followed by the implicit `Ok(())`
        if let Some(Stmt::Expr(tail, semi @ None)) = stmts.last_mut() {
            if !is_block_like(tail) {
                *semi = Some(Default::default());
            }
        }

        let co = &self.co;
        Ok(parse_quote! {
            #handle::new(move |#co: ::pullgen::Yielder<#yield_ty, #fail_ty>| async move {
                #(#stmts)*
                ::core::result::Result::<(), #fail_ty>::Ok(())
            })
        })
    }

    fn body_macro(mac: &Macro) -> Option<BodyMacro> {
        let ident = &mac.path.segments.last()?.ident;
        if ident == "yield_" {
            Some(BodyMacro::Yield)
        } else if ident == "await_" {
            Some(BodyMacro::Await)
        } else {
            None
        }
    }

    fn expand(&mut self, kind: BodyMacro, mac: &Macro) -> Expr {
        let mut inner: Expr = if mac.tokens.is_empty() {
            parse_quote! { () }
        } else {
            match mac.parse_body() {
                Ok(expr) => expr,
                Err(e) => {
                    self.push_error(e);
                    return parse_quote! { () };
                }
            }
        };
        self.visit_expr_mut(&mut inner);

        let co = &self.co;
        match kind {
            BodyMacro::Yield => parse_quote! { #co.produce(#inner).await },
            BodyMacro::Await => parse_quote! { #co.chain(&mut #inner).await },
        }
    }

    fn push_error(&mut self, error: Error) {
        match &mut self.error {
            Some(existing) => existing.combine(error),
            None => self.error = Some(error),
        }
    }
}

impl VisitMut for GenVisitor {
    fn visit_stmt_mut(&mut self, i: &mut Stmt) {
        if let Stmt::Macro(stmt) = i {
            if let Some(kind) = Self::body_macro(&stmt.mac) {
                let semi = stmt.semi_token;
                let mac = stmt.mac.clone();
                *i = Stmt::Expr(self.expand(kind, &mac), semi);
                return;
            }
        }
        visit_stmt_mut(self, i)
    }

    fn visit_expr_mut(&mut self, i: &mut Expr) {
        match i {
            Expr::Macro(m) => {
                if let Some(kind) = Self::body_macro(&m.mac) {
                    let mac = m.mac.clone();
                    *i = self.expand(kind, &mac);
                }
            }
            Expr::Return(ExprReturn { expr: None, .. }) => {
                *i = parse_quote! { return ::core::result::Result::Ok(()) };
            }

            // these run outside of the producer and cannot suspend it
            Expr::Closure(_) | Expr::Async(_) => {}

            i => visit_expr_mut(self, i),
        }
    }

    // nested items are not part of the body
    fn visit_item_mut(&mut self, _: &mut syn::Item) {}
}

fn is_block_like(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Block(_)
            | Expr::ForLoop(_)
            | Expr::If(_)
            | Expr::Loop(_)
            | Expr::Match(_)
            | Expr::Unsafe(_)
            | Expr::While(_)
    )
}
