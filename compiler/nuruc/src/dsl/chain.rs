//! Flattens a fluent method-call chain (`AppBuilder::new()....build()`) from its
//! natural `syn` shape — nested `MethodCall { receiver: MethodCall { .. } }` — into a
//! linear, root-to-leaf list the interpreter can walk with a simple state machine.

use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Expr, ExprCall, ExprMethodCall};

pub enum ChainLink<'a> {
    /// `AppBuilder::new(args)` (or `nuru::AppBuilder::new(args)`).
    Root {
        args: &'a Punctuated<Expr, Comma>,
        span: proc_macro2::Span,
    },
    Method {
        name: String,
        args: &'a Punctuated<Expr, Comma>,
        turbofish: Vec<String>,
        span: proc_macro2::Span,
    },
}

impl ChainLink<'_> {
    pub fn name(&self) -> Option<&str> {
        match self {
            ChainLink::Root { .. } => None,
            ChainLink::Method { name, .. } => Some(name),
        }
    }
}

/// Try to flatten `expr` into a chain rooted at `AppBuilder::new(...)`. Returns `None`
/// if `expr` isn't such a chain (e.g. it's an unrelated call or a plain literal).
pub fn flatten(expr: &Expr) -> Option<Vec<ChainLink<'_>>> {
    let mut out = Vec::new();
    if flatten_into(expr, &mut out) {
        Some(out)
    } else {
        None
    }
}

fn flatten_into<'a>(expr: &'a Expr, out: &mut Vec<ChainLink<'a>>) -> bool {
    match expr {
        Expr::MethodCall(ExprMethodCall {
            receiver,
            method,
            args,
            turbofish,
            ..
        }) => {
            if !flatten_into(receiver, out) {
                return false;
            }
            let generics = turbofish
                .as_ref()
                .map(|t| {
                    t.args
                        .iter()
                        .filter_map(|a| match a {
                            syn::GenericArgument::Type(ty) => Some(crate::util::type_to_string(ty)),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default();
            out.push(ChainLink::Method {
                name: method.to_string(),
                args,
                turbofish: generics,
                span: method.span(),
            });
            true
        }
        Expr::Call(ExprCall { func, args, .. }) => {
            let Expr::Path(p) = func.as_ref() else {
                return false;
            };
            let is_builder_new = p
                .path
                .segments
                .last()
                .is_some_and(|s| s.ident == "new")
                && p.path
                    .segments
                    .iter()
                    .rev()
                    .nth(1)
                    .is_some_and(|s| s.ident == "AppBuilder");
            if !is_builder_new {
                return false;
            }
            out.push(ChainLink::Root {
                args,
                span: p.path.segments.last().unwrap().ident.span(),
            });
            true
        }
        Expr::Paren(p) => flatten_into(&p.expr, out),
        _ => false,
    }
}
