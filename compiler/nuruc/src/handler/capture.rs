//! Free-identifier capture detection (`NURU_H002`, §4.5, §9 "captures on external
//! state"). A handler closure may only reference its own parameters and
//! crate-level items (functions, types, constants) — anything else is a captured
//! local variable from the enclosing scope, which the emitted dispatcher has no way
//! to reconstruct.

use std::collections::HashSet;

use syn::visit::{self, Visit};
use syn::ExprClosure;

struct CaptureFinder {
    bound: HashSet<String>,
    found_capture: bool,
}

impl<'ast> Visit<'ast> for CaptureFinder {
    fn visit_expr_path(&mut self, path: &'ast syn::ExprPath) {
        if path.path.segments.len() == 1 && path.qself.is_none() {
            let ident = path.path.segments[0].ident.to_string();
            if !self.bound.contains(&ident) && !is_allowed_free_identifier(&ident) {
                self.found_capture = true;
            }
        }
        visit::visit_expr_path(self, path);
    }

    fn visit_pat_ident(&mut self, pat: &'ast syn::PatIdent) {
        self.bound.insert(pat.ident.to_string());
        visit::visit_pat_ident(self, pat);
    }
}

/// `true` for identifiers that never count as a capture even though they're free:
/// common std/crate items a handler is allowed to reference directly, and bindings
/// introduced by `?`/match arms that `syn` still reports as a path expression.
fn is_allowed_free_identifier(ident: &str) -> bool {
    matches!(
        ident,
        "self"
            | "Ok"
            | "Err"
            | "Some"
            | "None"
            | "Default"
            | "String"
            | "Vec"
            | "Box"
            | "Result"
            | "Option"
    ) || ident.chars().next().is_some_and(|c| c.is_uppercase())
}

/// `true` if `closure`'s body references an identifier that isn't one of its own
/// parameters, a crate-level item, or an allowed well-known free identifier.
pub fn has_capture(closure: &ExprClosure) -> bool {
    let mut bound = HashSet::new();
    for input in &closure.inputs {
        collect_pat_idents(input, &mut bound);
    }

    let mut finder = CaptureFinder {
        bound,
        found_capture: false,
    };
    finder.visit_expr(&closure.body);
    finder.found_capture
}

fn collect_pat_idents(pat: &syn::Pat, out: &mut HashSet<String>) {
    match pat {
        syn::Pat::Ident(i) => {
            out.insert(i.ident.to_string());
        }
        syn::Pat::Type(t) => collect_pat_idents(&t.pat, out),
        syn::Pat::Reference(r) => collect_pat_idents(&r.pat, out),
        syn::Pat::Tuple(t) => t.elems.iter().for_each(|p| collect_pat_idents(p, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn pure_closure_has_no_capture() {
        let closure: ExprClosure = parse_quote!(|env: String| Ok(env.clone()));
        assert!(!has_capture(&closure));
    }

    #[test]
    fn closure_referencing_outer_variable_is_flagged() {
        let closure: ExprClosure = parse_quote!(|env: String| {
            let combined = env.clone();
            suffix.push_str(&combined);
            Ok(combined)
        });
        assert!(has_capture(&closure));
    }
}
