//! Builds the constructor-dependency map [`reachability`] walks for `NURU051`.
//!
//! A service's "constructor" is its `fn new(...)` associated function (or, failing
//! that, the first `pub fn` in an inherent `impl` block returning `Self`) — the same
//! "look for the obvious free-standing constructor" convention
//! `crate::attrs::handler` uses for `fn handle`, applied to dependency injection
//! instead of route dispatch.

use ahash::HashMap;

use syn::{FnArg, Item, ReturnType, Type};

use crate::util;

/// `implementation_type -> the type names of its constructor's non-`self` parameters`.
pub type ConstructorIndex = HashMap<String, Vec<String>>;

pub fn scan_file(file: &syn::File, index: &mut ConstructorIndex) {
    visit_items(&file.items, index);
}

fn visit_items(items: &[Item], index: &mut ConstructorIndex) {
    for item in items {
        match item {
            Item::Impl(i) if i.trait_.is_none() => scan_impl(i, index),
            Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    visit_items(items, index);
                }
            }
            _ => {}
        }
    }
}

fn scan_impl(i: &syn::ItemImpl, index: &mut ConstructorIndex) {
    let Type::Path(self_ty) = i.self_ty.as_ref() else { return };
    let Some(self_name) = self_ty.path.segments.last().map(|s| s.ident.to_string()) else {
        return;
    };
    if index.contains_key(&self_name) {
        return;
    }

    let constructor = i.items.iter().find_map(|item| match item {
        syn::ImplItem::Fn(f) if f.sig.ident == "new" && returns_self(&f.sig.output) => Some(f),
        _ => None,
    });
    let Some(constructor) = constructor else { return };

    let deps = constructor
        .sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(t) => Some(util::type_to_string(&t.ty).trim_start_matches('&').to_string()),
            FnArg::Receiver(_) => None,
        })
        .collect();
    index.insert(self_name, deps);
}

fn returns_self(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => matches!(ty.as_ref(), Type::Path(p) if p.path.is_ident("Self")),
        ReturnType::Default => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_new_constructors_non_self_params() {
        let file: syn::File = syn::parse_quote! {
            struct Repo;
            impl Repo {
                fn new(db: Database, cache: &Cache) -> Self {
                    Self
                }
            }
        };
        let mut index = ConstructorIndex::default();
        scan_file(&file, &mut index);
        assert_eq!(
            index.get("Repo").cloned(),
            Some(vec!["Database".to_string(), "Cache".to_string()])
        );
    }

    #[test]
    fn ignores_impls_with_no_new_constructor() {
        let file: syn::File = syn::parse_quote! {
            struct Repo;
            impl Repo {
                fn from_env() -> Self {
                    Self
                }
            }
        };
        let mut index = ConstructorIndex::default();
        scan_file(&file, &mut index);
        assert!(!index.contains_key("Repo"));
    }

    #[test]
    fn trait_impls_are_not_scanned_for_constructors() {
        let file: syn::File = syn::parse_quote! {
            struct Repo;
            impl Default for Repo {
                fn new() -> Self {
                    Repo
                }
            }
        };
        let mut index = ConstructorIndex::default();
        scan_file(&file, &mut index);
        assert!(index.is_empty());
    }
}
