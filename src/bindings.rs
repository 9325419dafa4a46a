use std::collections::HashSet;

use swc_core::ecma::{
    ast::*,
    visit::{Visit, VisitWith},
};

use crate::config::Config;

/// Local bindings that refer to the lazy-component helper in one module.
///
/// Ids carry their syntax context, so a local that shadows the import is not
/// mistaken for the helper once the resolver has run.
#[derive(Debug, Default)]
pub struct HelperBindings {
    ids: HashSet<Id>,
}

impl HelperBindings {
    pub(crate) fn collect<N>(node: &N, config: &Config) -> Self
    where
        N: for<'a> VisitWith<BindingCollector<'a>>,
    {
        let mut ids = HashSet::new();
        let mut collector = BindingCollector {
            config,
            out: &mut ids,
        };
        node.visit_with(&mut collector);
        Self { ids }
    }

    pub fn is_helper(&self, ident: &Ident) -> bool {
        self.ids.contains(&ident.to_id())
    }

    /// Whether `call` invokes the helper through a plain identifier.
    pub fn is_helper_call(&self, call: &CallExpr) -> bool {
        match &call.callee {
            Callee::Expr(callee) => match &**callee {
                Expr::Ident(id) => self.is_helper(id),
                _ => false,
            },
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub(crate) struct BindingCollector<'a> {
    config: &'a Config,
    out: &'a mut HashSet<Id>,
}

impl<'a> Visit for BindingCollector<'a> {
    fn visit_import_decl(&mut self, n: &ImportDecl) {
        if n.type_only || !self.config.is_import_source(n.src.value.as_ref()) {
            return;
        }
        for s in &n.specifiers {
            match s {
                ImportSpecifier::Default(def) => {
                    self.out.insert(def.local.to_id());
                }
                // import { default as dynamic } from "next/dynamic"
                ImportSpecifier::Named(named) if !named.is_type_only => {
                    let is_default = match &named.imported {
                        Some(ModuleExportName::Ident(i)) => i.sym.as_ref() == "default",
                        Some(ModuleExportName::Str(s)) => s.value.as_ref() == "default",
                        None => false,
                    };
                    if is_default {
                        self.out.insert(named.local.to_id());
                    }
                }
                ImportSpecifier::Named(_) | ImportSpecifier::Namespace(_) => {}
            }
        }
    }

    // Imports only appear at the top level.
    fn visit_stmt(&mut self, _: &Stmt) {}
}
