//! Recognizes loader functions and pulls static module specifiers out of the
//! dynamic imports they contain.

use swc_core::common::Span;
use swc_core::ecma::{
    ast::*,
    visit::{Visit, VisitWith},
};

use crate::bindings::HelperBindings;

/// One dynamic `import()` call site found inside a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// `None` when the specifier is computed at runtime.
    pub specifier: Option<String>,
    pub span: Span,
}

/// Dynamic `import()` call sites inside a qualifying loader, in source order.
///
/// A loader is a parameterless arrow or function expression whose body is a
/// single expression (or a block holding only `return <expr>`) that resolves
/// to an `import()` call, optionally awaited or chained through
/// `.then`/`.catch`/`.finally`.
///
/// Imports under a nested helper call belong to that call and are not
/// returned.
pub fn loader_imports(loader: &Expr, bindings: &HelperBindings) -> Option<Vec<ImportSite>> {
    let tail = match unwrap_parens(loader) {
        Expr::Arrow(arrow) if arrow.params.is_empty() && !arrow.is_generator => {
            match &*arrow.body {
                BlockStmtOrExpr::Expr(e) => &**e,
                BlockStmtOrExpr::BlockStmt(block) => returned_expr(block)?,
            }
        }
        Expr::Fn(f) if f.function.params.is_empty() && !f.function.is_generator => {
            returned_expr(f.function.body.as_ref()?)?
        }
        _ => return None,
    };
    if !resolves_to_import(tail) {
        return None;
    }

    let mut collector = ImportCollector {
        bindings,
        found: vec![],
    };
    loader.visit_with(&mut collector);
    Some(collector.found)
}

/// Static specifier text of an `import()` call.
///
/// String literals yield their value, template literals without
/// interpolations yield their raw text. Anything computed yields `None`.
pub fn static_specifier(import: &CallExpr) -> Option<String> {
    let arg = import.args.first()?;
    if arg.spread.is_some() {
        return None;
    }
    match unwrap_parens(&arg.expr) {
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            Some(tpl.quasis.iter().map(|q| &*q.raw).collect())
        }
        _ => None,
    }
}

pub fn is_dynamic_import(call: &CallExpr) -> bool {
    matches!(call.callee, Callee::Import(_))
}

fn returned_expr(block: &BlockStmt) -> Option<&Expr> {
    let mut stmts = block
        .stmts
        .iter()
        .filter(|s| !matches!(s, Stmt::Empty(_)));
    match (stmts.next(), stmts.next()) {
        (Some(Stmt::Return(ReturnStmt { arg: Some(arg), .. })), None) => Some(&**arg),
        _ => None,
    }
}

fn resolves_to_import(expr: &Expr) -> bool {
    match unwrap_parens(expr) {
        Expr::Await(a) => resolves_to_import(&a.arg),
        Expr::Call(call) if is_dynamic_import(call) => true,
        // import("./x").then(m => m.Foo)
        Expr::Call(CallExpr {
            callee: Callee::Expr(callee),
            ..
        }) => match unwrap_parens(callee) {
            Expr::Member(MemberExpr {
                obj,
                prop: MemberProp::Ident(prop),
                ..
            }) if matches!(prop.sym.as_ref(), "then" | "catch" | "finally") => {
                resolves_to_import(obj)
            }
            _ => false,
        },
        _ => false,
    }
}

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(p) = expr {
        expr = &p.expr;
    }
    expr
}

struct ImportCollector<'a> {
    bindings: &'a HelperBindings,
    found: Vec<ImportSite>,
}

impl<'a> Visit for ImportCollector<'a> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.bindings.is_helper_call(call) {
            return;
        }
        if is_dynamic_import(call) {
            self.found.push(ImportSite {
                specifier: static_specifier(call),
                span: call.span,
            });
        }
        call.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::parse_expr;
    use pretty_assertions::assert_eq;

    fn specifiers(src: &str) -> Option<Vec<Option<String>>> {
        let expr = parse_expr(src);
        loader_imports(&expr, &HelperBindings::default())
            .map(|sites| sites.into_iter().map(|s| s.specifier).collect())
    }

    fn one(s: &str) -> Option<Vec<Option<String>>> {
        Some(vec![Some(s.to_string())])
    }

    #[test]
    fn arrow_and_function_loaders() {
        assert_eq!(specifiers("() => import('../components/hello')"), one("../components/hello"));
        assert_eq!(specifiers("() => import(`../components/hello`)"), one("../components/hello"));
        assert_eq!(specifiers("() => { return import('./a') }"), one("./a"));
        assert_eq!(specifiers("() => { ; return import('./a'); }"), one("./a"));
        assert_eq!(specifiers("function () { return import('./a') }"), one("./a"));
        assert_eq!(specifiers("(() => import('./a'))"), one("./a"));
        assert_eq!(specifiers("async () => await import('./a')"), one("./a"));
    }

    #[test]
    fn promise_chains() {
        assert_eq!(specifiers("() => import('./a').then((m) => m.Hello)"), one("./a"));
        assert_eq!(
            specifiers("() => import('./a').then(() => import('./b'))"),
            Some(vec![Some("./a".to_string()), Some("./b".to_string())])
        );
    }

    #[test]
    fn computed_specifiers_are_kept_as_none() {
        assert_eq!(
            specifiers("() => import(`${componentRoot}/component1`)"),
            Some(vec![None])
        );
        assert_eq!(specifiers("() => import(name)"), Some(vec![None]));
        assert_eq!(specifiers("() => import('./' + name)"), Some(vec![None]));
    }

    #[test]
    fn rejects_non_loaders() {
        assert_eq!(specifiers("(x) => import('./a')"), None);
        assert_eq!(specifiers("() => { sideEffect(); return import('./a') }"), None);
        assert_eq!(specifiers("() => require('./a')"), None);
        assert_eq!(specifiers("() => load(import('./a'))"), None);
        assert_eq!(specifiers("import('./a')"), None);
        assert_eq!(specifiers("Hello"), None);
    }
}
