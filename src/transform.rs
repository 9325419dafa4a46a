use swc_core::{
    common::{Mark, SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        utils::ExprFactory,
        visit::{VisitMut, VisitMutWith},
    },
};
use tracing::debug;

use crate::{
    bindings::HelperBindings,
    config::{Config, Mode},
    filename::display_path,
    specifier::loader_imports,
};

/// Key of the generated field on the helper's options object.
pub const GENERATED_KEY: &str = "loadableGenerated";

/// Separator between the containing file and the specifier in `modules` entries.
pub const MODULE_SEPARATOR: &str = " -> ";

// -----------------------------------------------------------------------------
// Transform state
// -----------------------------------------------------------------------------

pub struct LoadableAnnotator {
    config: Config,
    mode: Mode,
    /// Containing file as recorded in `modules` entries.
    file: String,
    /// Context for the free `require` in production output.
    unresolved_ctxt: SyntaxContext,
    bindings: HelperBindings,
}

impl LoadableAnnotator {
    /// `filename` and `env` are the host's values; the config overrides both.
    pub fn new(
        config: Config,
        filename: Option<&str>,
        env: Option<&str>,
        unresolved_mark: Mark,
    ) -> Self {
        let mode = config.mode.unwrap_or_else(|| Mode::from_env(env));
        let file = display_path(
            config.filename.as_deref().or(filename),
            config.project_root.as_deref(),
        );
        Self {
            config,
            mode,
            file,
            unresolved_ctxt: SyntaxContext::empty().apply_mark(unresolved_mark),
            bindings: Default::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    // ---------- helpers ----------

    fn str_lit(value: String) -> Box<Expr> {
        Box::new(Expr::Lit(Lit::Str(Str {
            span: DUMMY_SP,
            value: value.into(),
            raw: None,
        })))
    }

    fn key_value(key: &str, value: Box<Expr>) -> PropOrSpread {
        PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName::new(key.into(), DUMMY_SP)),
            value,
        })))
    }

    // "<file> -> " + "<specifier>"
    fn module_entry(&self, specifier: &str) -> Expr {
        Expr::Bin(BinExpr {
            span: DUMMY_SP,
            op: BinaryOp::Add,
            left: Self::str_lit(format!("{}{}", self.file, MODULE_SEPARATOR)),
            right: Self::str_lit(specifier.to_string()),
        })
    }

    // require.resolveWeak("<specifier>")
    fn resolve_weak(&self, specifier: &str) -> Expr {
        let member = MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(Expr::Ident(Ident::new(
                "require".into(),
                DUMMY_SP,
                self.unresolved_ctxt,
            ))),
            prop: MemberProp::Ident(IdentName::new("resolveWeak".into(), DUMMY_SP)),
        };
        Expr::Call(CallExpr {
            span: DUMMY_SP,
            callee: Callee::Expr(Box::new(Expr::Member(member))),
            args: vec![Self::str_lit(specifier.to_string()).as_arg()],
            type_args: None,
            ctxt: SyntaxContext::empty(),
        })
    }

    /// Value of the generated field for the given specifiers.
    fn generated_value(&self, specifiers: &[String]) -> Box<Expr> {
        let prop = match self.mode {
            Mode::Development => {
                let modules = ArrayLit {
                    span: DUMMY_SP,
                    elems: specifiers
                        .iter()
                        .map(|s| Some(self.module_entry(s).as_arg()))
                        .collect(),
                };
                Self::key_value("modules", Box::new(Expr::Array(modules)))
            }
            Mode::Production => {
                let resolved = ArrayLit {
                    span: DUMMY_SP,
                    elems: specifiers
                        .iter()
                        .map(|s| Some(self.resolve_weak(s).as_arg()))
                        .collect(),
                };
                let webpack = ArrowExpr {
                    span: DUMMY_SP,
                    ctxt: SyntaxContext::empty(),
                    params: vec![],
                    body: Box::new(BlockStmtOrExpr::Expr(Box::new(Expr::Array(resolved)))),
                    is_async: false,
                    is_generator: false,
                    type_params: None,
                    return_type: None,
                };
                Self::key_value("webpack", Box::new(Expr::Arrow(webpack)))
            }
        };
        Box::new(Expr::Object(ObjectLit {
            span: DUMMY_SP,
            props: vec![prop],
        }))
    }

    /// Specifiers of a qualifying helper call, or `None` to leave it untouched.
    fn qualifying_specifiers(&self, call: &CallExpr) -> Option<Vec<String>> {
        if !self.bindings.is_helper_call(call) {
            return None;
        }
        if call.args.is_empty()
            || call.args.len() > 2
            || call.args.iter().any(|a| a.spread.is_some())
        {
            debug!(file = %self.file, "skipping helper call with unsupported arguments");
            return None;
        }
        let Some(sites) = loader_imports(&call.args[0].expr, &self.bindings) else {
            debug!(file = %self.file, "skipping helper call whose loader is not a dynamic import");
            return None;
        };
        let mut specifiers = Vec::with_capacity(sites.len());
        for site in sites {
            match site.specifier {
                Some(s) => specifiers.push(s),
                None => {
                    debug!(file = %self.file, span = ?site.span, "skipping helper call with a computed import specifier");
                    return None;
                }
            }
        }
        Some(specifiers)
    }

    fn annotate(&self, call: &mut CallExpr, specifiers: &[String]) {
        let value = self.generated_value(specifiers);
        if call.args.len() < 2 {
            let options = ObjectLit {
                span: DUMMY_SP,
                props: vec![Self::key_value(GENERATED_KEY, value)],
            };
            call.args.push(Expr::Object(options).as_arg());
            return;
        }
        match unwrap_parens_mut(&mut call.args[1].expr) {
            Expr::Object(obj) => merge_generated(obj, value),
            _ => {
                debug!(file = %self.file, "skipping helper call whose options are not an object literal");
            }
        }
    }
}

/// Replace an existing generated field in place, or append one.
///
/// A shorthand `{ loadableGenerated }` is rewritten to a key-value prop at the
/// same position.
fn merge_generated(obj: &mut ObjectLit, value: Box<Expr>) {
    let existing = obj.props.iter_mut().find_map(|prop| match prop {
        PropOrSpread::Prop(p) => {
            let is_generated = match &**p {
                Prop::KeyValue(kv) => is_generated_key(&kv.key),
                Prop::Shorthand(i) => i.sym.as_ref() == GENERATED_KEY,
                _ => false,
            };
            is_generated.then_some(p)
        }
        PropOrSpread::Spread(_) => None,
    });
    let Some(p) = existing else {
        obj.props.push(LoadableAnnotator::key_value(GENERATED_KEY, value));
        return;
    };
    let key = match &**p {
        Prop::KeyValue(kv) => kv.key.clone(),
        _ => PropName::Ident(IdentName::new(GENERATED_KEY.into(), DUMMY_SP)),
    };
    **p = Prop::KeyValue(KeyValueProp { key, value });
}

fn unwrap_parens_mut(expr: &mut Expr) -> &mut Expr {
    match expr {
        Expr::Paren(p) => unwrap_parens_mut(&mut p.expr),
        other => other,
    }
}

fn is_generated_key(key: &PropName) -> bool {
    match key {
        PropName::Ident(i) => i.sym.as_ref() == GENERATED_KEY,
        PropName::Str(s) => s.value.as_ref() == GENERATED_KEY,
        _ => false,
    }
}

impl VisitMut for LoadableAnnotator {
    fn visit_mut_module(&mut self, m: &mut Module) {
        self.bindings = HelperBindings::collect(&*m, &self.config);
        if self.bindings.is_empty() {
            return;
        }
        m.visit_mut_children_with(self);
    }

    // Scripts have no import declarations, so nothing can be bound to the helper.
    fn visit_mut_script(&mut self, _: &mut Script) {}

    fn visit_mut_call_expr(&mut self, call: &mut CallExpr) {
        call.visit_mut_children_with(self);
        if let Some(specifiers) = self.qualifying_specifiers(call) {
            self.annotate(call, &specifiers);
        }
    }
}
