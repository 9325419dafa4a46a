use swc_core::common::{sync::Lrc, FileName, SourceMap};
use swc_core::ecma::{
    ast::{EsVersion, Expr, Module},
    parser::{parse_file_as_expr, parse_file_as_module, EsSyntax, Syntax, TsSyntax},
};

pub fn parse_expr(src: &str) -> Box<Expr> {
    let cm = Lrc::<SourceMap>::default();
    let fm = cm.new_source_file(FileName::Custom("test.js".into()).into(), src.to_string());
    parse_file_as_expr(
        &fm,
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .unwrap()
}

pub fn parse_ts_module(src: &str) -> Module {
    let cm = Lrc::<SourceMap>::default();
    let fm = cm.new_source_file(FileName::Custom("test.tsx".into()).into(), src.to_string());
    parse_file_as_module(
        &fm,
        Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        }),
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .unwrap()
}
