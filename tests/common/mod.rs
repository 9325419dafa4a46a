#![allow(dead_code)]

use loadable_swc_plugin::{Config, LoadableAnnotator, Mode};
use swc_core::{
    common::{sync::Lrc, FileName, Globals, Mark, SourceMap, GLOBALS},
    ecma::{
        ast::{EsVersion, Program},
        codegen::to_code_default,
        parser::{parse_file_as_module, EsSyntax, Syntax},
        transforms::base::resolver,
        visit::VisitMutWith,
    },
};

pub const FILENAME: &str = "src/some-file.js";

fn parse(cm: &Lrc<SourceMap>, src: &str) -> Program {
    let fm = cm.new_source_file(FileName::Custom("input.js".into()).into(), src.to_string());
    let module = parse_file_as_module(
        &fm,
        Syntax::Es(EsSyntax {
            jsx: true,
            ..Default::default()
        }),
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .unwrap();
    Program::Module(module)
}

pub fn config(mode: Mode) -> Config {
    Config {
        mode: Some(mode),
        ..Default::default()
    }
}

/// Parse, resolve, annotate and print `src`.
pub fn annotate_with(src: &str, config: Config, filename: Option<&str>, env: Option<&str>) -> String {
    GLOBALS.set(&Globals::new(), || {
        let cm = Lrc::<SourceMap>::default();
        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();

        let mut program = parse(&cm, src);
        program.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
        program.visit_mut_with(&mut LoadableAnnotator::new(
            config,
            filename,
            env,
            unresolved_mark,
        ));
        to_code_default(cm, None, &program)
    })
}

pub fn annotate(src: &str, mode: Mode) -> String {
    annotate_with(src, config(mode), Some(FILENAME), None)
}

/// Round-trip `src` through the printer so expectations are layout-insensitive.
pub fn normalize(src: &str) -> String {
    GLOBALS.set(&Globals::new(), || {
        let cm = Lrc::<SourceMap>::default();
        let program = parse(&cm, src);
        to_code_default(cm, None, &program)
    })
}
