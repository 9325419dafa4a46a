//! swc plugin that annotates lazy-component helper calls (`next/dynamic`
//! style) with the modules their loader imports, so a bundler can map each
//! call site to its code-split chunk.
//!
//! ```js
//! const Hello = dynamic(() => import("../components/hello"));
//! // becomes, in development
//! const Hello = dynamic(() => import("../components/hello"), {
//!     loadableGenerated: { modules: ["src/page.js -> " + "../components/hello"] }
//! });
//! ```

use swc_core::{
    ecma::{ast::Program, visit::VisitMutWith},
    plugin::{
        metadata::TransformPluginMetadataContextKind, plugin_transform,
        proxies::TransformPluginProgramMetadata,
    },
};

pub mod bindings;
pub mod config;
pub mod filename;
pub mod specifier;
pub mod transform;

#[cfg(test)]
mod test_utils;

pub use config::{resolve_config, Config, ConfigError, Mode};
pub use transform::{LoadableAnnotator, GENERATED_KEY};

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = resolve_config(metadata.get_transform_plugin_config());
    let filename = metadata.get_context(&TransformPluginMetadataContextKind::Filename);
    let env = metadata.get_context(&TransformPluginMetadataContextKind::Env);

    let mut annotator = LoadableAnnotator::new(
        config,
        filename.as_deref(),
        env.as_deref(),
        metadata.unresolved_mark,
    );
    program.visit_mut_with(&mut annotator);

    program
}
