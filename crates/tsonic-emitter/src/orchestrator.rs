//! Orchestration: drives per-module lowering into a deterministic file
//! map.
//!
//! Modules are independent, so lowering fans out across them with
//! rayon; results are collected back in input order, so the output map
//! is byte-identical no matter how the work was scheduled. Per-module
//! errors land in the result's `errors` vector without aborting
//! siblings.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info_span};

use tsonic_common::diagnostics::EmitError;
use tsonic_ir::IrModule;

use crate::cs_ast::{
    CsCompilationUnit, CsNamespace, CsNamespaceMember, CsTypeDeclaration, CsTypeKind, CsType,
    Modifiers,
};
use crate::emit_context::{EmitterContext, EmitterOptions};
use crate::lowering::declarations;
use crate::printer::print_compilation_unit;

/// The fixed timestamp line: output must be byte-identical across
/// invocations, so wall-clock time never appears.
pub const GENERATED_AT: &str = "0001-01-01T00:00:00Z";

/// File that hosts the marker attribute definition when at least one
/// module lowered as a static container.
pub const MODULE_CONTAINERS_FILE: &str = "__tsonic_module_containers.g.cs";

#[derive(Debug)]
pub struct EmitResult {
    /// Relative path → UTF-8 C# source, in deterministic order: modules
    /// in input order, cross-cutting `__tsonic_*` units last.
    pub files: IndexMap<String, String>,
    pub errors: Vec<EmitError>,
}

impl EmitResult {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Emit a whole program.
pub fn emit_program(modules: &[IrModule], options: &EmitterOptions) -> EmitResult {
    let options = Arc::new(options.clone());

    let lowered: Vec<Result<(String, String, bool), EmitError>> = modules
        .par_iter()
        .map(|module| {
            let span = info_span!("emit_module", path = %module.file_path);
            let _enter = span.enter();
            emit_module(module, Arc::clone(&options))
                .map_err(|e| e.in_module(module.file_path.clone()))
        })
        .collect();

    let mut files = IndexMap::new();
    let mut errors = Vec::new();
    let mut any_container = false;
    for result in lowered {
        match result {
            Ok((path, text, used_container)) => {
                any_container |= used_container;
                files.insert(path, text);
            }
            Err(error) => errors.push(error),
        }
    }

    if any_container {
        files.insert(
            MODULE_CONTAINERS_FILE.to_string(),
            print_compilation_unit(&module_containers_unit(), options.indent),
        );
    }

    debug!(files = files.len(), errors = errors.len(), "emit complete");
    EmitResult { files, errors }
}

fn emit_module(
    module: &IrModule,
    options: Arc<EmitterOptions>,
) -> Result<(String, String, bool), EmitError> {
    let indent = options.indent;
    let root_namespace = options.root_namespace.clone();
    let mut ctx = EmitterContext::new(options);
    ctx.is_static = module.is_static_container;

    let lowered = declarations::lower_module(&mut ctx, module)?;

    let mut usings = lowered.usings;
    usings.sort();
    usings.dedup();

    let namespace = if module.namespace.is_empty() {
        root_namespace
    } else {
        module.namespace.clone()
    };

    let unit = CsCompilationUnit {
        header: Some(file_header(&module.file_path)),
        usings,
        namespace: CsNamespace {
            name: namespace,
            members: lowered.members,
        },
    };
    Ok((
        output_path(&module.file_path),
        print_compilation_unit(&unit, indent),
        lowered.used_module_container,
    ))
}

fn file_header(source_path: &str) -> String {
    format!(
        "// Generated from {source_path}\n// Generated at {GENERATED_AT}\n// WARNING: do not edit by hand"
    )
}

/// Derive the relative output path: extension swapped to `.cs`,
/// directories preserved.
pub fn output_path(file_path: &str) -> String {
    let trimmed = file_path
        .strip_suffix(".tsx")
        .or_else(|| file_path.strip_suffix(".ts"))
        .unwrap_or(file_path);
    format!("{trimmed}.cs")
}

/// The compilation unit defining the `ModuleContainer` marker.
fn module_containers_unit() -> CsCompilationUnit {
    let mut attribute = CsTypeDeclaration::new(
        CsTypeKind::Class,
        Modifiers::PUBLIC | Modifiers::SEALED,
        "ModuleContainerAttribute",
    );
    attribute
        .attributes
        .push("global::System.AttributeUsage(global::System.AttributeTargets.Class)".to_string());
    attribute.base_types.push(CsType::named("global::System.Attribute"));

    CsCompilationUnit {
        header: Some(file_header("__tsonic_module_containers")),
        usings: Vec::new(),
        namespace: CsNamespace {
            name: "Tsonic.Internal".to_string(),
            members: vec![CsNamespaceMember::Type(attribute)],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(output_path("src/math.ts"), "src/math.cs");
        assert_eq!(output_path("src/view.tsx"), "src/view.cs");
        assert_eq!(output_path("weird/noext"), "weird/noext.cs");
    }
}
