//! Whole-module emission: static containers, headers, usings,
//! determinism, the marker unit, and the errors channel.

use tsonic_emitter::{emit_program, EmitterOptions};
use tsonic_ir::{
    IrDeclaration, IrExpr, IrFunction, IrImport, IrImportSpecifier, IrModule, IrParameter,
    IrPattern, IrStatement, IrType,
};

fn options() -> EmitterOptions {
    EmitterOptions::new("App")
}

/// `math.ts`: `export const PI = 3.14159; export function add(a, b) {
/// return a + b; }` as a static container.
fn math_module() -> IrModule {
    IrModule {
        file_path: "src/math.ts".to_string(),
        namespace: "App.src".to_string(),
        class_name: "math".to_string(),
        is_static_container: true,
        imports: vec![],
        body: vec![
            IrStatement::const_decl(IrPattern::ident("PI"), IrExpr::number(3.14159)),
            IrStatement::Declaration {
                declaration: IrDeclaration::Function(IrFunction {
                    name: "add".to_string(),
                    type_parameters: vec![],
                    parameters: vec![
                        IrParameter::named("a", IrType::Number),
                        IrParameter::named("b", IrType::Number),
                    ],
                    return_type: Some(IrType::Number),
                    body: vec![IrStatement::ret(Some(IrExpr::binary(
                        IrExpr::ident("a"),
                        tsonic_ir::IrBinaryOp::Add,
                        IrExpr::ident("b"),
                    )))],
                    is_async: false,
                    is_generator: false,
                    exported: true,
                }),
            },
        ],
        exports: vec!["PI".to_string(), "add".to_string()],
    }
}

#[test]
fn static_container_emits_fields_ctor_and_methods() {
    let result = emit_program(&[math_module()], &options());
    assert!(result.ok(), "errors: {:?}", result.errors);
    let text = result.files.get("src/math.cs").expect("module file");

    assert!(text.contains("[global::Tsonic.Internal.ModuleContainerAttribute]"));
    assert!(text.contains("public static class math"));
    assert!(text.contains("public static readonly double PI;"));
    assert!(text.contains("static math()"));
    assert!(text.contains("PI = 3.14159;"));
    assert!(text.contains("public static double add(double a, double b)"));
    assert!(text.contains("return a + b;"));
    assert!(text.contains("namespace App.src"));
}

#[test]
fn files_start_with_the_fixed_header() {
    let result = emit_program(&[math_module()], &options());
    let text = result.files.get("src/math.cs").expect("module file");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("// Generated from src/math.ts"));
    assert_eq!(lines.next(), Some("// Generated at 0001-01-01T00:00:00Z"));
    assert_eq!(lines.next(), Some("// WARNING: do not edit by hand"));
    assert_eq!(lines.next(), Some(""));
}

#[test]
fn marker_unit_is_emitted_once_for_container_modules() {
    let result = emit_program(&[math_module()], &options());
    let marker = result
        .files
        .get("__tsonic_module_containers.g.cs")
        .expect("marker unit");
    assert!(marker.contains("namespace Tsonic.Internal"));
    assert!(marker.contains("public sealed class ModuleContainerAttribute : global::System.Attribute"));
    assert!(marker.contains("[global::System.AttributeUsage(global::System.AttributeTargets.Class)]"));
}

#[test]
fn marker_unit_is_absent_without_containers() {
    let module = IrModule {
        file_path: "src/types.ts".to_string(),
        namespace: "App.src".to_string(),
        class_name: "types".to_string(),
        is_static_container: false,
        imports: vec![],
        body: vec![],
        exports: vec![],
    };
    let result = emit_program(&[module], &options());
    assert!(result.ok());
    assert!(!result.files.contains_key("__tsonic_module_containers.g.cs"));
}

#[test]
fn usings_are_sorted_and_deduplicated() {
    let import = |source: &str, namespace: &str| IrImport {
        source: source.to_string(),
        is_local: true,
        is_clr: false,
        resolved_namespace: Some(namespace.to_string()),
        resolved_class_name: None,
        specifiers: vec![IrImportSpecifier {
            name: "T".to_string(),
            alias: None,
            clr_value: None,
        }],
    };
    let mut module = math_module();
    module.imports = vec![
        import("./zeta", "App.zeta"),
        import("./alpha", "App.alpha"),
        import("./zeta2", "App.zeta"),
    ];
    let result = emit_program(&[module], &options());
    let text = result.files.get("src/math.cs").expect("module file");
    let alpha = text.find("using App.alpha;").expect("alpha using");
    let zeta = text.find("using App.zeta;").expect("zeta using");
    assert!(alpha < zeta);
    assert_eq!(text.matches("using App.zeta;").count(), 1);
}

#[test]
fn clr_value_imports_bind_through_the_declaring_type() {
    let mut module = math_module();
    module.imports = vec![IrImport {
        source: "node:console".to_string(),
        is_local: false,
        is_clr: true,
        resolved_namespace: Some("System".to_string()),
        resolved_class_name: None,
        specifiers: vec![IrImportSpecifier {
            name: "log".to_string(),
            alias: None,
            clr_value: Some(tsonic_ir::ClrImportValue {
                declaring_clr_type: "System.Console".to_string(),
                declaring_assembly_name: "System.Console".to_string(),
                member_name: "WriteLine".to_string(),
            }),
        }],
    }];
    module.body.push(IrStatement::expr(IrExpr::call(
        IrExpr::ident("log"),
        vec![IrExpr::string("hi")],
    )));
    let result = emit_program(&[module], &options());
    assert!(result.ok(), "errors: {:?}", result.errors);
    let text = result.files.get("src/math.cs").expect("module file");
    // Call sites target DeclaringType.member, not the namespace.
    assert!(text.contains("global::System.Console.WriteLine(\"hi\");"));
}

#[test]
fn module_value_imports_qualify_through_the_container() {
    let mut module = math_module();
    module.imports = vec![IrImport {
        source: "./util".to_string(),
        is_local: true,
        is_clr: false,
        resolved_namespace: Some("App.src".to_string()),
        resolved_class_name: Some("util".to_string()),
        specifiers: vec![IrImportSpecifier {
            name: "clamp".to_string(),
            alias: None,
            clr_value: None,
        }],
    }];
    module.body.push(IrStatement::expr(IrExpr::call(
        IrExpr::ident("clamp"),
        vec![IrExpr::number(1.0)],
    )));
    let result = emit_program(&[module], &options());
    assert!(result.ok(), "errors: {:?}", result.errors);
    let text = result.files.get("src/math.cs").expect("module file");
    assert!(text.contains("global::App.src.util.clamp(1.0);"));
}

#[test]
fn emission_is_byte_deterministic() {
    let modules = [math_module()];
    let first = emit_program(&modules, &options());
    let second = emit_program(&modules, &options());
    assert_eq!(first.files, second.files);
}

#[test]
fn per_module_errors_do_not_abort_siblings() {
    let bad = IrModule {
        file_path: "src/bad.ts".to_string(),
        namespace: "App.src".to_string(),
        class_name: "bad".to_string(),
        is_static_container: false,
        // A loose statement in a non-container module is a frontend
        // contract violation.
        body: vec![IrStatement::expr(IrExpr::number(1.0))],
        imports: vec![],
        exports: vec![],
    };
    let result = emit_program(&[bad, math_module()], &options());
    assert!(!result.ok());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].module, "src/bad.ts");
    assert!(result.files.contains_key("src/math.cs"));
    assert!(!result.files.contains_key("src/bad.cs"));
}

#[test]
fn output_paths_follow_the_source_layout() {
    let result = emit_program(&[math_module()], &options());
    let keys: Vec<&String> = result.files.keys().collect();
    assert_eq!(keys[0], "src/math.cs");
}

#[test]
fn options_round_trip_from_json() {
    let options: EmitterOptions = serde_json::from_str(
        r#"{
            "rootNamespace": "App",
            "indent": 2,
            "publicLocalTypes": ["Shared"]
        }"#,
    )
    .expect("options json");
    let result = emit_program(&[math_module()], &options);
    assert!(result.ok());
    let text = result.files.get("src/math.cs").expect("module file");
    // Two-space indentation inside the namespace block.
    assert!(text.contains("\n  [global::Tsonic.Internal.ModuleContainerAttribute]"));
}
