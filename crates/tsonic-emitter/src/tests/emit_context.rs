use super::*;

fn ctx() -> EmitterContext {
    EmitterContext::new(Arc::new(EmitterOptions::new("App")))
}

#[test]
fn declare_local_escapes_keywords() {
    let mut ctx = ctx();
    assert_eq!(ctx.declare_local("class"), "@class");
    assert_eq!(ctx.lookup_local("class"), Some("@class"));
}

#[test]
fn declare_local_avoids_collisions() {
    let mut ctx = ctx();
    assert_eq!(ctx.declare_local("x"), "x");
    // A shadowing declaration in the same scope gets a fresh name.
    assert_eq!(ctx.reserve_name("x"), "x_1");
    assert_eq!(ctx.reserve_name("x"), "x_2");
}

#[test]
fn temp_ids_are_monotonic_and_prefixed() {
    let mut ctx = ctx();
    assert_eq!(ctx.alloc_temp("arr"), "__arr0");
    assert_eq!(ctx.alloc_temp("obj"), "__obj1");
    assert_eq!(ctx.alloc_temp("arr"), "__arr2");
}

#[test]
fn suffixed_temps_are_one_based() {
    let mut ctx = ctx();
    assert_eq!(
        ctx.alloc_suffixed_temp("__tsonic_truthy_num"),
        "__tsonic_truthy_num_1"
    );
    assert_eq!(
        ctx.alloc_suffixed_temp("__tsonic_truthy_num"),
        "__tsonic_truthy_num_2"
    );
}

#[test]
fn scope_restores_names_but_keeps_temp_counter() {
    let mut ctx = ctx();
    ctx.declare_local("outer");
    let snap = ctx.enter_scope();
    ctx.declare_local("inner");
    ctx.alloc_temp("arr");
    assert!(ctx.lookup_local("inner").is_some());
    ctx.leave_scope(snap);
    assert!(ctx.lookup_local("inner").is_none());
    assert!(ctx.lookup_local("outer").is_some());
    // Counter survives: the next temp does not reuse the id.
    assert_eq!(ctx.alloc_temp("arr"), "__arr1");
}

#[test]
fn reset_declaration_state_resets_counter() {
    let mut ctx = ctx();
    ctx.alloc_temp("arr");
    ctx.reset_declaration_state();
    assert_eq!(ctx.alloc_temp("arr"), "__arr0");
}

#[test]
fn type_parameters_do_not_leak_across_siblings() {
    let mut ctx = ctx();
    let snap = ctx.enter_scope();
    ctx.declare_type_parameter("T");
    assert!(ctx.is_type_parameter("T"));
    ctx.leave_scope(snap);
    assert!(!ctx.is_type_parameter("T"));

    let snap = ctx.enter_scope();
    // Sibling declaration can reuse the name without a suffix.
    assert_eq!(ctx.declare_type_parameter("T"), "T");
    ctx.leave_scope(snap);
}

#[test]
fn nested_type_parameters_are_renamed() {
    let mut ctx = ctx();
    ctx.declare_type_parameter("T");
    let snap = ctx.enter_scope();
    assert_eq!(ctx.declare_type_parameter("T"), "T1");
    ctx.leave_scope(snap);
}

#[test]
fn anonymous_module_types_are_visible() {
    use tsonic_ir::{IrType, LocalTypeInfo};

    let mut options = EmitterOptions::new("App");
    let mut local_types = FxHashMap::default();
    local_types.insert(
        "__Anon1".to_string(),
        LocalTypeInfo::TypeAlias {
            type_parameters: Vec::new(),
            ty: IrType::Object { members: vec![] },
        },
    );
    let mut map = FxHashMap::default();
    map.insert(
        ANONYMOUS_TYPES_MODULE.to_string(),
        ModuleMapEntry {
            namespace: "App.Anon".to_string(),
            class_name: "__tsonic_anonymous_types".to_string(),
            file_path: "__tsonic_anonymous_types.ts".to_string(),
            has_type_collision: false,
            local_types,
        },
    );
    options.module_map = Some(map);

    let ctx = EmitterContext::new(Arc::new(options));
    assert!(ctx.lookup_local_type("__Anon1").is_some());
    assert!(ctx.lookup_local_type("Missing").is_none());
}

#[test]
fn options_deserialize_with_defaults() {
    let options: EmitterOptions =
        serde_json::from_str(r#"{"rootNamespace": "App"}"#).expect("options json");
    assert_eq!(options.root_namespace, "App");
    assert_eq!(options.indent, 4);
    assert!(options.module_map.is_none());
}
