//! `EmitterContext` - scoped state threaded through all lowering.
//!
//! The context is carried `&mut` through the recursion. Scope entry and
//! exit are explicit: [`EmitterContext::enter_scope`] snapshots the
//! subset of state that scopes out (name maps, type parameters, flags,
//! generator reservations) and [`EmitterContext::leave_scope`] restores
//! it. The temp-variable counter is deliberately outside the snapshot:
//! it grows monotonically within a top-level declaration and resets
//! between them, so no two temps in one body ever share a printed name.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use tsonic_ir::{IrType, LocalTypeInfo};

use crate::naming;

/// Key under which the frontend registers anonymous synthesized object
/// types in the module map.
pub const ANONYMOUS_TYPES_MODULE: &str = "__tsonic_anonymous_types";

/// The configuration surface. Nothing else affects output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitterOptions {
    pub root_namespace: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
    #[serde(default)]
    pub module_map: Option<FxHashMap<String, ModuleMapEntry>>,
    #[serde(default)]
    pub public_local_types: FxHashSet<String>,
}

fn default_indent() -> usize {
    4
}

impl EmitterOptions {
    pub fn new(root_namespace: impl Into<String>) -> Self {
        Self {
            root_namespace: root_namespace.into(),
            indent: 4,
            module_map: None,
            public_local_types: FxHashSet::default(),
        }
    }

    pub fn module_map_entry(&self, key: &str) -> Option<&ModuleMapEntry> {
        self.module_map.as_ref()?.get(key)
    }
}

/// External-module lookup table entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMapEntry {
    pub namespace: String,
    pub class_name: String,
    pub file_path: String,
    #[serde(default)]
    pub has_type_collision: bool,
    #[serde(default)]
    pub local_types: FxHashMap<String, LocalTypeInfo>,
}

/// How an imported name resolves at call/reference sites.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBinding {
    /// A value exported by a static-container module; references emit
    /// `global::{namespace}.{class}.{member}`.
    ModuleValue {
        namespace: String,
        class_name: String,
        member: String,
    },
    /// A flattened CLR value import; references must target the declaring
    /// type, never the resolved namespace.
    ClrValue {
        declaring_type: String,
        member: String,
    },
    /// A type import; the reference keeps its name, qualified by the
    /// source namespace.
    Type { namespace: String, name: String },
}

/// State captured on scope entry and restored on exit.
#[derive(Debug)]
pub struct ScopeSnapshot {
    local_name_map: FxHashMap<String, String>,
    used_local_names: FxHashSet<String>,
    type_parameters: FxHashSet<String>,
    type_parameter_name_map: FxHashMap<String, String>,
    type_param_constraints: FxHashMap<String, IrType>,
    int_loop_vars: FxHashSet<String>,
    is_static: bool,
    is_async: bool,
    return_type: Option<IrType>,
    generator_exchange_var: Option<String>,
    generator_iterator_fn: Option<String>,
    generator_return_value_var: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmitterContext {
    pub options: Arc<EmitterOptions>,

    /// Nesting level for printer-adjacent computations.
    pub indent_level: u32,

    /// The enclosing container is a static module container.
    pub is_static: bool,

    /// The enclosing function is async.
    pub is_async: bool,

    /// Expected return type of the enclosing function body, already
    /// unwrapped for `async`.
    pub return_type: Option<IrType>,

    /// Reserved names for the enclosing generator function.
    pub generator_exchange_var: Option<String>,
    pub generator_iterator_fn: Option<String>,
    pub generator_return_value_var: Option<String>,

    temp_var_id: u32,
    local_name_map: FxHashMap<String, String>,
    used_local_names: FxHashSet<String>,

    type_parameters: FxHashSet<String>,
    type_parameter_name_map: FxHashMap<String, String>,
    type_param_constraints: FxHashMap<String, IrType>,

    /// Emitted names of loop counters the proof pass showed integral.
    int_loop_vars: FxHashSet<String>,

    /// Module-local type table, seeded from top-level declarations in
    /// declaration order.
    local_types: IndexMap<String, LocalTypeInfo>,

    /// Non-exported type names that must still emit `public` because a
    /// public surface references them.
    public_local_types: FxHashSet<String>,

    /// Value-import bindings for the current module.
    imports: FxHashMap<String, ImportBinding>,
}

impl EmitterContext {
    pub fn new(options: Arc<EmitterOptions>) -> Self {
        let public_local_types = options.public_local_types.clone();
        Self {
            options,
            indent_level: 0,
            is_static: false,
            is_async: false,
            return_type: None,
            generator_exchange_var: None,
            generator_iterator_fn: None,
            generator_return_value_var: None,
            temp_var_id: 0,
            local_name_map: FxHashMap::default(),
            used_local_names: FxHashSet::default(),
            type_parameters: FxHashSet::default(),
            type_parameter_name_map: FxHashMap::default(),
            type_param_constraints: FxHashMap::default(),
            int_loop_vars: FxHashSet::default(),
            local_types: IndexMap::new(),
            public_local_types,
            imports: FxHashMap::default(),
        }
    }

    // =========================================================================
    // Scope management
    // =========================================================================

    /// Snapshot the state that scopes out. Callers pair this with
    /// [`Self::leave_scope`]; the temp counter intentionally survives.
    pub fn enter_scope(&mut self) -> ScopeSnapshot {
        ScopeSnapshot {
            local_name_map: self.local_name_map.clone(),
            used_local_names: self.used_local_names.clone(),
            type_parameters: self.type_parameters.clone(),
            type_parameter_name_map: self.type_parameter_name_map.clone(),
            type_param_constraints: self.type_param_constraints.clone(),
            int_loop_vars: self.int_loop_vars.clone(),
            is_static: self.is_static,
            is_async: self.is_async,
            return_type: self.return_type.clone(),
            generator_exchange_var: self.generator_exchange_var.clone(),
            generator_iterator_fn: self.generator_iterator_fn.clone(),
            generator_return_value_var: self.generator_return_value_var.clone(),
        }
    }

    pub fn leave_scope(&mut self, snapshot: ScopeSnapshot) {
        self.local_name_map = snapshot.local_name_map;
        self.used_local_names = snapshot.used_local_names;
        self.type_parameters = snapshot.type_parameters;
        self.type_parameter_name_map = snapshot.type_parameter_name_map;
        self.type_param_constraints = snapshot.type_param_constraints;
        self.int_loop_vars = snapshot.int_loop_vars;
        self.is_static = snapshot.is_static;
        self.is_async = snapshot.is_async;
        self.return_type = snapshot.return_type;
        self.generator_exchange_var = snapshot.generator_exchange_var;
        self.generator_iterator_fn = snapshot.generator_iterator_fn;
        self.generator_return_value_var = snapshot.generator_return_value_var;
        self.check_invariants();
    }

    /// Reset per-declaration state when starting a new top-level
    /// declaration.
    pub fn reset_declaration_state(&mut self) {
        self.temp_var_id = 0;
        self.local_name_map.clear();
        self.used_local_names.clear();
        self.int_loop_vars.clear();
        self.generator_exchange_var = None;
        self.generator_iterator_fn = None;
        self.generator_return_value_var = None;
    }

    // =========================================================================
    // Local-name allocation
    // =========================================================================

    /// Allocate a collision-free emitted name for an IR-level local and
    /// record the mapping.
    pub fn declare_local(&mut self, ir_name: &str) -> String {
        let emitted = self.allocate_name(ir_name);
        self.local_name_map
            .insert(ir_name.to_string(), emitted.clone());
        self.check_invariants();
        emitted
    }

    /// Reserve an emitted name without an IR-side mapping (synthetic
    /// names the lowering references directly).
    pub fn reserve_name(&mut self, name: &str) -> String {
        self.allocate_name(name)
    }

    fn allocate_name(&mut self, requested: &str) -> String {
        let base = naming::escape_identifier(requested);
        let mut candidate = base.clone();
        let mut n = 1u32;
        while self.used_local_names.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        self.used_local_names.insert(candidate.clone());
        candidate
    }

    /// The emitted name for an IR local, when one was allocated.
    pub fn lookup_local(&self, ir_name: &str) -> Option<&str> {
        self.local_name_map.get(ir_name).map(String::as_str)
    }

    /// Whether an emitted name is already taken in the current scope.
    pub fn is_name_used(&self, name: &str) -> bool {
        self.used_local_names.contains(name)
    }

    /// Allocate the next temp name with the given prefix
    /// (`__arr0`, `__obj1`, `__assign2`, ...).
    pub fn alloc_temp(&mut self, prefix: &str) -> String {
        loop {
            let id = self.temp_var_id;
            self.temp_var_id += 1;
            let candidate = format!("__{prefix}{id}");
            if !self.used_local_names.contains(&candidate) {
                self.used_local_names.insert(candidate.clone());
                return candidate;
            }
        }
    }

    /// Allocate a 1-based suffixed temp (`__tsonic_truthy_num_1`, ...).
    pub fn alloc_suffixed_temp(&mut self, prefix: &str) -> String {
        loop {
            self.temp_var_id += 1;
            let candidate = format!("{prefix}_{}", self.temp_var_id);
            if !self.used_local_names.contains(&candidate) {
                self.used_local_names.insert(candidate.clone());
                return candidate;
            }
        }
    }

    pub fn temp_var_id(&self) -> u32 {
        self.temp_var_id
    }

    // =========================================================================
    // Type parameters
    // =========================================================================

    /// Bring a declaration's type parameters into scope, allocating
    /// emitted names that cannot collide with outer parameters.
    pub fn declare_type_parameter(&mut self, ir_name: &str) -> String {
        let mut candidate = naming::escape_identifier(ir_name);
        let mut n = 1u32;
        while self.type_parameters.contains(&candidate) {
            candidate = format!("{ir_name}{n}");
            n += 1;
        }
        self.type_parameters.insert(candidate.clone());
        self.type_parameter_name_map
            .insert(ir_name.to_string(), candidate.clone());
        candidate
    }

    pub fn lookup_type_parameter(&self, ir_name: &str) -> Option<&str> {
        self.type_parameter_name_map
            .get(ir_name)
            .map(String::as_str)
    }

    pub fn is_type_parameter(&self, emitted_name: &str) -> bool {
        self.type_parameters.contains(emitted_name)
    }

    pub fn set_type_param_constraint(&mut self, name: &str, constraint: IrType) {
        self.type_param_constraints
            .insert(name.to_string(), constraint);
    }

    pub fn type_param_constraint(&self, name: &str) -> Option<&IrType> {
        self.type_param_constraints.get(name)
    }

    // =========================================================================
    // Local types and imports
    // =========================================================================

    pub fn seed_local_types(&mut self, types: IndexMap<String, LocalTypeInfo>) {
        self.local_types = types;
    }

    pub fn insert_local_type(&mut self, name: impl Into<String>, info: LocalTypeInfo) {
        self.local_types.insert(name.into(), info);
    }

    /// Resolve a local type name, consulting the module's own table first
    /// and then the synthetic anonymous-types moduleMap entry.
    pub fn lookup_local_type(&self, name: &str) -> Option<&LocalTypeInfo> {
        if let Some(info) = self.local_types.get(name) {
            return Some(info);
        }
        self.options
            .module_map_entry(ANONYMOUS_TYPES_MODULE)
            .and_then(|entry| entry.local_types.get(name))
    }

    pub fn local_types(&self) -> &IndexMap<String, LocalTypeInfo> {
        &self.local_types
    }

    pub fn is_public_local_type(&self, name: &str) -> bool {
        self.public_local_types.contains(name)
    }

    pub fn add_public_local_type(&mut self, name: impl Into<String>) {
        self.public_local_types.insert(name.into());
    }

    pub fn bind_import(&mut self, local_name: impl Into<String>, binding: ImportBinding) {
        self.imports.insert(local_name.into(), binding);
    }

    pub fn lookup_import(&self, name: &str) -> Option<&ImportBinding> {
        self.imports.get(name)
    }

    // =========================================================================
    // Int loop counters
    // =========================================================================

    pub fn mark_int_loop_var(&mut self, emitted_name: impl Into<String>) {
        self.int_loop_vars.insert(emitted_name.into());
    }

    pub fn is_int_loop_var(&self, emitted_name: &str) -> bool {
        self.int_loop_vars.contains(emitted_name)
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    fn check_invariants(&self) {
        #[cfg(debug_assertions)]
        {
            for emitted in self.local_name_map.values() {
                debug_assert!(
                    self.used_local_names.contains(emitted),
                    "local name map range must be within used names: {emitted}"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/emit_context.rs"]
mod tests;
