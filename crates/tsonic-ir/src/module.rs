//! IR modules and imports.

use serde::{Deserialize, Serialize};

use crate::stmt::IrStatement;

/// One source module as delivered by the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrModule {
    /// Relative path of the originating TypeScript file.
    pub file_path: String,
    /// Target C# namespace (already joined with the root namespace by the
    /// frontend's module resolver).
    pub namespace: String,
    /// Class name used when the module is a static container.
    pub class_name: String,
    /// Top-level values/functions become static members of `class_name`.
    #[serde(default)]
    pub is_static_container: bool,
    #[serde(default)]
    pub imports: Vec<IrImport>,
    pub body: Vec<IrStatement>,
    #[serde(default)]
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrImport {
    pub source: String,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub is_clr: bool,
    #[serde(default)]
    pub resolved_namespace: Option<String>,
    /// Class name of the source module when it is a static container;
    /// value imports bind through it.
    #[serde(default)]
    pub resolved_class_name: Option<String>,
    #[serde(default)]
    pub specifiers: Vec<IrImportSpecifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrImportSpecifier {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Resolution for flattened CLR value imports. Call sites must target
    /// `declaringClrType.memberName`, never the namespace directly.
    #[serde(default)]
    pub clr_value: Option<ClrImportValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClrImportValue {
    pub declaring_clr_type: String,
    pub declaring_assembly_name: String,
    pub member_name: String,
}

impl IrImportSpecifier {
    /// The name this specifier binds in the importing module.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_deserializes_from_frontend_json() {
        let json = r#"{
            "filePath": "src/math.ts",
            "namespace": "App.src",
            "className": "math",
            "isStaticContainer": true,
            "imports": [],
            "body": [],
            "exports": ["PI", "add"]
        }"#;
        let module: IrModule = serde_json::from_str(json).expect("module json");
        assert_eq!(module.class_name, "math");
        assert!(module.is_static_container);
        assert_eq!(module.exports, vec!["PI", "add"]);
    }

    #[test]
    fn specifier_local_name_prefers_alias() {
        let spec = IrImportSpecifier {
            name: "add".to_string(),
            alias: Some("plus".to_string()),
            clr_value: None,
        };
        assert_eq!(spec.local_name(), "plus");
    }
}
