//! Identifier escaping and collision-free local-name allocation.
//!
//! Every identifier segment that matches a C# reserved keyword is emitted
//! with an `@` prefix. Predefined type keywords (`bool`, `int`, ...) are
//! exempt in type position only; the printer emits those directly from
//! `CsPredefinedType` without passing through here.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// The C# reserved keywords (contextual keywords like `var`, `init`,
/// `record` are legal identifiers and deliberately absent).
static RESERVED: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
        "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
        "virtual", "void", "volatile", "while",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

/// Escape a single identifier segment for emission.
pub fn escape_identifier(name: &str) -> String {
    if is_reserved(name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Escape a qualified name segment-by-segment: a leading `global::`
/// prefix is preserved verbatim and the remainder splits on `.`.
pub fn escape_qualified_name(name: &str) -> String {
    let (prefix, rest) = match name.strip_prefix("global::") {
        Some(rest) => ("global::", rest),
        None => ("", name),
    };
    let escaped: Vec<String> = rest.split('.').map(|seg| escape_identifier(seg)).collect();
    format!("{prefix}{}", escaped.join("."))
}

#[cfg(test)]
#[path = "tests/naming.rs"]
mod tests;
