//! Type rendering.
//!
//! Predefined type keywords are emitted directly and never `@`-escaped;
//! named types are escaped segment-by-segment with `global::` preserved.

use super::Printer;
use crate::cs_ast::CsType;
use crate::naming::{escape_identifier, escape_qualified_name};

impl Printer {
    pub(crate) fn emit_type(&mut self, ty: &CsType) {
        match ty {
            CsType::Predefined(predefined) => {
                self.writer.write(predefined.keyword());
            }
            CsType::Identifier {
                name,
                type_arguments,
            } => {
                self.writer.write(&escape_qualified_name(name));
                if !type_arguments.is_empty() {
                    self.writer.write("<");
                    for (i, argument) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            self.writer.write(", ");
                        }
                        self.emit_type(argument);
                    }
                    self.writer.write(">");
                }
            }
            CsType::Nullable(inner) => {
                self.emit_type(inner);
                self.writer.write("?");
            }
            CsType::Array { element, rank } => {
                self.emit_type(element);
                self.writer.write("[");
                for _ in 1..*rank {
                    self.writer.write(",");
                }
                self.writer.write("]");
            }
            CsType::Pointer(inner) => {
                self.emit_type(inner);
                self.writer.write("*");
            }
            CsType::Tuple { elements } => {
                self.writer.write("(");
                for (i, (name, element)) in elements.iter().enumerate() {
                    if i > 0 {
                        self.writer.write(", ");
                    }
                    self.emit_type(element);
                    if let Some(name) = name {
                        self.writer.write_space();
                        self.writer.write(&escape_identifier(name));
                    }
                }
                self.writer.write(")");
            }
            CsType::Var => self.writer.write("var"),
            CsType::Raw(text) => self.writer.write(text),
        }
    }
}
