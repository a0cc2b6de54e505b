//! C# type syntax.

/// The C# predefined type keywords the backend emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CsPredefinedType {
    Bool,
    Byte,
    SByte,
    Char,
    Decimal,
    Double,
    Float,
    Int,
    UInt,
    Long,
    ULong,
    Short,
    UShort,
    NInt,
    NUInt,
    Object,
    String,
    Void,
}

impl CsPredefinedType {
    pub fn keyword(self) -> &'static str {
        match self {
            CsPredefinedType::Bool => "bool",
            CsPredefinedType::Byte => "byte",
            CsPredefinedType::SByte => "sbyte",
            CsPredefinedType::Char => "char",
            CsPredefinedType::Decimal => "decimal",
            CsPredefinedType::Double => "double",
            CsPredefinedType::Float => "float",
            CsPredefinedType::Int => "int",
            CsPredefinedType::UInt => "uint",
            CsPredefinedType::Long => "long",
            CsPredefinedType::ULong => "ulong",
            CsPredefinedType::Short => "short",
            CsPredefinedType::UShort => "ushort",
            CsPredefinedType::NInt => "nint",
            CsPredefinedType::NUInt => "nuint",
            CsPredefinedType::Object => "object",
            CsPredefinedType::String => "string",
            CsPredefinedType::Void => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CsType {
    Predefined(CsPredefinedType),
    /// A (possibly qualified) named type with optional type arguments.
    /// The name is escaped segment-by-segment at print time.
    Identifier {
        name: String,
        type_arguments: Vec<CsType>,
    },
    Nullable(Box<CsType>),
    Array {
        element: Box<CsType>,
        rank: usize,
    },
    Pointer(Box<CsType>),
    Tuple {
        elements: Vec<(Option<String>, CsType)>,
    },
    Var,
    /// Opaque escape hatch. Only constructed where lowering documents a
    /// reason; golden tests assert its absence for the supported subset.
    Raw(String),
}

impl CsType {
    pub fn bool() -> Self {
        CsType::Predefined(CsPredefinedType::Bool)
    }

    pub fn double() -> Self {
        CsType::Predefined(CsPredefinedType::Double)
    }

    pub fn int() -> Self {
        CsType::Predefined(CsPredefinedType::Int)
    }

    pub fn string() -> Self {
        CsType::Predefined(CsPredefinedType::String)
    }

    pub fn char() -> Self {
        CsType::Predefined(CsPredefinedType::Char)
    }

    pub fn void() -> Self {
        CsType::Predefined(CsPredefinedType::Void)
    }

    pub fn object() -> Self {
        CsType::Predefined(CsPredefinedType::Object)
    }

    pub fn named(name: impl Into<String>) -> Self {
        CsType::Identifier {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, type_arguments: Vec<CsType>) -> Self {
        CsType::Identifier {
            name: name.into(),
            type_arguments,
        }
    }

    pub fn nullable(inner: CsType) -> Self {
        match inner {
            CsType::Nullable(_) => inner,
            other => CsType::Nullable(Box::new(other)),
        }
    }

    pub fn array(element: CsType) -> Self {
        CsType::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Strip one level of nullability.
    pub fn without_nullable(&self) -> &CsType {
        match self {
            CsType::Nullable(inner) => inner,
            other => other,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, CsType::Predefined(CsPredefinedType::Void))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, CsType::Var)
    }

    /// Whether `default` of this type is a meaningful null (reference or
    /// nullable); value types get `default` instead of `null` text.
    pub fn is_reference_like(&self) -> bool {
        match self {
            CsType::Nullable(_) => true,
            CsType::Array { .. } => true,
            CsType::Predefined(p) => {
                matches!(p, CsPredefinedType::Object | CsPredefinedType::String)
            }
            CsType::Identifier { .. } => true,
            _ => false,
        }
    }
}
