//! Semantic types (§3) and the class-definition arena (§9 Design Notes:
//! "shared, possibly-cyclic symbol references").
//!
//! Class types reference each other through fields, parameters, and
//! inheritance, so the graph of classes is cyclic in general (`class Foo {
//! Bar b; }` / `class Bar { Foo f; }`, the "forward reference" scenario of
//! §8). Rather than own pointers into one another, classes live in a single
//! arena (`ClassArena`, an `IndexVec<DefId, ClassDef>`) and a [`Type::Class`]
//! carries only the dense [`DefId`] handle, so the arena can be built in one
//! pass over a cyclic reference graph without unsafe code or reference
//! counting.

use ucc_util::{DefId, IndexVec, Span, Symbol};

/// The primitive types of §3 (everything in a [`Type`] that is not a class,
/// array, function, or null-literal type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Int,
    Long,
    Float,
    Boolean,
    String,
    Void,
}

/// A semantic type (§3). Two types are equal by structural identity: a
/// class type equals another iff they name the same [`DefId`]; an array of
/// `E1` equals an array of `E2` iff `E1` equals `E2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(Primitive),
    Class(DefId),
    Array(Box<Type>),
    Function(Vec<Type>, Box<Type>),
    /// The type of the `null` literal - assignable to any class or array
    /// type (§3), but not itself a class or array type.
    Null,
    /// Assigned to an expression pass C could not type - never assignable
    /// to or from without always succeeding, so one bad subexpression
    /// doesn't cascade into a wall of unrelated errors for the rest of the
    /// declaration (§4.5: "the first fatal error in a declaration aborts
    /// that declaration's checking").
    Error,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Int | Primitive::Long | Primitive::Float))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::String))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Boolean))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Type::Class(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn class_id(&self) -> Option<DefId> {
        match self {
            Type::Class(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(Primitive::Int) => write!(f, "int"),
            Type::Primitive(Primitive::Long) => write!(f, "long"),
            Type::Primitive(Primitive::Float) => write!(f, "float"),
            Type::Primitive(Primitive::Boolean) => write!(f, "boolean"),
            Type::Primitive(Primitive::String) => write!(f, "string"),
            Type::Primitive(Primitive::Void) => write!(f, "void"),
            Type::Class(id) => write!(f, "<class {}>", id.0),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Function(params, ret) => {
                write!(f, "{ret}(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            },
            Type::Null => write!(f, "null"),
            Type::Error => write!(f, "<error>"),
        }
    }
}

/// One field in a class's field table (§4.4: "declared + inherited,
/// inherited first").
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: Symbol,
    pub ty: Type,
    /// The class that declared this field - the receiver class for an
    /// inherited field, not the class whose table it appears in.
    pub owner: DefId,
    pub default: Option<ucc_par::Expr>,
    pub span: Span,
}

/// One method signature in a class's method table (§4.4), before pass C has
/// checked the body.
#[derive(Debug, Clone)]
pub struct MethodSig {
    pub name: Symbol,
    pub params: Vec<Type>,
    pub param_names: Vec<Symbol>,
    pub ret: Type,
    pub owner: DefId,
    pub body: ucc_par::Block,
    pub span: Span,
}

/// A resolved class definition (§3).
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: Symbol,
    pub superclass: Option<DefId>,
    /// Ancestors from nearest to farthest, computed once and cached (§3
    /// invariant: "the set of ancestor classes is computed once and
    /// cached").
    pub ancestors: Vec<DefId>,
    /// Declared + inherited fields, inherited first, in declaration order
    /// (§4.4).
    pub fields: Vec<FieldInfo>,
    /// Declared + inherited (non-overridden) methods. Multiple entries may
    /// share a name - that's the overload set §4.5 resolves at a call site.
    pub methods: Vec<MethodSig>,
    pub span: Span,
}

impl ClassDef {
    pub fn field(&self, name: Symbol) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn methods_named(&self, name: Symbol) -> impl Iterator<Item = &MethodSig> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Whether `other` is this class or one of its ancestors (§4.5:
    /// "two classes with a common ancestor").
    pub fn is_or_descends_from(&self, other: DefId, self_id: DefId) -> bool {
        self_id == other || self.ancestors.contains(&other)
    }
}

/// The arena owning every class definition for one compilation (§9).
pub type ClassArena = IndexVec<DefId, ClassDef>;

/// A free function's signature (§3, §4.5).
#[derive(Debug, Clone)]
pub struct FunctionSig {
    pub name: Symbol,
    pub params: Vec<Type>,
    pub param_names: Vec<Symbol>,
    pub ret: Type,
    pub body: ucc_par::Block,
    pub span: Span,
}

/// Numeric promotion for arithmetic operators (§4.5): int+int -> int, any
/// `long` present -> long, any `float` present -> float.
pub fn numeric_promotion(a: &Type, b: &Type) -> Type {
    if matches!(a, Type::Primitive(Primitive::Float)) || matches!(b, Type::Primitive(Primitive::Float)) {
        Type::Primitive(Primitive::Float)
    } else if matches!(a, Type::Primitive(Primitive::Long)) || matches!(b, Type::Primitive(Primitive::Long)) {
        Type::Primitive(Primitive::Long)
    } else {
        Type::Primitive(Primitive::Int)
    }
}

/// Assignability (§4.5, §8 invariant 2): reflexive, transitively closed
/// under null-literal and numeric widening, not symmetric in general.
pub fn is_assignable(from: &Type, to: &Type) -> bool {
    if from == to || matches!(from, Type::Error) || matches!(to, Type::Error) {
        return true;
    }
    match (from, to) {
        (Type::Null, Type::Class(_)) | (Type::Null, Type::Array(_)) => true,
        (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Long)) => true,
        (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Float)) => true,
        (Type::Primitive(Primitive::Long), Type::Primitive(Primitive::Float)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_primitives_are_equal() {
        assert_eq!(Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Int));
    }

    #[test]
    fn arrays_are_equal_iff_their_elements_are() {
        let a = Type::Array(Box::new(Type::Primitive(Primitive::Int)));
        let b = Type::Array(Box::new(Type::Primitive(Primitive::Int)));
        let c = Type::Array(Box::new(Type::Primitive(Primitive::Float)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn classes_are_equal_iff_same_def_id() {
        assert_eq!(Type::Class(DefId(0)), Type::Class(DefId(0)));
        assert_ne!(Type::Class(DefId(0)), Type::Class(DefId(1)));
    }

    #[test]
    fn int_widens_to_long_and_float() {
        assert!(is_assignable(&Type::Primitive(Primitive::Int), &Type::Primitive(Primitive::Long)));
        assert!(is_assignable(&Type::Primitive(Primitive::Int), &Type::Primitive(Primitive::Float)));
        assert!(!is_assignable(&Type::Primitive(Primitive::Long), &Type::Primitive(Primitive::Int)));
    }

    #[test]
    fn null_is_assignable_to_class_and_array_but_not_primitives() {
        assert!(is_assignable(&Type::Null, &Type::Class(DefId(0))));
        assert!(is_assignable(&Type::Null, &Type::Array(Box::new(Type::Primitive(Primitive::Int)))));
        assert!(!is_assignable(&Type::Null, &Type::Primitive(Primitive::Int)));
    }

    #[test]
    fn numeric_promotion_prefers_float_then_long_then_int() {
        let int = Type::Primitive(Primitive::Int);
        let long = Type::Primitive(Primitive::Long);
        let float = Type::Primitive(Primitive::Float);
        assert_eq!(numeric_promotion(&int, &int), int);
        assert_eq!(numeric_promotion(&int, &long), long);
        assert_eq!(numeric_promotion(&long, &float), float);
        assert_eq!(numeric_promotion(&int, &float), float);
    }

    #[test]
    fn assignability_is_not_symmetric() {
        let int = Type::Primitive(Primitive::Int);
        let float = Type::Primitive(Primitive::Float);
        assert!(is_assignable(&int, &float));
        assert!(!is_assignable(&float, &int));
    }
}
