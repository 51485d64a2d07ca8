//! Macro-wrapped identifier and type-name formatting (§4.6), shared by
//! every phase of the emitter.
//!
//! Every C++ identifier this crate writes - class names, field/parameter/
//! local names, type names - goes through one of these functions so the
//! macro wrapping is applied exactly once, in exactly one place, instead of
//! being hand-rolled at each call site.

use ucc_sem::types::{ClassArena, Primitive, Type};
use ucc_util::DefId;

use crate::error::GenError;

/// Wraps a source identifier (variable, parameter, field, method, or free
/// function name) in `UC_VAR`, per §6's fixed macro vocabulary.
pub fn var(name: impl std::fmt::Display) -> String {
    format!("UC_VAR({name})")
}

/// The bare uC spelling of a primitive, for wrapping in `UC_PRIMITIVE`.
pub fn primitive_name(p: Primitive) -> &'static str {
    match p {
        Primitive::Int => "int",
        Primitive::Long => "long",
        Primitive::Float => "float",
        Primitive::Boolean => "boolean",
        Primitive::String => "string",
        Primitive::Void => "void",
    }
}

/// The macro-wrapped C++ type name for a class's reference/handle type
/// (GLOSSARY "Reference type"). Also used as the class's own C++ identifier
/// in the forward declaration, the class body, and both implicit
/// constructors, so the same macro invocation always expands to the same
/// token sequence everywhere it's spliced in.
pub fn reference_name(arena: &ClassArena, id: DefId) -> String {
    format!("UC_REFERENCE({})", arena[id].name)
}

/// Renders a semantic type as macro-wrapped C++ type-name text.
///
/// `Type::Null` and `Type::Error` never reach the backend on a checked
/// program free of diagnostics (§7: "backend... should not occur on a
/// well-typed AST"), so hitting either here is an internal invariant
/// violation rather than a user-facing error.
pub fn type_name(ty: &Type, arena: &ClassArena) -> Result<String, GenError> {
    match ty {
        Type::Primitive(p) => Ok(format!("UC_PRIMITIVE({})", primitive_name(*p))),
        Type::Class(id) => Ok(reference_name(arena, *id)),
        Type::Array(elem) => Ok(format!("UC_ARRAY({})", type_name(elem, arena)?)),
        Type::Function(params, ret) => {
            // A first-class function value (§3) needs one concrete C++ type
            // per distinct signature; `UC_CONCAT` folds the return type and
            // every parameter type into the single synthetic name
            // `UC_FUNCTION` wraps (documented in DESIGN.md).
            let mut folded = type_name(ret, arena)?;
            for param in params {
                folded = format!("UC_CONCAT({folded}, {})", type_name(param, arena)?);
            }
            Ok(format!("UC_FUNCTION({folded})"))
        },
        Type::Null => Err(GenError::InternalInvariant("a bare `null` type reached the backend".to_string())),
        Type::Error => Err(GenError::InternalInvariant("an unresolved `Error` type reached the backend".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_util::IndexVec;

    fn empty_arena() -> ClassArena {
        IndexVec::new()
    }

    #[test]
    fn primitive_wraps_in_uc_primitive() {
        let arena = empty_arena();
        assert_eq!(type_name(&Type::Primitive(Primitive::Int), &arena).unwrap(), "UC_PRIMITIVE(int)");
    }

    #[test]
    fn array_nests_uc_array_around_the_element() {
        let arena = empty_arena();
        let ty = Type::Array(Box::new(Type::Primitive(Primitive::String)));
        assert_eq!(type_name(&ty, &arena).unwrap(), "UC_ARRAY(UC_PRIMITIVE(string))");
    }

    #[test]
    fn null_type_is_an_internal_invariant_violation() {
        let arena = empty_arena();
        assert!(type_name(&Type::Null, &arena).is_err());
    }
}
