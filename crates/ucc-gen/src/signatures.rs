//! Signature-only emission (§4.6 phase 2): method and free-function headers
//! without bodies, so phase 2 output type-checks as a forward-declared API
//! surface even though nothing has been implemented yet.

use ucc_sem::hir::Function;
use ucc_sem::types::{ClassArena, MethodSig};

use crate::error::GenError;
use crate::names::{type_name, var};

/// `ReturnType UC_VAR(name)(ParamType UC_VAR(param), ...)`, with no trailing
/// `;` or body - the caller decides how to close the declaration (phase 1/2
/// emit `;`, phase 3 emits `{ ... }`).
pub fn emit_method_signature(method: &MethodSig, arena: &ClassArena) -> Result<String, GenError> {
    let ret = type_name(&method.ret, arena)?;
    let params = emit_params(&method.params, &method.param_names, arena)?;
    Ok(format!("{ret} {}({params})", var(method.name)))
}

pub fn emit_free_function_signature(function: &Function, arena: &ClassArena) -> Result<String, GenError> {
    let ret = type_name(&function.ret, arena)?;
    let param_types: Vec<_> = function.params.iter().map(|(_, ty)| ty.clone()).collect();
    let param_names: Vec<_> = function.params.iter().map(|(name, _)| *name).collect();
    let params = emit_params(&param_types, &param_names, arena)?;
    Ok(format!("{ret} {}({params})", var(function.name)))
}

fn emit_params(types: &[ucc_sem::types::Type], names: &[ucc_util::Symbol], arena: &ClassArena) -> Result<String, GenError> {
    let mut parts = Vec::with_capacity(types.len());
    for (ty, name) in types.iter().zip(names.iter()) {
        parts.push(format!("{} {}", type_name(ty, arena)?, var(*name)));
    }
    Ok(parts.join(", "))
}
