//! Diagnostic codes, grouped by the error kinds of §7: lexical, syntactic,
//! symbol, type, and backend.

/// A stable `E####` identifier for a diagnostic, so tooling (and this
/// crate's own tests) can refer to "the typedef-cycle error" without
/// matching on message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode(pub u32);

impl DiagnosticCode {
    pub fn as_str(&self) -> String {
        format!("E{:04}", self.0)
    }

    // Lexical (§4.1, §7)
    pub const LEX_UNEXPECTED_CHAR: Self = Self(1001);
    pub const LEX_UNTERMINATED_STRING: Self = Self(1002);
    pub const LEX_UNTERMINATED_COMMENT: Self = Self(1003);

    // Syntactic (§4.2, §7)
    pub const PARSE_UNEXPECTED_TOKEN: Self = Self(2001);
    pub const PARSE_UNEXPECTED_EOF: Self = Self(2002);

    // Symbol (§4.3, §7)
    pub const SYM_DUPLICATE_TOP_LEVEL: Self = Self(3001);
    pub const SYM_DUPLICATE_FIELD: Self = Self(3002);
    pub const SYM_UNKNOWN_SUPERCLASS: Self = Self(3003);
    pub const SYM_INHERITANCE_CYCLE: Self = Self(3004);

    // Type (§4.4, §4.5, §7)
    pub const TYPE_UNKNOWN: Self = Self(4001);
    pub const TYPE_TYPEDEF_CYCLE: Self = Self(4002);
    pub const TYPE_INCOMPATIBLE_ASSIGN: Self = Self(4003);
    pub const TYPE_BAD_OPERAND: Self = Self(4004);
    pub const TYPE_UNDEFINED_NAME: Self = Self(4005);
    pub const TYPE_NO_MATCHING_OVERLOAD: Self = Self(4006);
    pub const TYPE_AMBIGUOUS_OVERLOAD: Self = Self(4007);
    pub const TYPE_WRONG_ARG_COUNT: Self = Self(4008);
    pub const TYPE_NON_BOOLEAN_CONDITION: Self = Self(4009);
    pub const TYPE_MISSING_RETURN: Self = Self(4010);
    pub const TYPE_VOID_RETURNS_VALUE: Self = Self(4011);

    // Backend (§4.6, §7) - should never fire on a well-typed AST.
    pub const BACKEND_INTERNAL: Self = Self(5001);
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_as_four_digit_code() {
        assert_eq!(DiagnosticCode::TYPE_TYPEDEF_CYCLE.as_str(), "E4002");
    }
}
