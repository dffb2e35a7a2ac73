//! Parser configuration.

/// Toggles for the parser's contextual validation rules.
///
/// Every field defaults to `true` (strict parsing). Turning a field off makes
/// the parser accept the corresponding construct instead of erroring, which
/// is useful when parsing script fragments rather than whole files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// The first statement of the file must be `ScriptName`.
    pub scriptname_missing: bool,
    /// The `ScriptName` identifier must match the supplied filename
    /// (ASCII-case-insensitively, ignoring any extension).
    pub scriptname_mismatch: bool,
    /// `Return` outside a function or event is an error.
    pub return_outside: bool,
    /// `If` outside a function or event is an error.
    pub if_outside: bool,
    /// `While` outside a function or event is an error.
    pub while_outside: bool,
    /// Binary/logical expressions outside a function or event are errors.
    pub binary_outside: bool,
    /// Call expressions outside a function or event are errors.
    pub call_outside: bool,
    /// Cast expressions outside a function or event are errors.
    pub cast_outside: bool,
    /// `New` expressions outside a function or event are errors.
    pub new_outside: bool,
}

impl ParseOptions {
    /// All validations enabled. Same as `ParseOptions::default()`.
    pub fn strict() -> Self {
        Self::default()
    }

    /// All validations disabled. Accepts loose fragments such as a bare
    /// expression without an enclosing script.
    pub fn permissive() -> Self {
        Self {
            scriptname_missing: false,
            scriptname_mismatch: false,
            return_outside: false,
            if_outside: false,
            while_outside: false,
            binary_outside: false,
            call_outside: false,
            cast_outside: false,
            new_outside: false,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scriptname_missing: true,
            scriptname_mismatch: true,
            return_outside: true,
            if_outside: true,
            while_outside: true,
            binary_outside: true,
            call_outside: true,
            cast_outside: true,
            new_outside: true,
        }
    }
}
