use miette::Diagnostic;
use thiserror::Error;

/// The result type specialized to matcher errors.
pub type MatchResult<T> = Result<T, Box<MatchError>>;

/// Internal contract violations found while checking a unification result.
///
/// None of these can happen for well-formed IR0; they point at a bug in the
/// strategy or in the code that built the templates. Each variant carries a
/// rendering of the call that produced it: the equations, the renaming tables and
/// the bindings.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Deduced {var} = {value}, but {var} has kind {var_kind} and {value} has kind {value_kind}")]
    #[diagnostic(code("M-001"))]
    KindMismatch {
        var: String,
        value: String,
        var_kind: String,
        value_kind: String,
        #[help]
        context: String,
    },
    #[error("The pattern variable {escaped} occurs in the value deduced for {var}")]
    #[diagnostic(code("M-002"))]
    EscapedPatternVar {
        var: String,
        escaped: String,
        #[help]
        context: String,
    },
    #[error("The variable {name} is spelled in more than one way")]
    #[diagnostic(code("M-003"))]
    InconsistentLiteral {
        name: String,
        #[help]
        context: String,
    },
    #[error("Cannot translate the binding of {var} back to an expression")]
    #[diagnostic(code("M-004"))]
    UnrepresentableBinding {
        var: String,
        #[help]
        context: String,
    },
}
