use miette::Diagnostic;
use thiserror::Error;

/// Why [crate::unify] gave up.
///
/// The distinction between the two variants is what the callers care about: a
/// [UnifyError::Failed] result means the equations can never hold, whereas a
/// [UnifyError::Ambiguous] result only means that syntactic reasoning was not enough
/// to decide.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    #[error("Unification failed: {reason}")]
    #[diagnostic(code("U-001"))]
    Failed { reason: Reason },
    #[error("Unification is ambiguous: {reason}")]
    #[diagnostic(code("U-002"))]
    Ambiguous {
        reason: Reason,
        /// Set if the ambiguity stems from an earlier comparison that could not be
        /// decided syntactically.
        #[help]
        expanded: Option<String>,
    },
}

impl UnifyError {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, UnifyError::Ambiguous { .. })
    }

    pub fn reason(&self) -> &Reason {
        match self {
            UnifyError::Failed { reason } | UnifyError::Ambiguous { reason, .. } => reason,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("the terms {lhs} and {rhs} are different")]
    DifferentTerms { lhs: String, rhs: String },
    #[error("the sequences {lhs} and {rhs} have different lengths")]
    LengthMismatch { lhs: String, rhs: String },
    #[error("{var} occurs in {term}")]
    OccursCheck { var: String, term: String },
    #[error("cannot align the pack expansions in {lhs} and {rhs}")]
    UnanchoredPacks { lhs: String, rhs: String },
    #[error("{var} is used both as a single term and as a pack")]
    MixedBinding { var: String },
}

/// Why [crate::canonicalize] could not bring a solution into canonical form.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    #[error("Deduced {var} = {value}, but {var} may not be bound")]
    #[diagnostic(code("C-001"))]
    LhsForbidden { var: String, value: String },
    #[error("The variables {vars} are all equal, but more than one of them may not be bound")]
    #[diagnostic(code("C-002"))]
    TooManyForbidden { vars: String },
    #[error("The variables {vars} depend on each other through a compound term")]
    #[diagnostic(code("C-003"))]
    CycleThroughTerm { vars: String },
    #[error("The variables {vars} are all equal, but only some of them are packs")]
    #[diagnostic(code("C-004"))]
    MixedCycle { vars: String },
    #[error("Could not substitute into the value of {var}")]
    #[diagnostic(code("C-005"))]
    Substitution {
        var: String,
        #[source]
        cause: SubstError,
    },
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SubstError {
    #[error("The pack {var} is used outside of a pack expansion")]
    #[diagnostic(code("S-001"))]
    BarePackVariable { var: String },
    #[error("The packs {vars} are expanded together, but have different lengths")]
    #[diagnostic(code("S-002"))]
    PackLengthMismatch { vars: String },
    #[error("Element {index} of the packs {vars} mixes expansions and single terms")]
    #[diagnostic(code("S-003"))]
    MixedPackElements { vars: String, index: usize },
    #[error("Expanding {term} into {len} terms leaves the packs {vars} unexpanded")]
    #[diagnostic(code("S-004"))]
    UnexpandedPack { term: String, len: usize, vars: String },
    #[error("Cannot rebuild {term} with {actual} arguments")]
    #[diagnostic(code("S-005"))]
    ArityMismatch { term: String, actual: usize },
    #[error("Substituting into {term} gives {len} terms instead of one")]
    #[diagnostic(code("S-006"))]
    NotSingleTerm { term: String, len: usize },
}

pub(crate) fn comma_separated<I: IntoIterator<Item = String>>(iter: I) -> String {
    let vec: Vec<_> = iter.into_iter().collect();
    vec.join(", ")
}
