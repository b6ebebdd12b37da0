/*!
Error types used in the library.

Syntax errors are not here: the parser reports those through its caller
supplied callback and returns no formula. The errors below concern the
solver, and split into those recoverable at the call boundary (fragment
checks, backend selection) and those fatal to the invocation (backend
failures).
*/

/// A union of varied error kinds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The asserted formula uses a fragment the backend cannot decide.
    Fragment(FragmentError),

    /// The backend failed.
    Backend(BackendError),

    /// A solve was requested with no formula asserted.
    NothingAsserted,

    /// The requested backend is not in the registry.
    UnknownBackend(String),
}

/// The asserted formula lies outside what the chosen backend supports.
///
/// Detected after parsing, from the feature flags of the formula, before any
/// encoding is attempted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FragmentError {
    /// First-order input against a backend without smt support.
    FirstOrder,

    /// Quantified input against a backend without quantifier support.
    Quantifiers,
}

impl From<FragmentError> for ErrorKind {
    fn from(e: FragmentError) -> Self {
        ErrorKind::Fragment(e)
    }
}

/// A failure inside a backend.
///
/// The solver loop does not retry: a backend failure is fatal to the
/// invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendError {
    Failure(String),
}

impl From<BackendError> for ErrorKind {
    fn from(e: BackendError) -> Self {
        ErrorKind::Backend(e)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Fragment(FragmentError::FirstOrder) => {
                write!(f, "first-order formulas require a backend with smt support")
            }
            ErrorKind::Fragment(FragmentError::Quantifiers) => {
                write!(f, "quantified formulas require a backend with quantifier support")
            }
            ErrorKind::Backend(BackendError::Failure(msg)) => {
                write!(f, "backend failure: {msg}")
            }
            ErrorKind::NothingAsserted => {
                write!(f, "no formula has been asserted")
            }
            ErrorKind::UnknownBackend(name) => {
                write!(f, "unknown backend '{name}'")
            }
        }
    }
}
