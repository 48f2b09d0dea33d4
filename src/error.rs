use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Result type for model-building operations
pub type Result<T> = std::result::Result<T, Error>;

/// Halting errors. Anything derived after one of these would be silently
/// wrong, so the run stops at the offending declaration.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error("I/O error: {0}")]
    #[diagnostic(code(eosgen::io_error))]
    Io(String),

    #[error("{file}:{line}: structural parse error: {message}")]
    #[diagnostic(code(eosgen::structural_error))]
    Structural {
        file: String,
        line: usize,
        message: String,
    },

    #[error("lookup failed for `{name}`: {message}")]
    #[diagnostic(code(eosgen::lookup_error))]
    Lookup { name: String, message: String },

    #[error("internal error: {message}")]
    #[diagnostic(code(eosgen::internal_error))]
    Internal { message: String },
}

impl Error {
    /// Create a structural parse error pointing at a declaration line
    pub fn structural(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::Structural {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a lookup error for a derived macro or method name
    pub fn lookup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Lookup {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Non-halting findings collected while consolidating and classifying.
///
/// These are carried on the resolved model and summarized at end of run;
/// none of them stops processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum ModelDiagnostic {
    /// Count/array pairing found zero or several equally good candidates.
    AmbiguousCountPairing {
        strukt: String,
        field: String,
        candidates: Vec<String>,
    },
    /// An accessor-derived interface name matches no scanned interface.
    UnmatchedInterface { interface: String },
    /// A struct participates in no method or callback at all.
    EmptyRoleSet { strukt: String },
    /// A desugared union field has no `<Field>Type` discriminant sibling.
    UnresolvedDiscriminant { strukt: String, field: String },
    /// A fixed lookup table carries the same key twice with different values.
    DuplicateDefaultKey {
        key: String,
        first: String,
        second: String,
    },
    /// Enums derived from a known interface whose handle was never declared.
    EnumOwnerMissing { interface: String, count: usize },
}

impl std::fmt::Display for ModelDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelDiagnostic::AmbiguousCountPairing {
                strukt,
                field,
                candidates,
            } => write!(
                f,
                "ambiguous count pairing for {strukt}.{field} (candidates: {candidates:?})"
            ),
            ModelDiagnostic::UnmatchedInterface { interface } => {
                write!(f, "accessor-derived interface `{interface}` matches no scanned file")
            }
            ModelDiagnostic::EmptyRoleSet { strukt } => {
                write!(f, "struct `{strukt}` has no detected role")
            }
            ModelDiagnostic::UnresolvedDiscriminant { strukt, field } => {
                write!(f, "union field {strukt}.{field} has no discriminant sibling")
            }
            ModelDiagnostic::DuplicateDefaultKey { key, first, second } => {
                write!(f, "default table key `{key}` maps to both `{first}` and `{second}`")
            }
            ModelDiagnostic::EnumOwnerMissing { interface, count } => {
                write!(f, "{count} enums belong to interface `{interface}` which has no handle")
            }
        }
    }
}
