use thiserror::Error;

/// Raised when user-supplied text does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown work mode '{0}' (expected onsite, hybrid or remote)")]
    Mode(String),

    #[error("unknown source '{0}' (expected linkedin, naukri, indeed, instahyre or hirist)")]
    Source(String),

    #[error("unknown status '{0}' (expected not-applied, applied, rejected or selected)")]
    Status(String),

    #[error("unknown sort key '{0}' (expected latest, match or salary)")]
    SortKey(String),
}
