//! Error types for currying.

use thiserror::Error;

/// Result type for currying operations.
pub type Result<T> = std::result::Result<T, CurryError>;

/// Errors that can occur while wrapping or calling a curried function.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurryError {
    /// More arguments were supplied in total than the function declares
    #[error("function takes {arity} argument(s) but {supplied} were supplied")]
    ArityMismatch { arity: usize, supplied: usize },

    /// The function does not declare a fixed number of parameters
    #[error("cannot curry a function without a fixed arity")]
    UnsupportedArity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CurryError::ArityMismatch {
                arity: 3,
                supplied: 4
            }
            .to_string(),
            "function takes 3 argument(s) but 4 were supplied"
        );
        assert_eq!(
            CurryError::UnsupportedArity.to_string(),
            "cannot curry a function without a fixed arity"
        );
    }
}
