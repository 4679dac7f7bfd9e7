/// Error types for the crate.
///
/// Both variants are caller-contract violations (a vector of the wrong
/// length); they are deterministic given the caller's bug, so retrying is
/// never meaningful.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Input vector length does not match the declared input count.
    #[error("wrong number of inputs: expected {expected}, got {got}")]
    InvalidInput { expected: usize, got: usize },

    /// Target vector length does not match the output count.
    #[error("wrong number of target values: expected {expected}, got {got}")]
    TargetSize { expected: usize, got: usize },
}
