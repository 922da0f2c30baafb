//! Error type shared by the whole crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A linear-only consumer hit a term of degree two or higher.
    #[error("nonlinear term: {0}")]
    NonlinearTerm(String),

    /// The model holds something only generated code can express.
    #[error("model '{0}' cannot be written as MPS: {1}")]
    UnsupportedForMps(String, String),

    /// Exact member lookup missed in a concrete group.
    #[error("key [{key}] not found in group '{group}'")]
    KeyNotFound { group : String, key : String },

    /// Both sides of a relation were plain numbers.
    #[error("comparison of two constants, {0} and {1}")]
    InvalidComparison(f64, f64),

    /// A membership test over a fully concrete key.
    #[error("set membership test needs at least one iterator")]
    InvalidSetMembership,

    #[error("division by zero")]
    DivisionByZero,

    /// The remote session rejected a submission.
    #[error("remote execution failed with status '{status}'")]
    RemoteExecution { status : String, log : String },
}
