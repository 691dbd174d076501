//! Error types for parsing and lowering expressions.

/// Errors raised while turning expressions into rational functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlgebraError {
    /// The source text is not a well-formed expression.
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// The expression references a symbol outside its scope.
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// A function argument is not an integer combination of coordinates.
    /// Fractional multiples have no exact representation in the ring.
    #[error(
        "unsupported argument to {function}: `{argument}` is not an integer combination of coordinates \
         (only integer multiples are exact; rescale the coordinate instead, e.g. q = 2*w for q/2)"
    )]
    UnsupportedArgument { function: String, argument: String },

    /// An exponent, literal or accumulated, is larger than
    /// [`crate::MAX_EXPONENT`] in magnitude.
    #[error("exponent out of range: powers are limited to ±{limit}")]
    ExponentOverflow { limit: i32 },

    /// A denominator is identically zero.
    #[error("division by zero")]
    DivisionByZero,
}
