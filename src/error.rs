use thiserror::Error;

/// Unified error type for `regspec` operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Raised when no input line produced a parseable statement.
    ///
    /// This is a user-facing notice rather than a defect: a presentation
    /// layer should show the message and leave the session untouched.
    #[error("no valid statements were found in the input")]
    EmptyInput,

    /// Raised when expanding a variable re-enters a definition already on the
    /// current expansion path, e.g. `K = M + A` together with `M = K + B`.
    #[error("algebraic definition `{name}` refers back to itself (directly or through other definitions)")]
    CyclicDefinition {
        /// The defined name whose expansion was re-entered.
        name: String,
    },
}

impl SpecError {
    /// Helper to raise a [`CyclicDefinition`](SpecError::CyclicDefinition) for `name`.
    pub fn cyclic<S: Into<String>>(name: S) -> Self {
        Self::CyclicDefinition { name: name.into() }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, SpecError>;
