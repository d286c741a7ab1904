use thiserror::Error;

/// Inconsistent geometry. Fatal to the placement that hit it, never to the session.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryFault {
    #[error("acos argument {argument} lies outside [-1, 1] while {context}")]
    AcosDomain {
        argument: f64,
        context: &'static str,
    },
    #[error("step length {proposed} breaks the triangle inequality (must stay below {limit})")]
    TriangleInequality { proposed: f64, limit: f64 },
    #[error("non-finite value produced while {context}")]
    NonFinite { context: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Geometry(#[from] GeometryFault),
    #[error("placement needs {needed} previous targets but only {available} are recorded")]
    InsufficientHistory { needed: usize, available: usize },
}
