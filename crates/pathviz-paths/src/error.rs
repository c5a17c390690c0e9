use std::fmt;

use pathviz_core::GridError;
use thiserror::Error;

/// Which endpoint was missing when a search was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEndpoint {
    Start,
    End,
    Both,
}

impl fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("no start cell"),
            Self::End => f.write_str("no end cell"),
            Self::Both => f.write_str("no start or end cell"),
        }
    }
}

/// Reasons a search refuses to run or stops early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid search configuration: {0}")]
    InvalidConfiguration(MissingEndpoint),
    #[error(transparent)]
    OutOfRange(#[from] GridError),
    /// A barrier changed after the last neighbour refresh.
    #[error("neighbour lists are stale; refresh the grid before searching")]
    StaleNeighbors,
    #[error("search cancelled")]
    Cancelled,
}
