//! Error types for the different ways that linking or evaluation can fail.

use std::fmt::{Display, Formatter};

use mungframe::{GraphError, ObjId};

/// Alias for `Result<T, munglinker::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The different ways that munglinker can fail.  Any of these aborts the processing of the
/// document it came from; other documents are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An edge operation failed, either because it named an object which doesn't exist or because
    /// it found an edge which was only recorded on one side.
    Graph(GraphError),
    /// Predicted and true labels were given as arrays of different lengths
    LengthMismatch { predicted: usize, truth: usize },
    /// A classifier produced a label for the pair `from -> to` which isn't `0` or `1`
    InvalidLabel { from: ObjId, to: ObjId, label: u8 },
}

impl From<GraphError> for Error {
    fn from(e: GraphError) -> Self {
        Error::Graph(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Graph(e) => write!(f, "{}", e),
            Error::LengthMismatch { predicted, truth } => write!(
                f,
                "Got {} predicted labels but {} true labels",
                predicted, truth
            ),
            Error::InvalidLabel { from, to, label } => write!(
                f,
                "Decision for {from} --> {to} has label {label}; expected 0 or 1"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(e) => Some(e),
            _ => None,
        }
    }
}
