use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, SnnErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum SnnErr {
    /// Two collections or shapes that must agree do not.
    ShapeMismatch {
        what: &'static str,
        got: Vec<usize>,
        expected: Vec<usize>,
    },
    /// A cursor was read past the end of its partition.
    ExhaustedCursor {
        partition: &'static str,
        size: usize,
    },
    /// `fit` was called before attaching a model.
    ModelNotSet,
    /// A windowed evaluation got an empty window or disagreeing lengths.
    InvalidWindow { outputs: usize, labels: usize },
    /// A classifier was asked to predict before being fit.
    ClassifierNotFit,
    InvalidConfig(String),
    Storage { path: PathBuf, msg: String },
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for SnnErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnnErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a shape mismatch for {what}, got {got:?} and expected {expected:?}"
            ),
            SnnErr::ExhaustedCursor { partition, size } => write!(
                f,
                "Trainer reached the end of the {partition} data ({size} samples). To use further, call `reset()` to reset the index to 0."
            ),
            SnnErr::ModelNotSet => write!(
                f,
                "Model is not set. Call `set_model()` with an appropriate model instance."
            ),
            SnnErr::InvalidWindow { outputs, labels } => write!(
                f,
                "Invalid evaluation window: {outputs} outputs and {labels} labels, they must be equal and non-zero"
            ),
            SnnErr::ClassifierNotFit => write!(f, "The classifier must be fit before predicting"),
            SnnErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            SnnErr::Storage { path, msg } => {
                write!(f, "failed to load '{}': {msg}", path.display())
            }
            SnnErr::Io(e) => write!(f, "io error: {e}"),
            SnnErr::Json(e) => write!(f, "invalid JSON: {e}"),
        }
    }
}

impl Error for SnnErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SnnErr::Io(e) => Some(e),
            SnnErr::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnnErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnnErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<SnnErr> for io::Error {
    fn from(value: SnnErr) -> Self {
        match value {
            SnnErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_cursor_message_mentions_reset() {
        let err = SnnErr::ExhaustedCursor {
            partition: "training",
            size: 8,
        };

        assert!(err.to_string().contains("reset()"));
    }

    #[test]
    fn non_io_errors_become_invalid_data() {
        let err: io::Error = SnnErr::ModelNotSet.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
