/// Which of the three arrays of a contraction an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    A,
    B,
    C,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operand::A => "A",
            Operand::B => "B",
            Operand::C => "C",
        };
        f.write_str(name)
    }
}

/// The two classes of invalid contraction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Buffer/shape/label-count disagreement for a single array.
    ShapeMismatch,
    /// Labels disagree across arrays.
    AxisConsistency,
}

/// Errors that can occur while planning or executing a contraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EinsteinError {
    #[error("operand {operand} has {labels} labels for rank {rank}")]
    LabelCountMismatch {
        operand: Operand,
        labels: usize,
        rank: usize,
    },

    #[error("output has {output} labels, more than the {inputs} input labels combined")]
    OutputRankTooLarge { output: usize, inputs: usize },

    #[error("operand {operand} axis {position}: fixed index {index} out of range for dim {dim}")]
    FixedIndexOutOfRange {
        operand: Operand,
        position: usize,
        index: usize,
        dim: usize,
    },

    #[error("size overflow while computing {0}")]
    SizeOverflow(&'static str),

    #[error("dimension mismatch for axis {axis}: {expected} vs {found} in operand {operand}")]
    AxisSizeMismatch {
        axis: String,
        operand: Operand,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    View(#[from] einstein_view::ViewError),
}

impl EinsteinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EinsteinError::AxisSizeMismatch { .. } | EinsteinError::OutputRankTooLarge { .. } => {
                ErrorKind::AxisConsistency
            }
            EinsteinError::LabelCountMismatch { .. }
            | EinsteinError::FixedIndexOutOfRange { .. }
            | EinsteinError::SizeOverflow(_)
            | EinsteinError::View(_) => ErrorKind::ShapeMismatch,
        }
    }
}

/// Convenience alias for `Result<T, EinsteinError>`.
pub type Result<T> = std::result::Result<T, EinsteinError>;
