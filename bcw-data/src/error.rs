/// Error types for the analysis stages
use std::fmt;
use thiserror::Error;

/// The analysis that raised an [`AnalysisError`]. Regional, historical and
/// map views cannot fail and have no stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    Seasonal,
    Climatic,
    Heatmap,
    Scatter,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::Seasonal => "seasonal trends",
            AnalysisStage::Climatic => "climatic influences",
            AnalysisStage::Heatmap => "correlation heatmap",
            AnalysisStage::Scatter => "scatter",
        };
        f.write_str(name)
    }
}

/// What went wrong inside a stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFault {
    /// A weather row whose value count disagrees with the measurement names
    #[error("observation {index} has {found} measurements, expected {expected}")]
    RaggedRow {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The join left nothing to analyze
    #[error("no rows remain after joining cotton and weather data")]
    NoOverlap,

    /// A weather variable that is not a measurement column
    #[error("unknown weather variable: {0}")]
    UnknownVariable(String),
}

/// A failed analysis, tagged with its stage so one failing view does not
/// take the others down.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} analysis failed: {fault}")]
pub struct AnalysisError {
    pub stage: AnalysisStage,
    #[source]
    pub fault: AnalysisFault,
}

impl AnalysisError {
    pub fn new(stage: AnalysisStage, fault: AnalysisFault) -> Self {
        AnalysisError { stage, fault }
    }
}

/// Type alias for Results using AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;
