use std::fmt;

/// States of one analysis request.
///
/// A run moves strictly forward from `Idle` to `ResultReady`. Any failure
/// returns the session to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    #[default]
    Idle,
    CollectingInput,
    Encoding,
    Aligning,
    Scaling,
    Classifying,
    ResultReady,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::Idle => "idle",
            AnalysisStage::CollectingInput => "collecting input",
            AnalysisStage::Encoding => "encoding",
            AnalysisStage::Aligning => "aligning",
            AnalysisStage::Scaling => "scaling",
            AnalysisStage::Classifying => "classifying",
            AnalysisStage::ResultReady => "result ready",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
