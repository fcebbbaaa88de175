#![deny(unsafe_code)]

pub mod align;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod stage;

pub use align::{Alignment, UnmatchedKeyPolicy, align, align_with_policy};
pub use encoder::{encode, known_columns, one_hot_column, one_hot_key};
pub use error::{PipelineError, StageError};
pub use pipeline::{InferencePipeline, Prediction};
pub use session::{ASSISTANT_SYSTEM_PROMPT, SessionContext};
pub use stage::AnalysisStage;
