//! Video analysis workflow: upload submission and the stub simulator that
//! completes records after a fixed delay.

pub mod simulator;
pub mod upload;

pub use simulator::AnalysisSimulator;
pub use upload::{UploadWorkflow, UploadedVideo};

/// Entity type recorded on analysis events.
pub const ENTITY_VIDEO_ANALYSIS: &str = "video_analysis";
