// Position analysis module
pub mod position_review;

pub use position_review::{PositionAnalyzer, PositionReview, Recommendation, TrendSignal};
