pub mod rubric;
mod session;

pub use rubric::{interpolate, Rubric};
pub use session::{
    dimension_weights, format_session_score, score_inputs, score_session, session_score_to_json,
    DimensionScore, ScoreInputs, SessionQualityScore,
};
