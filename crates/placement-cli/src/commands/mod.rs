//! CLI Command Implementations
//!
//! - [`serve`]: HTTP dashboard
//! - [`predict`]: single prediction
//! - [`analyze`]: dataset statistics

mod analyze;
mod predict;
mod serve;

pub use analyze::AnalyzeCommand;
pub use predict::PredictCommand;
pub use serve::ServeCommand;
