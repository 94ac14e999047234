// ToxiGuard: real-time toxicity analysis orchestration.
//
// This is the library root. Each module corresponds to one layer: the
// external predictor, local text statistics, the analysis session, and
// terminal output for the CLI.

pub mod config;
pub mod output;
pub mod predictor;
pub mod session;
pub mod text;
