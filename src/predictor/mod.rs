// Prediction service: trait-based abstraction over the external classifier.
//
// The Predictor trait defines the interface. HttpPredictor implements it
// against the `/predict` JSON endpoint. The coordinator only ever sees the
// trait, so tests drive it with an in-process fake.

pub mod http;
pub mod traits;
