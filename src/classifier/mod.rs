//! Classification layer
//!
//! The trained model is consumed through the `Classifier` trait so the
//! pipeline can run against the real artifact or a stub.

mod adapter;
mod logistic;
mod stub;
mod traits;

pub use adapter::{Classification, ClassifierAdapter};
pub use logistic::LogisticModel;
pub use stub::StubClassifier;
pub use traits::Classifier;
