//! Classifier trait definition

use anyhow::Result;

/// Trained binary classifier - allows swapping between the real model and stubs
///
/// Implementations must be pure functions of their input once constructed;
/// one instance is shared by every concurrent request.
pub trait Classifier: Send + Sync {
    /// Feature dimension the model was trained on
    fn input_dim(&self) -> usize;

    /// Class probabilities `[p_human, p_machine_generated]` for one vector
    fn predict_proba(&self, features: &[f32]) -> Result<[f32; 2]>;
}
