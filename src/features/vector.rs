//! Fixed-length feature vector

/// Summary statistics of one clip, ready for the classifier.
///
/// The only constructor replaces NaN and infinities with 0.0, so every
/// value is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn sanitized(mut values: Vec<f32>) -> Self {
        let mut replaced = 0usize;
        for v in values.iter_mut() {
            if !v.is_finite() {
                *v = 0.0;
                replaced += 1;
            }
        }
        if replaced > 0 {
            log::debug!("Replaced {} non-finite feature values with 0.0", replaced);
        }
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
