/// Fixed-width one-hot record for one target, in model feature order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureVector(Vec<bool>);

impl FeatureVector {
    /// All-false vector of the given width
    #[must_use]
    pub fn zeroed(width: usize) -> Self {
        Self(vec![false; width])
    }

    /// Set the feature at `index`; out-of-range indices are ignored
    pub fn set(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = true;
        }
    }

    /// Feature value as the tree compares it
    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.0.get(index).map(|&hot| if hot { 1.0 } else { 0.0 })
    }

    /// Width of the vector
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-width vector
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw one-hot values
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Count of hot features
    #[must_use]
    pub fn hot_count(&self) -> usize {
        self.0.iter().filter(|&&hot| hot).count()
    }
}

impl From<Vec<bool>> for FeatureVector {
    fn from(values: Vec<bool>) -> Self {
        Self(values)
    }
}
