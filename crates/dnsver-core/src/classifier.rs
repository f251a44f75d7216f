//! Classification of encoded targets with an immutable model.

use crate::encoder::FeatureSchema;
use crate::error::Result;
use crate::model::{DecisionTree, Model};
use crate::types::FeatureVector;

/// Wraps a loaded model together with its feature schema.
///
/// Nothing is mutated after construction; a single classifier is shared by
/// reference for a whole scan.
#[derive(Debug, Clone)]
pub struct Classifier<M = DecisionTree> {
    model: M,
    schema: FeatureSchema,
}

impl<M: Model> Classifier<M> {
    /// Wrap a model, building its feature lookup table
    pub fn new(model: M) -> Result<Self> {
        let schema = FeatureSchema::from_model(&model)?;
        Ok(Self { model, schema })
    }

    /// The wrapped model
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Feature schema declared by the model
    #[must_use]
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict the label for one feature vector.
    ///
    /// The label may join several merged classes with
    /// [`crate::LABEL_DELIMITER`].
    pub fn classify(&self, features: &FeatureVector) -> Result<&str> {
        self.model.predict(features)
    }
}
