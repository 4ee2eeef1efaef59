//! Validate → assemble → send → settle.

use crate::{
    error::{ApiResult, SubmitError},
    images::StagedImages,
    model::{CreatedProduct, FieldValues, SubmissionState},
    payload::ProductPayload,
    validation,
};

/// Shown when the server gives no reason for a failed creation.
pub const GENERIC_FAILURE: &str = "Failed to create product";
/// Shown after a product was created.
pub const CREATED: &str = "Product created successfully";

/// Result of settling a creation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Created(CreatedProduct),
    /// User-facing failure message.
    Failed(String),
    /// Nothing was pending.
    Ignored,
}

/// Tracks one logical submission at a time.
#[derive(Debug, Default)]
pub struct SubmissionPipeline {
    state: SubmissionState,
}

impl SubmissionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Run the local checks and, if they pass, build the payload and mark the pipeline pending.
    ///
    /// The checks run in order: in-flight guard, sub-category gate, image guard, field
    /// validation. The state is
    /// untouched unless a payload is returned.
    pub fn begin(
        &mut self,
        values: &FieldValues,
        images: &StagedImages,
    ) -> Result<ProductPayload, SubmitError> {
        if self.state.is_pending() {
            return Err(SubmitError::InFlight);
        }
        if values.sub_category.is_empty() {
            return Err(SubmitError::NoSubCategory);
        }
        if images.is_empty() {
            return Err(SubmitError::NoImages);
        }
        let errors = validation::validate(values);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let payload = ProductPayload::assemble(values, images.files());
        self.state = SubmissionState::Pending;
        Ok(payload)
    }

    /// Record the outcome of the creation call started by [`begin`](Self::begin).
    pub fn settle(&mut self, result: ApiResult<CreatedProduct>) -> Settlement {
        if !self.state.is_pending() {
            tracing::warn!("creation result arrived with nothing pending; ignored");
            return Settlement::Ignored;
        }
        match result {
            Ok(created) => {
                self.state = SubmissionState::Success;
                Settlement::Created(created)
            }
            Err(e) => {
                let message = e.server_message().unwrap_or(GENERIC_FAILURE).to_string();
                self.state = SubmissionState::Error(message.clone());
                Settlement::Failed(message)
            }
        }
    }
}
