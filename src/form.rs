//! The product form aggregate.
//!
//! [`FormController`] owns the field values, per-field errors, loaded reference data, the
//! dependency resolver, the staged images and the submission pipeline. All mutation goes
//! through it, one event at a time.

use std::sync::Arc;

use crate::{
    catalog::CatalogApi,
    error::{ApiError, ApiResult, SubmitError},
    images::{StagedFile, StagedImages},
    model::{Category, ColorOption, CreatedProduct, Field, FieldValues, SubCategory, SubmissionState},
    notify::Notifier,
    payload::ProductPayload,
    resolver::{DependencyFetch, DependencyResolver, FetchOutcome, SelectOptions},
    session::Credential,
    submission::{self, Settlement, SubmissionPipeline},
    validation::FieldErrors,
    worker::WorkerEvent,
};

const CATEGORIES_FAILED: &str = "Failed to fetch categories";
const SUB_CATEGORIES_FAILED: &str = "Failed to fetch sub-categories";
const SELECT_SUB_CATEGORY: &str = "Please select a subcategory before saving.";
const SAVING: &str = "Saving product...";

pub struct FormController {
    values: FieldValues,
    errors: FieldErrors,
    categories: Vec<Category>,
    colors: Vec<ColorOption>,
    resolver: DependencyResolver,
    images: StagedImages,
    pipeline: SubmissionPipeline,
    notifier: Arc<dyn Notifier>,
}

impl FormController {
    /// Empty form; reference data arrives later.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            values: FieldValues::default(),
            errors: FieldErrors::new(),
            categories: Vec::new(),
            colors: Vec::new(),
            resolver: DependencyResolver::new(),
            images: StagedImages::new(),
            pipeline: SubmissionPipeline::new(),
            notifier,
        }
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    /// Errors from the last rejected submit, minus fields edited since.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn colors(&self) -> &[ColorOption] {
        &self.colors
    }

    pub fn product_type_options(&self) -> &SelectOptions<String> {
        self.resolver.product_types()
    }

    pub fn sub_category_options(&self) -> &SelectOptions<SubCategory> {
        self.resolver.sub_categories()
    }

    pub fn images(&self) -> &StagedImages {
        &self.images
    }

    pub fn submission_state(&self) -> &SubmissionState {
        self.pipeline.state()
    }

    // ---- field edits ----

    /// Set a single-valued field.
    ///
    /// Setting `category` to a new value cascades through the resolver and returns the
    /// sub-category fetch the caller must run. `sizes` is ignored here; use
    /// [`set_sizes`](Self::set_sizes).
    ///
    /// `subCategory` and `productType` only accept a value offered by an enabled select; an
    /// empty value always clears them.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Option<DependencyFetch> {
        let value = value.into();
        self.errors.remove(&field);
        if field == Field::Category {
            return self.select_category(value);
        }
        if !value.is_empty() && !self.is_offered(field, &value) {
            tracing::warn!("{field} = {value:?} refused: not offered by the select");
            return None;
        }
        if !self.values.set(field, value) {
            tracing::warn!("{field} is not a single-valued field");
        }
        None
    }

    /// Whether `value` is selectable for a resolver-driven field. Other fields accept anything.
    fn is_offered(&self, field: Field, value: &str) -> bool {
        match field {
            Field::SubCategory => {
                let opts = self.resolver.sub_categories();
                !opts.disabled && opts.items.iter().any(|s| s.id == value)
            }
            Field::ProductType => {
                let opts = self.resolver.product_types();
                !opts.disabled && opts.items.iter().any(|t| t == value)
            }
            _ => true,
        }
    }

    pub fn set_sizes<I, S>(&mut self, sizes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors.remove(&Field::Sizes);
        self.values.set_sizes(sizes);
    }

    /// Change the category; returns the fetch to run when one was issued.
    ///
    /// Re-selecting the current category changes nothing. Clearing it returns the resolver to
    /// idle.
    pub fn select_category(&mut self, category_id: impl Into<String>) -> Option<DependencyFetch> {
        let category_id = category_id.into();
        self.errors.remove(&Field::Category);
        if category_id == self.values.category && !category_id.is_empty() {
            return None;
        }

        self.values.category = category_id;
        if self.values.category.is_empty() {
            self.resolver.reset();
            self.values.product_type.clear();
            self.values.sub_category.clear();
            return None;
        }

        let id = self.values.category.clone();
        let category = self.categories.iter().find(|c| c.id == id);
        if category.is_none() {
            tracing::warn!("category {id} is not in the loaded list");
        }
        Some(self.resolver.select_category(&id, category, &mut self.values))
    }

    /// Apply a finished sub-category fetch. Stale results are dropped silently.
    pub fn apply_sub_categories(
        &mut self,
        fetch: &DependencyFetch,
        result: ApiResult<Vec<SubCategory>>,
    ) -> FetchOutcome {
        let outcome = self.resolver.complete(fetch, result);
        if outcome == FetchOutcome::Failed {
            self.notifier.error(SUB_CATEGORIES_FAILED);
        }
        outcome
    }

    /// Run a fetch returned by [`select_category`](Self::select_category) and apply it.
    pub async fn resolve_sub_categories(
        &mut self,
        api: &dyn CatalogApi,
        credential: Option<&Credential>,
        fetch: DependencyFetch,
    ) -> FetchOutcome {
        let result = match credential {
            Some(c) => api.sub_categories(c, &fetch.category_id).await,
            None => Err(ApiError::MissingCredential),
        };
        self.apply_sub_categories(&fetch, result)
    }

    // ---- reference data ----

    pub fn apply_categories(&mut self, result: ApiResult<Vec<Category>>) {
        match result {
            Ok(cats) => {
                tracing::info!("{} categories loaded", cats.len());
                self.categories = cats;
            }
            Err(e) => {
                tracing::warn!("category load failed: {e}");
                self.categories.clear();
                self.notifier.error(CATEGORIES_FAILED);
            }
        }
    }

    /// Color failures only reach the log.
    pub fn apply_colors(&mut self, result: ApiResult<Vec<ColorOption>>) {
        match result {
            Ok(colors) => {
                tracing::info!("{} colors loaded", colors.len());
                self.colors = colors;
            }
            Err(e) => {
                tracing::warn!("color load failed: {e}");
                self.colors.clear();
            }
        }
    }

    /// Load categories and colors; does nothing while signed out.
    pub async fn load_reference_data(
        &mut self,
        api: &dyn CatalogApi,
        credential: Option<&Credential>,
    ) {
        let Some(credential) = credential else {
            tracing::warn!("reference data not loaded: no credential");
            return;
        };
        let (cats, colors) = tokio::join!(api.categories(credential), api.colors(credential));
        self.apply_categories(cats);
        self.apply_colors(colors);
    }

    // ---- images ----

    pub fn stage_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = StagedFile>,
    {
        self.images.stage_files(files);
    }

    /// Remove a staged image; out-of-range indices are ignored.
    pub fn unstage(&mut self, index: usize) {
        if self.images.unstage(index).is_none() {
            tracing::debug!("unstage({index}) ignored: {} staged", self.images.len());
        }
    }

    // ---- submission ----

    /// Whether the save affordance is enabled.
    pub fn can_submit(&self) -> bool {
        !self.pipeline.state().is_pending() && !self.values.sub_category.is_empty()
    }

    /// Text shown under a disabled save affordance.
    pub fn submit_hint(&self) -> Option<&'static str> {
        if self.values.sub_category.is_empty() {
            Some(SELECT_SUB_CATEGORY)
        } else if self.pipeline.state().is_pending() {
            Some(SAVING)
        } else {
            None
        }
    }

    /// Local half of a submit: guards, validation, payload. On success the form is pending and
    /// the caller must send the payload and pass the reply to
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<ProductPayload, SubmitError> {
        match self.pipeline.begin(&self.values, &self.images) {
            Ok(payload) => {
                self.errors.clear();
                tracing::info!("submitting with {} image(s)", self.images.len());
                Ok(payload)
            }
            Err(SubmitError::InFlight) => {
                tracing::debug!("submit ignored: already pending");
                Err(SubmitError::InFlight)
            }
            Err(SubmitError::NoSubCategory) => {
                tracing::debug!("submit ignored: no sub-category selected");
                Err(SubmitError::NoSubCategory)
            }
            Err(SubmitError::NoImages) => {
                self.notifier.error(&SubmitError::NoImages.to_string());
                Err(SubmitError::NoImages)
            }
            Err(SubmitError::Invalid(errors)) => {
                tracing::info!("submit blocked by {} field error(s)", errors.len());
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Settle a creation reply. Success clears the form; failure keeps it for a retry.
    pub fn finish_submit(&mut self, result: ApiResult<CreatedProduct>) -> Settlement {
        let settlement = self.pipeline.settle(result);
        match &settlement {
            Settlement::Created(_) => {
                self.values = FieldValues::default();
                self.errors.clear();
                self.resolver.reset();
                self.images.reset_all();
                self.notifier.success(submission::CREATED);
            }
            Settlement::Failed(message) => self.notifier.error(message),
            Settlement::Ignored => {}
        }
        settlement
    }

    /// Submit and wait for the reply.
    pub async fn submit(
        &mut self,
        api: &dyn CatalogApi,
        credential: Option<&Credential>,
    ) -> Result<Settlement, SubmitError> {
        let payload = self.begin_submit()?;
        let result = match credential {
            Some(c) => api.create_product(c, payload).await,
            None => Err(ApiError::MissingCredential),
        };
        Ok(self.finish_submit(result))
    }

    /// Apply one worker event.
    pub fn handle_event(&mut self, ev: WorkerEvent) {
        match ev {
            WorkerEvent::CategoriesLoaded(r) => self.apply_categories(r),
            WorkerEvent::ColorsLoaded(r) => self.apply_colors(r),
            WorkerEvent::SubCategoriesLoaded { fetch, result } => {
                self.apply_sub_categories(&fetch, result);
            }
            WorkerEvent::ProductSettled(r) => {
                self.finish_submit(r);
            }
        }
    }
}
