//! Remote catalog service used by the form.

use async_trait::async_trait;

use crate::{
    error::ApiResult,
    model::{Category, ColorOption, CreatedProduct, SubCategory},
    payload::ProductPayload,
    session::Credential,
};

/// HTTP implementation of [`CatalogApi`].
pub mod http;
/// Scripted in-memory catalog for tests.
#[cfg(test)]
pub mod fake;

pub use http::HttpCatalog;

/// Calls the form makes against the backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// First page of categories, each with its embedded product types.
    async fn categories(&self, credential: &Credential) -> ApiResult<Vec<Category>>;

    /// First page of colors.
    async fn colors(&self, credential: &Credential) -> ApiResult<Vec<ColorOption>>;

    /// Sub-categories belonging to one category.
    async fn sub_categories(
        &self,
        credential: &Credential,
        category_id: &str,
    ) -> ApiResult<Vec<SubCategory>>;

    /// Create a product from a multipart payload.
    async fn create_product(
        &self,
        credential: &Credential,
        payload: ProductPayload,
    ) -> ApiResult<CreatedProduct>;
}
