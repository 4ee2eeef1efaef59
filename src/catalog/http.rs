//! Catalog backend over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::CatalogApi;
use crate::{
    config::BackendCfg,
    error::{ApiError, ApiResult},
    model::{Category, ColorOption, CreatedProduct, SubCategory},
    payload::ProductPayload,
    session::Credential,
};

/// `GET category/all-categories` response.
#[derive(Debug, Deserialize)]
struct CategoriesResp {
    #[serde(default)]
    data: Vec<Category>,
}

/// `GET color` response; the list is nested one level deeper.
#[derive(Debug, Deserialize)]
struct ColorsResp {
    data: ColorsPage,
}

#[derive(Debug, Deserialize)]
struct ColorsPage {
    #[serde(default)]
    data: Vec<ColorOption>,
}

/// `GET sub-category/category/{id}` response.
#[derive(Debug, Deserialize)]
struct SubCategoriesResp {
    data: Option<SubCategoriesData>,
}

#[derive(Debug, Deserialize)]
struct SubCategoriesData {
    #[serde(rename = "subCategories", default)]
    sub_categories: Option<Vec<SubCategory>>,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Catalog client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: Client,
    base_url: String,
    page: u32,
    limit: u32,
}

impl HttpCatalog {
    /// Build a client from the backend section of the config.
    pub fn new(cfg: &BackendCfg) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, cfg))
    }

    /// Use an existing reqwest client.
    pub fn with_client(http: Client, cfg: &BackendCfg) -> Self {
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            page: cfg.page,
            limit: cfg.limit,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn categories(&self, credential: &Credential) -> ApiResult<Vec<Category>> {
        let url = self.url(&format!(
            "category/all-categories?page={}&limit={}",
            self.page, self.limit
        ));
        let resp = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json::<CategoriesResp>().await?.data)
    }

    async fn colors(&self, credential: &Credential) -> ApiResult<Vec<ColorOption>> {
        let url = self.url(&format!("color?page={}&limit={}", self.page, self.limit));
        let resp = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.json::<ColorsResp>().await?.data.data)
    }

    async fn sub_categories(
        &self,
        credential: &Credential,
        category_id: &str,
    ) -> ApiResult<Vec<SubCategory>> {
        let url = self.url(&format!(
            "sub-category/category/{}",
            urlencoding::encode(category_id)
        ));
        let resp = self
            .http
            .get(url)
            .bearer_auth(credential.token())
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let mut subs = resp
            .json::<SubCategoriesResp>()
            .await?
            .data
            .and_then(|d| d.sub_categories)
            .unwrap_or_default();
        // The parent id is not always echoed back.
        for s in subs.iter_mut().filter(|s| s.category.is_empty()) {
            s.category = category_id.to_string();
        }
        Ok(subs)
    }

    async fn create_product(
        &self,
        credential: &Credential,
        payload: ProductPayload,
    ) -> ApiResult<CreatedProduct> {
        let form = payload.into_form()?;
        let resp = self
            .http
            .post(self.url("product"))
            .bearer_auth(credential.token())
            .multipart(form)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let raw = resp.json::<serde_json::Value>().await?;
        let id = raw["data"]["_id"]
            .as_str()
            .or_else(|| raw["_id"].as_str())
            .map(str::to_string);
        Ok(CreatedProduct { id, raw })
    }
}

/// Convert non-2xx responses into `ApiError::Status`, keeping the server's message.
async fn ensure_success(resp: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);
    tracing::warn!("HTTP status {status} error: {body}");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
