//! In-memory catalog with scripted replies and call counters.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use super::CatalogApi;
use crate::{
    error::{ApiError, ApiResult},
    model::{Category, ColorOption, CreatedProduct, SubCategory},
    payload::ProductPayload,
    session::Credential,
};

type Scripted<T> = (Duration, ApiResult<T>);

#[derive(Default)]
pub struct ScriptedCatalog {
    categories: Mutex<Option<ApiResult<Vec<Category>>>>,
    colors: Mutex<Option<ApiResult<Vec<ColorOption>>>>,
    sub_categories: Mutex<HashMap<String, Scripted<Vec<SubCategory>>>>,
    create: Mutex<Option<Scripted<CreatedProduct>>>,
    payloads: Mutex<Vec<ProductPayload>>,
    category_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_categories(&self, r: ApiResult<Vec<Category>>) {
        *self.categories.lock().unwrap() = Some(r);
    }

    pub fn set_colors(&self, r: ApiResult<Vec<ColorOption>>) {
        *self.colors.lock().unwrap() = Some(r);
    }

    pub fn script_sub_categories(
        &self,
        category_id: &str,
        delay: Duration,
        r: ApiResult<Vec<SubCategory>>,
    ) {
        self.sub_categories
            .lock()
            .unwrap()
            .insert(category_id.to_string(), (delay, r));
    }

    pub fn script_create(&self, delay: Duration, r: ApiResult<CreatedProduct>) {
        *self.create.lock().unwrap() = Some((delay, r));
    }

    pub fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Payloads received by `create_product`, oldest first.
    pub fn payloads(&self) -> Vec<ProductPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for ScriptedCatalog {
    async fn categories(&self, _credential: &Credential) -> ApiResult<Vec<Category>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.categories.lock().unwrap().clone().unwrap_or(Ok(vec![]))
    }

    async fn colors(&self, _credential: &Credential) -> ApiResult<Vec<ColorOption>> {
        self.colors.lock().unwrap().clone().unwrap_or(Ok(vec![]))
    }

    async fn sub_categories(
        &self,
        _credential: &Credential,
        category_id: &str,
    ) -> ApiResult<Vec<SubCategory>> {
        let scripted = self.sub_categories.lock().unwrap().get(category_id).cloned();
        let (delay, result) = scripted.unwrap_or((Duration::ZERO, Ok(vec![])));
        tokio::time::sleep(delay).await;
        result
    }

    async fn create_product(
        &self,
        _credential: &Credential,
        payload: ProductPayload,
    ) -> ApiResult<CreatedProduct> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload);
        let scripted = self.create.lock().unwrap().clone();
        let (delay, result) = scripted.unwrap_or((
            Duration::ZERO,
            Err(ApiError::Transport("no reply scripted".into())),
        ));
        tokio::time::sleep(delay).await;
        result
    }
}
