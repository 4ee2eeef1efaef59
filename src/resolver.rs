//! Category-dependent options: product types and sub-categories.
//!
//! Selecting a category updates the product-type options synchronously and issues a
//! [`DependencyFetch`] for the sub-categories. Every fetch carries a token from a counter that
//! only grows; when a result comes back it is applied only if its token is still the latest
//! one issued, so a slow response for an earlier category can never overwrite the options of
//! the category selected after it.

use crate::{
    error::ApiResult,
    model::{Category, FieldValues, SubCategory},
};

/// A sub-category request issued for one category selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyFetch {
    pub category_id: String,
    pub token: u64,
}

/// Options shown by a select, plus whether the select accepts input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOptions<T> {
    pub items: Vec<T>,
    pub disabled: bool,
}

impl<T> SelectOptions<T> {
    fn disabled() -> Self {
        Self {
            items: Vec::new(),
            disabled: true,
        }
    }

    /// Disabled iff there is nothing to choose.
    fn from_items(items: Vec<T>) -> Self {
        let disabled = items.is_empty();
        Self { items, disabled }
    }
}

/// What happened to a completed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result applied; carries the number of sub-categories now offered.
    Applied(usize),
    /// Fetch failed; options degraded to empty and disabled.
    Failed,
    /// Superseded by a later selection; nothing changed.
    Stale,
}

#[derive(Debug)]
pub struct DependencyResolver {
    /// Last token handed out; tokens are never reused.
    issued: u64,
    /// Fetch whose result is still wanted.
    live: Option<DependencyFetch>,
    product_types: SelectOptions<String>,
    sub_categories: SelectOptions<SubCategory>,
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyResolver {
    /// Idle state: both selects empty and disabled.
    pub fn new() -> Self {
        Self {
            issued: 0,
            live: None,
            product_types: SelectOptions::disabled(),
            sub_categories: SelectOptions::disabled(),
        }
    }

    /// React to a category selection.
    ///
    /// `category` is the catalog entry for `category_id` when it is known; an unknown id
    /// simply has no product types. Clears both dependent values in `values`.
    pub fn select_category(
        &mut self,
        category_id: &str,
        category: Option<&Category>,
        values: &mut FieldValues,
    ) -> DependencyFetch {
        let types = category.map(|c| c.product_types.clone()).unwrap_or_default();
        self.product_types = SelectOptions::from_items(types);
        self.sub_categories = SelectOptions::disabled();
        values.product_type.clear();
        values.sub_category.clear();

        self.issued += 1;
        let fetch = DependencyFetch {
            category_id: category_id.to_string(),
            token: self.issued,
        };
        self.live = Some(fetch.clone());
        tracing::info!(
            "category {} selected, sub-category fetch #{}",
            category_id,
            fetch.token
        );
        fetch
    }

    /// Whether `fetch` is the one whose result is still wanted.
    pub fn is_live(&self, fetch: &DependencyFetch) -> bool {
        self.live.as_ref() == Some(fetch)
    }

    /// Apply a finished fetch if it is still live.
    pub fn complete(
        &mut self,
        fetch: &DependencyFetch,
        result: ApiResult<Vec<SubCategory>>,
    ) -> FetchOutcome {
        if !self.is_live(fetch) {
            tracing::debug!(
                "discarding stale sub-categories for {} (#{})",
                fetch.category_id,
                fetch.token
            );
            return FetchOutcome::Stale;
        }
        self.live = None;

        match result {
            Ok(subs) => {
                let n = subs.len();
                self.sub_categories = SelectOptions::from_items(subs);
                tracing::info!("{n} sub-categories for {}", fetch.category_id);
                FetchOutcome::Applied(n)
            }
            Err(e) => {
                tracing::warn!("sub-category fetch for {} failed: {e}", fetch.category_id);
                self.sub_categories = SelectOptions::disabled();
                FetchOutcome::Failed
            }
        }
    }

    /// Back to idle; any outstanding fetch becomes stale.
    pub fn reset(&mut self) {
        self.live = None;
        self.product_types = SelectOptions::disabled();
        self.sub_categories = SelectOptions::disabled();
    }

    pub fn product_types(&self) -> &SelectOptions<String> {
        &self.product_types
    }

    pub fn sub_categories(&self) -> &SelectOptions<SubCategory> {
        &self.sub_categories
    }

    /// True while the live fetch has not come back.
    pub fn is_loading(&self) -> bool {
        self.live.is_some()
    }
}
