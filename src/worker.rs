//! Background worker executing catalog calls for the form.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    catalog::CatalogApi,
    error::{ApiError, ApiResult},
    model::{Category, ColorOption, CreatedProduct, SubCategory},
    payload::ProductPayload,
    resolver::DependencyFetch,
    session::SessionProvider,
};

/// Commands sent from the form to the worker.
#[derive(Debug)]
pub enum WorkerCmd {
    /// Load categories and colors (skipped while signed out).
    LoadReferenceData,
    /// Fetch sub-categories for a category selection.
    FetchSubCategories(DependencyFetch),
    /// Send the create-product request.
    CreateProduct(ProductPayload),
}

/// Events emitted by the worker for the form to apply.
#[derive(Clone, Debug)]
pub enum WorkerEvent {
    CategoriesLoaded(ApiResult<Vec<Category>>),
    ColorsLoaded(ApiResult<Vec<ColorOption>>),
    SubCategoriesLoaded {
        fetch: DependencyFetch,
        result: ApiResult<Vec<SubCategory>>,
    },
    ProductSettled(ApiResult<CreatedProduct>),
}

/// Main worker loop.
///
/// Each command runs on its own task, so replies can arrive in any order; ordering is the
/// receiver's concern (see the resolver's fetch tokens).
pub async fn run(
    mut rx: mpsc::Receiver<WorkerCmd>,
    tx: mpsc::Sender<WorkerEvent>,
    api: Arc<dyn CatalogApi>,
    session: Arc<dyn SessionProvider>,
) {
    tracing::info!("worker started");

    while let Some(cmd) = rx.recv().await {
        // The session may sign in or out between commands.
        let credential = session.credential();
        let api = api.clone();
        let tx = tx.clone();

        match cmd {
            WorkerCmd::LoadReferenceData => {
                let Some(credential) = credential else {
                    tracing::warn!("reference data not loaded: no credential");
                    continue;
                };
                tracing::info!("loading categories and colors");
                tokio::spawn(async move {
                    let (cats, colors) =
                        tokio::join!(api.categories(&credential), api.colors(&credential));
                    let _ = tx.send(WorkerEvent::CategoriesLoaded(cats)).await;
                    let _ = tx.send(WorkerEvent::ColorsLoaded(colors)).await;
                });
            }

            WorkerCmd::FetchSubCategories(fetch) => {
                tracing::info!(
                    "fetch sub-categories for {} (#{})",
                    fetch.category_id,
                    fetch.token
                );
                tokio::spawn(async move {
                    let result = match credential {
                        Some(c) => api.sub_categories(&c, &fetch.category_id).await,
                        None => Err(ApiError::MissingCredential),
                    };
                    let _ = tx
                        .send(WorkerEvent::SubCategoriesLoaded { fetch, result })
                        .await;
                });
            }

            WorkerCmd::CreateProduct(payload) => {
                tracing::info!("create product start");
                tokio::spawn(async move {
                    let result = match credential {
                        Some(c) => api.create_product(&c, payload).await,
                        None => Err(ApiError::MissingCredential),
                    };
                    match &result {
                        Ok(p) => tracing::info!("create product done: {:?}", p.id),
                        Err(e) => tracing::error!("create product failed: {e}"),
                    }
                    let _ = tx.send(WorkerEvent::ProductSettled(result)).await;
                });
            }
        }
    }

    tracing::info!("worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::fake::ScriptedCatalog, session::StaticSession};
    use std::time::Duration;

    fn spawn(
        api: Arc<ScriptedCatalog>,
        token: &str,
    ) -> (mpsc::Sender<WorkerCmd>, mpsc::Receiver<WorkerEvent>) {
        let (tx_cmd, rx_cmd) = mpsc::channel(16);
        let (tx_ev, rx_ev) = mpsc::channel(16);
        tokio::spawn(run(
            rx_cmd,
            tx_ev,
            api,
            Arc::new(StaticSession::new(token)),
        ));
        (tx_cmd, rx_ev)
    }

    #[tokio::test(start_paused = true)]
    async fn test_replies_arrive_in_completion_order() {
        let api = Arc::new(ScriptedCatalog::new());
        api.script_sub_categories("shoes", Duration::from_millis(200), Ok(vec![]));
        api.script_sub_categories("bags", Duration::from_millis(10), Ok(vec![]));
        let (tx, mut rx) = spawn(api, "tok");

        for (id, token) in [("shoes", 1), ("bags", 2)] {
            tx.send(WorkerCmd::FetchSubCategories(DependencyFetch {
                category_id: id.into(),
                token,
            }))
            .await
            .unwrap();
        }

        let mut order = vec![];
        for _ in 0..2 {
            if let Some(WorkerEvent::SubCategoriesLoaded { fetch, .. }) = rx.recv().await {
                order.push(fetch.token);
            }
        }
        assert_eq!(order, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_signed_out_skips_reference_data() {
        let api = Arc::new(ScriptedCatalog::new());
        let (tx, mut rx) = spawn(api.clone(), "");

        tx.send(WorkerCmd::LoadReferenceData).await.unwrap();
        tx.send(WorkerCmd::FetchSubCategories(DependencyFetch {
            category_id: "shoes".into(),
            token: 1,
        }))
        .await
        .unwrap();

        match rx.recv().await {
            Some(WorkerEvent::SubCategoriesLoaded { result, .. }) => {
                assert_eq!(result, Err(ApiError::MissingCredential));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(api.category_calls(), 0);
    }

    #[tokio::test]
    async fn test_reference_data_emits_both_lists() {
        let api = Arc::new(ScriptedCatalog::new());
        api.set_colors(Ok(vec![ColorOption {
            id: "k1".into(),
            name: "Red".into(),
            code: "#f00".into(),
        }]));
        let (tx, mut rx) = spawn(api, "tok");

        tx.send(WorkerCmd::LoadReferenceData).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(WorkerEvent::CategoriesLoaded(Ok(_)))
        ));
        match rx.recv().await {
            Some(WorkerEvent::ColorsLoaded(Ok(colors))) => assert_eq!(colors.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }
}
