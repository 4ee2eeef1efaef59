//! Drives one product draft through the form and the background worker.

use anyhow::{Context, Result, anyhow, bail};
use std::{path::Path, sync::Arc};
use tokio::sync::mpsc;

use product_form::{
    FormController, HttpCatalog, SessionProvider, StaticSession, SubmitError,
    config::Config,
    images::StagedFile,
    model::{Field, SubmissionState},
    notify::LogNotifier,
    worker::{self, WorkerCmd, WorkerEvent},
};

use crate::draft::{Draft, lookup};

/// Form plus the channels to the worker.
struct App {
    form: FormController,
    worker_tx: mpsc::Sender<WorkerCmd>,
    worker_rx: mpsc::Receiver<WorkerEvent>,
}

impl App {
    /// Apply worker events until `done` holds for one of them.
    async fn pump_until(&mut self, mut done: impl FnMut(&WorkerEvent) -> bool) -> Result<()> {
        while let Some(ev) = self.worker_rx.recv().await {
            let stop = done(&ev);
            self.form.handle_event(ev);
            if stop {
                return Ok(());
            }
        }
        Err(anyhow!("worker stopped unexpectedly"))
    }
}

/// Fill the form from `draft` and submit it. Returns the final submission state.
pub async fn run(cfg: &Config, draft: Draft, draft_dir: &Path) -> Result<SubmissionState> {
    let session = Arc::new(StaticSession::new(cfg.access_token()));
    if session.credential().is_none() {
        bail!("no access token: set session.access_token or PRODUCT_FORM_TOKEN");
    }
    let api = Arc::new(HttpCatalog::new(&cfg.backend)?);

    // Dedicated channels for worker commands and events.
    let (tx_cmd, rx_cmd) = mpsc::channel::<WorkerCmd>(16);
    let (tx_ev, rx_ev) = mpsc::channel::<WorkerEvent>(64);
    tokio::spawn(worker::run(rx_cmd, tx_ev, api, session));

    let mut app = App {
        form: FormController::new(Arc::new(LogNotifier)),
        worker_tx: tx_cmd,
        worker_rx: rx_ev,
    };

    // Reference data first; the category lookup needs it.
    app.worker_tx.send(WorkerCmd::LoadReferenceData).await?;
    let (mut cats, mut colors) = (false, false);
    app.pump_until(|ev| {
        match ev {
            WorkerEvent::CategoriesLoaded(_) => cats = true,
            WorkerEvent::ColorsLoaded(_) => colors = true,
            _ => {}
        }
        cats && colors
    })
    .await?;

    let category = lookup(
        &draft.category,
        app.form
            .categories()
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str())),
    )
    .ok_or_else(|| anyhow!("unknown category {:?}", draft.category))?;
    if let Some(fetch) = app.form.select_category(category) {
        app.worker_tx
            .send(WorkerCmd::FetchSubCategories(fetch.clone()))
            .await?;
        app.pump_until(
            |ev| matches!(ev, WorkerEvent::SubCategoriesLoaded { fetch: f, .. } if *f == fetch),
        )
        .await?;
    }

    let sub_category = lookup(
        &draft.sub_category,
        app.form
            .sub_category_options()
            .items
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str())),
    )
    .ok_or_else(|| anyhow!("unknown sub-category {:?}", draft.sub_category))?;
    let color = lookup(
        &draft.color,
        app.form
            .colors()
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str())),
    )
    .ok_or_else(|| anyhow!("unknown color {:?}", draft.color))?;

    if !draft.product_type.is_empty()
        && !app
            .form
            .product_type_options()
            .items
            .contains(&draft.product_type)
    {
        tracing::warn!("product type {:?} is not offered for this category", draft.product_type);
    }

    let form = &mut app.form;
    form.set_field(Field::SubCategory, sub_category);
    form.set_field(Field::Color, color);
    form.set_field(Field::ProductType, draft.product_type);
    form.set_field(Field::Title, draft.title);
    form.set_field(Field::Msrp, draft.msrp);
    form.set_field(Field::Moq, draft.moq);
    form.set_field(Field::UnitPrice, draft.unit_price);
    form.set_field(Field::PackPrice, draft.pack_price);
    form.set_field(Field::Quantity, draft.quantity);
    form.set_field(Field::Description, draft.description);
    form.set_field(Field::BrandName, draft.brand_name);
    form.set_sizes(draft.sizes);

    let mut files = Vec::with_capacity(draft.images.len());
    for p in &draft.images {
        let path = draft_dir.join(p);
        let file = StagedFile::from_path(&path)
            .await
            .with_context(|| format!("failed to read image {}", path.display()))?;
        files.push(file);
    }
    form.stage_files(files);

    let payload = match form.begin_submit() {
        Ok(p) => p,
        Err(SubmitError::Invalid(errors)) => {
            let list = errors
                .iter()
                .map(|(f, m)| format!("{f}: {m}"))
                .collect::<Vec<_>>()
                .join(", ");
            bail!("draft is incomplete: {list}");
        }
        Err(e) => return Err(e.into()),
    };

    app.worker_tx.send(WorkerCmd::CreateProduct(payload)).await?;
    app.pump_until(|ev| matches!(ev, WorkerEvent::ProductSettled(_)))
        .await?;

    Ok(app.form.submission_state().clone())
}
