//! Cascading form controller for adding products to a catalog admin panel.
//!
//! The form keeps derived fields (product type, sub-category), staged image previews and
//! submission state consistent while catalog requests complete in any order.

pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod images;
pub mod model;
pub mod notify;
pub mod payload;
pub mod resolver;
pub mod session;
pub mod submission;
pub mod validation;
pub mod worker;

pub use catalog::{CatalogApi, HttpCatalog};
pub use error::{ApiError, ApiResult, SubmitError};
pub use form::FormController;
pub use images::{StagedFile, StagedImages};
pub use model::{Category, ColorOption, Field, FieldValues, SubCategory, SubmissionState};
pub use resolver::{DependencyFetch, FetchOutcome};
pub use session::{Credential, SessionProvider, StaticSession};
