//! Catalog store for the campus assistant.
//!
//! Holds course, study material and past question records, answers filter
//! queries by department, level or course code, and serves study advice
//! keyed by level.

pub mod advice;
pub mod dataset;
pub mod memory;
pub mod store;

pub use advice::{advice_for, GENERIC_ADVICE};
pub use dataset::CatalogData;
pub use memory::InMemoryCatalog;
pub use store::CatalogStore;
