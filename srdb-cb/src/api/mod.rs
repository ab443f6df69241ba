//! HTTP API handlers for srdb-cb

pub mod assets;
pub mod buildinfo;
pub mod catalog;
pub mod error;
pub mod health;
pub mod query;
pub mod reload;
pub mod reports;

pub use assets::serve_css;
pub use buildinfo::get_build_info;
pub use catalog::{catalog_json, catalog_page, featured_page};
pub use error::{ApiError, PageError};
pub use health::health_routes;
pub use reload::reload_catalog;
pub use reports::{report_page, report_raw, reports_index};
