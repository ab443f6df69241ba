//! # SRDB Common Library
//!
//! Shared code for the song rights catalog:
//! - Catalog entities and YAML loading
//! - Data sources (local directory, HTTP, in-memory)
//! - Display row joins, table sort/search/pagination
//! - Multi-format reports
//! - Configuration loading

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod source;
pub mod table;
pub mod view_model;

pub use error::{Error, Result};
