//! Render API service
//!
//! HTTP façade over the external render tool and the object store:
//! composition parameter extraction, render coordination, asset upload and
//! render listing.

pub mod composition;
pub mod error;
pub mod listing;
pub mod models;
pub mod renderer;
pub mod routes;
pub mod state;
pub mod uploader;
