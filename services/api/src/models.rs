//! API models for request and response payloads

use serde::{Deserialize, Serialize};

/// Request for rendering a composition
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Composition source text
    pub code: String,
    /// Optional output filename stem (without extension)
    pub output_name: Option<String>,
}

/// Response for a successful render
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub status: &'static str,
    pub video_url: String,
    pub filename: String,
    pub file_size_mb: f64,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

/// Response for a successful asset upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub url: String,
    pub filename: String,
    pub key: String,
}

/// One rendered file on disk
#[derive(Debug, Clone, Serialize)]
pub struct RenderFileEntry {
    pub filename: String,
    pub url: String,
    pub size_mb: f64,
}

/// Response for the render listing endpoint
#[derive(Debug, Serialize)]
pub struct RenderListResponse {
    pub renders: Vec<RenderFileEntry>,
}
