//! Environment-driven configuration for the render service
//!
//! Every config struct is built with `from_env()` and falls back to a
//! documented default for each missing variable individually.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default render timeout in seconds
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 300;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Base URL used when constructing public render URLs
    pub public_base_url: String,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: bind address (default: "0.0.0.0:8000")
    /// - `PUBLIC_BASE_URL`: URL prefix for render links
    ///   (default: "http://localhost:8000")
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        ServerConfig {
            bind_addr,
            public_base_url,
        }
    }
}

/// Object storage (S3) configuration
///
/// `from_env` returns `None` when any of access key, secret key or bucket
/// is missing, so callers can report "not configured" without probing the
/// store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// AWS region, defaults to "us-east-1"
    pub region: String,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AWS_ACCESS_KEY_ID`
    /// - `AWS_SECRET_ACCESS_KEY`
    /// - `AWS_BUCKET_NAME`
    /// - `AWS_REGION` (default: "us-east-1")
    pub fn from_env() -> Option<Self> {
        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY")?;
        let bucket = non_empty_var("AWS_BUCKET_NAME")?;
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Some(StorageConfig {
            access_key_id,
            secret_access_key,
            bucket,
            region,
        })
    }
}

/// Render pipeline configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory holding the external render project
    pub remotion_dir: PathBuf,
    /// Directory rendered MP4 files are written to
    pub renders_dir: PathBuf,
    /// Interpreter the render script is run with
    pub node_bin: String,
    /// Wall-clock budget for one render invocation
    pub timeout: Duration,
}

impl RenderConfig {
    /// Create a new RenderConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REMOTION_DIR`: render project location (default: "../remotion")
    /// - `RENDERS_DIR`: output directory (default: "../renders")
    /// - `NODE_BIN`: script interpreter (default: "node")
    /// - `RENDER_TIMEOUT_SECS`: wall-clock budget (default: 300)
    pub fn from_env() -> Self {
        let remotion_dir =
            PathBuf::from(env::var("REMOTION_DIR").unwrap_or_else(|_| "../remotion".to_string()));
        let renders_dir =
            PathBuf::from(env::var("RENDERS_DIR").unwrap_or_else(|_| "../renders".to_string()));
        let node_bin = env::var("NODE_BIN").unwrap_or_else(|_| "node".to_string());
        let timeout_secs = env::var("RENDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS);

        RenderConfig {
            remotion_dir,
            renders_dir,
            node_bin,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Path of the render script inside the render project
    pub fn script_path(&self) -> PathBuf {
        self.remotion_dir.join("render-remotion.js")
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_storage_env() {
        for key in [
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "AWS_BUCKET_NAME",
            "AWS_REGION",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn storage_config_absent_without_credentials() {
        clear_storage_env();
        assert!(StorageConfig::from_env().is_none());
    }

    #[test]
    #[serial]
    fn storage_config_region_defaults() {
        clear_storage_env();
        unsafe {
            env::set_var("AWS_ACCESS_KEY_ID", "key");
            env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
            env::set_var("AWS_BUCKET_NAME", "bucket");
        }

        let config = StorageConfig::from_env().expect("config should be present");
        assert_eq!(config.region, "us-east-1");

        clear_storage_env();
    }

    #[test]
    #[serial]
    fn storage_config_empty_values_count_as_missing() {
        clear_storage_env();
        unsafe {
            env::set_var("AWS_ACCESS_KEY_ID", "key");
            env::set_var("AWS_SECRET_ACCESS_KEY", "");
            env::set_var("AWS_BUCKET_NAME", "bucket");
        }

        assert!(StorageConfig::from_env().is_none());

        clear_storage_env();
    }

    #[test]
    #[serial]
    fn server_config_trims_trailing_slash() {
        unsafe { env::set_var("PUBLIC_BASE_URL", "https://render.example.com/") };
        let config = ServerConfig::from_env();
        assert_eq!(config.public_base_url, "https://render.example.com");
        unsafe { env::remove_var("PUBLIC_BASE_URL") };
    }

    #[test]
    #[serial]
    fn render_config_defaults() {
        for key in ["REMOTION_DIR", "RENDERS_DIR", "NODE_BIN", "RENDER_TIMEOUT_SECS"] {
            unsafe { env::remove_var(key) };
        }
        let config = RenderConfig::from_env();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.node_bin, "node");
        assert!(config.script_path().ends_with("render-remotion.js"));
    }
}
