//! Render coordination around the external render tool
//!
//! One render is: write the composition source to a per-render scratch
//! file, invoke the render script with six positional arguments, bound it
//! with a wall-clock timeout, then recover the outcome from the tool's
//! combined output and the filesystem.
//!
//! The tool's own success signal is not fully trusted: a reported success
//! is cross-checked against the output file, and a missing result line is
//! forgiven when the file exists anyway.

use common::config::RenderConfig;
use common::error::{RenderError, RenderResult};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info};
use uuid::Uuid;

use crate::composition::{CompositionConfig, extract_composition_config};
use crate::listing::size_in_mb;

/// Prefix of the tool's authoritative result line
const RESULT_MARKER: &str = "RESULT_JSON:";
/// How much combined output is surfaced in failure details
const DETAIL_TAIL_LEN: usize = 2000;
/// How much combined output is logged
const LOG_TAIL_LEN: usize = 3000;

/// Outcome of a successful render
#[derive(Debug, Clone)]
pub struct RenderSuccess {
    pub filename: String,
    pub video_url: String,
    pub file_size_mb: f64,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

/// The JSON payload of a result marker line
#[derive(Debug, Deserialize)]
struct ToolResult {
    #[serde(default)]
    success: bool,
    #[serde(rename = "fileSizeMb")]
    file_size_mb: Option<f64>,
    error: Option<String>,
}

/// Coordinates render invocations of the external tool
pub struct Renderer {
    config: RenderConfig,
    public_base_url: String,
}

impl Renderer {
    pub fn new(config: RenderConfig, public_base_url: String) -> Self {
        Self {
            config,
            public_base_url,
        }
    }

    pub fn renders_dir(&self) -> &Path {
        &self.config.renders_dir
    }

    /// Render one composition to `{output_name or "render_" + id}.mp4`
    pub async fn render(
        &self,
        source: &str,
        output_name: Option<&str>,
    ) -> RenderResult<RenderSuccess> {
        let render_id = short_render_id();
        info!(render_id = %render_id, chars = source.len(), "Starting render");

        let config = extract_composition_config(source);
        info!(
            render_id = %render_id,
            duration = config.duration,
            fps = config.fps,
            width = config.width,
            height = config.height,
            "Extracted composition config"
        );

        // Per-render scratch path: concurrent renders never share a
        // source file.
        let source_dir = self.config.remotion_dir.join("src").join("user");
        fs::create_dir_all(&source_dir).await?;
        let source_path = source_dir.join(format!("{render_id}.tsx"));
        fs::write(&source_path, source).await?;

        let stem = output_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("render_{render_id}"));
        let filename = format!("{stem}.mp4");
        let output_path = self.config.renders_dir.join(&filename);

        let run = self.run_tool(&source_path, &output_path, &config).await;
        let _ = fs::remove_file(&source_path).await;
        let combined = run?;

        info!(
            render_id = %render_id,
            "Render tool output (tail):\n{}",
            tail(&combined, LOG_TAIL_LEN)
        );

        let parsed = parse_tool_result(&combined);
        let file_size_mb = match resolve_outcome(parsed, &output_path, &combined) {
            Ok(size) => size,
            Err(e) => {
                error!(render_id = %render_id, error = %e, "Render failed");
                return Err(e);
            }
        };

        info!(render_id = %render_id, file_size_mb, filename = %filename, "Render complete");

        Ok(RenderSuccess {
            video_url: format!("{}/renders/{}", self.public_base_url, filename),
            filename,
            file_size_mb,
            duration: config.duration,
            width: config.width,
            height: config.height,
        })
    }

    /// Run the render script, bounded by the configured timeout
    ///
    /// Returns the combined stdout + stderr of the tool. On timeout the
    /// tool's whole process group is killed, so processes the tool spawned
    /// (a headless browser, typically) die with it, and no output is
    /// recovered.
    async fn run_tool(
        &self,
        source_path: &Path,
        output_path: &Path,
        config: &CompositionConfig,
    ) -> RenderResult<String> {
        let mut command = Command::new(&self.config.node_bin);
        command
            .arg(self.config.script_path())
            .arg(source_path)
            .arg(output_path)
            .arg(config.duration.to_string())
            .arg(config.fps.to_string())
            .arg(config.width.to_string())
            .arg(config.height.to_string())
            .current_dir(&self.config.remotion_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group: the tool and all its descendants can be
        // killed together on timeout.
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn()?;
        let child_pid = child.id();

        // Dropping the wait future on timeout kills the direct child.
        let output = match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                kill_process_group(child_pid);
                return Err(RenderError::Timeout(self.config.timeout.as_secs()));
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }
}

/// Check a caller-supplied output name
///
/// Names are treated as untrusted: one path component, safe characters
/// only, bounded length.
pub fn validate_output_name(name: &str) -> bool {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$")
            .expect("Failed to compile output name regex")
    });
    regex.is_match(name)
}

/// Kill the tool's process group after a timeout
#[cfg(unix)]
fn kill_process_group(child_pid: Option<u32>) {
    let Some(pid) = child_pid else { return };
    // The child was started as its own group leader, so -pid addresses
    // the group: the tool plus everything it spawned.
    unsafe {
        libc::kill(-(pid as i32), libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child_pid: Option<u32>) {}

fn short_render_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Scan combined tool output for result marker lines
///
/// The last successfully parsed line wins; lines that carry the marker but
/// not valid JSON are skipped.
fn parse_tool_result(output: &str) -> Option<ToolResult> {
    let mut result = None;
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix(RESULT_MARKER) {
            if let Ok(parsed) = serde_json::from_str::<ToolResult>(rest) {
                result = Some(parsed);
            }
        }
    }
    result
}

/// Resolve the render outcome from the parsed result and the filesystem
///
/// Tiers: a reported success counts only if the output file exists; a
/// reported failure is surfaced as-is; with no usable result line an
/// existing output file still counts as success (size measured directly);
/// otherwise the tail of the tool output becomes the failure detail.
fn resolve_outcome(
    parsed: Option<ToolResult>,
    output_path: &Path,
    combined: &str,
) -> RenderResult<f64> {
    let file_size = || std::fs::metadata(output_path).map(|m| size_in_mb(m.len()));

    match parsed {
        Some(result) if result.success && output_path.exists() => match result.file_size_mb {
            Some(size) => Ok(size),
            None => Ok(file_size()?),
        },
        Some(result) if !result.success => Err(RenderError::Failed(
            result.error.unwrap_or_else(|| "Render failed".to_string()),
        )),
        _ => {
            if output_path.exists() {
                Ok(file_size()?)
            } else {
                // Only the diagnostic-tail tier gets the prefix; a
                // tool-reported error passes through bare.
                Err(RenderError::Failed(format!(
                    "Render failed:\n{}",
                    tail(combined, DETAIL_TAIL_LEN)
                )))
            }
        }
    }
}

/// Last `max_len` bytes of `text`, respecting char boundaries
fn tail(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut start = text.len() - max_len;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
