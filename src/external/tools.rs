use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use which::which;

use crate::errors::ExternalToolError;
use crate::external::runner;
use crate::external::PayloadGenerator;

const DUMP_MARKER: &str = "Dumped HTTP request for";
const LOG_TAG: &str = "[INF]";
const NO_TEMPLATES: &str = "no templates provided for scan";

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").unwrap());

#[derive(Debug, Clone)]
pub struct NucleiConfig {
    /// Explicit binary; otherwise `tools/nuclei_<os>`, then `nuclei` on PATH.
    pub binary: Option<PathBuf>,
    pub templates: PathBuf,
    /// Host nuclei is pointed at while dumping; nothing is sent to the WAF sites here.
    pub placeholder_target: String,
    pub timeout_secs: u64,
}

impl Default for NucleiConfig {
    fn default() -> Self {
        Self {
            binary: None,
            templates: PathBuf::from("tools").join("nuclei-templates"),
            placeholder_target: "https://example.com".to_string(),
            timeout_secs: 300,
        }
    }
}

fn bundled_binary_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "nuclei_linux",
        "windows" => "nuclei_windows",
        _ => "nuclei_macos",
    }
}

/// Builds CVE request payloads from nuclei templates (`-dreq` dump mode).
pub struct NucleiGenerator {
    config: NucleiConfig,
}

impl NucleiGenerator {
    pub fn new(config: NucleiConfig) -> Self {
        Self { config }
    }

    pub fn locate_binary(&self) -> Result<PathBuf, ExternalToolError> {
        if let Some(path) = &self.config.binary {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(ExternalToolError::ToolMissing(path.display().to_string()));
        }
        let bundled = PathBuf::from("tools").join(bundled_binary_name());
        if bundled.exists() {
            return Ok(bundled);
        }
        which("nuclei").map_err(|_| ExternalToolError::ToolMissing(format!("{} or nuclei on PATH", bundled.display())))
    }
}

#[async_trait]
impl PayloadGenerator for NucleiGenerator {
    async fn generate_payload(&self, id: &str) -> Result<String, ExternalToolError> {
        let binary = self.locate_binary()?;
        if !self.config.templates.exists() {
            return Err(ExternalToolError::TemplatesMissing(self.config.templates.clone()));
        }

        let templates = self.config.templates.to_string_lossy().into_owned();
        let args = ["-id", id, "-u", self.config.placeholder_target.as_str(), "-t", templates.as_str(), "-dreq"];
        tracing::info!(binary = %binary.display(), id, "generating payload with nuclei");

        let output = runner::capture_cmd_output(&binary, &args, Duration::from_secs(self.config.timeout_secs)).await?;
        if output.contains(NO_TEMPLATES) {
            return Err(ExternalToolError::TemplateNotFound(id.to_string()));
        }
        extract_http_request(&output).ok_or_else(|| ExternalToolError::MarkerNotFound(id.to_string()))
    }
}

pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Pull the dumped request out of nuclei output: everything after the marker line up
/// to the next `[INF]` log line.
pub fn extract_http_request(output: &str) -> Option<String> {
    let clean = strip_ansi(output);
    let marker_at = clean.find(DUMP_MARKER)?;
    let line_end = marker_at + clean[marker_at..].find('\n')?;
    let rest = &clean[line_end + 1..];
    let end = rest.find(LOG_TAG).unwrap_or(rest.len());
    let request = rest[..end].trim();
    if request.is_empty() {
        None
    } else {
        Some(request.to_string())
    }
}
