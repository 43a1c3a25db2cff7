use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::catalog::profile::ordered_pairs;

/// Structured (JSON or YAML) form of a request file.
#[derive(Debug, Deserialize)]
pub struct StructuredRequest {
    #[serde(default = "default_method")]
    pub method: String,
    pub path: String,
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl StructuredRequest {
    /// Render as HTTP/1.1 request text, the only form the builder accepts.
    pub fn to_raw(&self) -> String {
        let mut out = format!("{} {} HTTP/1.1\n", self.method, self.path);
        for (k, v) in &self.headers {
            out.push_str(&format!("{}: {}\n", k, v));
        }
        out.push('\n');
        if let Some(body) = &self.body {
            out.push_str(body);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestFormat {
    Raw,
    Json,
    Yaml,
}

fn detect_format(path: &Path) -> RequestFormat {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("json") => RequestFormat::Json,
        Some("yaml") | Some("yml") => RequestFormat::Yaml,
        _ => RequestFormat::Raw,
    }
}

/// Read a request file. `.json` and `.yaml`/`.yml` files are rendered to raw text,
/// anything else is returned as-is.
pub fn load_request_file(path: &Path) -> anyhow::Result<String> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    let structured: StructuredRequest = match detect_format(path) {
        RequestFormat::Raw => return Ok(data),
        RequestFormat::Json => serde_json::from_str(&data)
            .with_context(|| format!("invalid JSON request in {}", path.display()))?,
        RequestFormat::Yaml => serde_yaml::from_str(&data)
            .with_context(|| format!("invalid YAML request in {}", path.display()))?,
    };
    Ok(structured.to_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::raw::parse_raw_request;

    #[test]
    fn test_structured_request_renders_parsable_text() {
        let s: StructuredRequest = serde_json::from_str(
            r#"{"method":"POST","path":"/search","headers":{"Host":"a.example","X-A":"1"},"body":"q=1"}"#,
        )
        .unwrap();
        let raw = parse_raw_request(&s.to_raw()).unwrap();
        assert_eq!(raw.path, "/search");
        assert_eq!(raw.headers[0], ("Host".to_string(), "a.example".to_string()));
        assert_eq!(raw.headers[1].0, "X-A");
        assert_eq!(raw.body.as_deref(), Some("q=1"));
    }

    #[test]
    fn test_load_plain_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("req.txt");
        std::fs::write(&txt, "GET /a HTTP/1.1\n").unwrap();
        assert_eq!(load_request_file(&txt).unwrap(), "GET /a HTTP/1.1\n");

        let json = dir.path().join("req.json");
        std::fs::write(&json, r#"{"path":"/b"}"#).unwrap();
        assert!(load_request_file(&json).unwrap().starts_with("GET /b HTTP/1.1\n"));
    }

    #[test]
    fn test_load_yaml_file_keeps_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("req.yml");
        std::fs::write(
            &yaml,
            "method: POST\npath: /upload\nheaders:\n  Host: orig.example\n  Cookie: sid=1\nbody: a=1\n",
        )
        .unwrap();
        let raw = parse_raw_request(&load_request_file(&yaml).unwrap()).unwrap();
        assert_eq!(raw.method, reqwest::Method::POST);
        assert_eq!(raw.path, "/upload");
        assert_eq!(raw.headers[0].0, "Host");
        assert_eq!(raw.headers[1], ("Cookie".to_string(), "sid=1".to_string()));
        assert_eq!(raw.body.as_deref(), Some("a=1"));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("req.yaml");
        std::fs::write(&yaml, "method: GET\n").unwrap();
        let err = load_request_file(&yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid YAML request"));
    }
}
