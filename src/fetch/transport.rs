use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::deeplink::{percent_decode, percent_encode_path};
use crate::foundation::error::{WdgtError, WdgtResult};

/// A received HTTP-style response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// URL the response was finally served from, after redirects.
    pub final_url: String,
}

impl HttpResponse {
    /// A 200 response served from `final_url`.
    pub fn ok(final_url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            final_url: final_url.into(),
        }
    }

    /// An empty response with the given status.
    pub fn status(final_url: impl Into<String>, status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            final_url: final_url.into(),
        }
    }
}

/// Host-supplied GET primitive.
///
/// `Err` means no response was received at all; any status code, including errors, is `Ok`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` with the given headers.
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> WdgtResult<HttpResponse>;
}

/// Serves `file://` URLs from the local filesystem: 200 with the file contents or 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    /// Construct a file transport.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Transport for FileTransport {
    async fn fetch(&self, url: &str, _headers: &[(String, String)]) -> WdgtResult<HttpResponse> {
        let path = file_url_to_path(url)
            .ok_or_else(|| WdgtError::transport(format!("unsupported url \"{url}\"")))?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(HttpResponse::ok(url, body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file not found");
                Ok(HttpResponse::status(url, 404))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read {}", path.display()))
                .into()),
        }
    }
}

/// Convert a `file://` URL into a local path.
pub fn file_url_to_path(url: &str) -> Option<PathBuf> {
    let rest = url.strip_prefix("file://")?;
    // Accept the `file://localhost/...` spelling as well.
    let rest = rest.strip_prefix("localhost").unwrap_or(rest);
    if !rest.starts_with('/') {
        return None;
    }
    Some(PathBuf::from(percent_decode(rest)))
}

/// Build an absolute `file://` URL for a local path.
pub fn path_to_file_url(path: &Path) -> anyhow::Result<String> {
    let abs = std::path::absolute(path)
        .with_context(|| format!("resolve absolute path for {}", path.display()))?;
    let s = abs
        .to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", abs.display()))?;
    Ok(format!("file://{}", percent_encode_path(s)))
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/transport.rs"]
mod tests;
