//! `widget://` activation URLs exchanged between the renderer and the host.

use std::fmt::Write as _;

use serde::Serialize;

use crate::foundation::error::{WdgtError, WdgtResult};

/// URL scheme of every deep link.
pub const SCHEME: &str = "widget";

/// Action carried by a `widget://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeepLink {
    /// A cell was activated.
    LinkUrl {
        /// Resolved link target.
        url: String,
        /// Widget id.
        id: String,
        /// Row-relative cell index.
        index: Option<usize>,
    },
    /// The whole surface was activated.
    LaunchUrl {
        /// The widget's `content_url`.
        url: String,
        /// Widget id.
        id: String,
    },
    /// Subscribe to a widget.
    AddWidget {
        /// Widget definition URL.
        url: String,
        /// Optional user name.
        user: Option<String>,
        /// Optional password.
        password: Option<String>,
    },
}

impl DeepLink {
    /// Wire name of the action (the URL host).
    pub fn action(&self) -> &'static str {
        match self {
            Self::LinkUrl { .. } => "link_url",
            Self::LaunchUrl { .. } => "launch_url",
            Self::AddWidget { .. } => "add_widget",
        }
    }

    /// Encode as `widget://<action>?url=..&...` with percent-encoded parameters.
    pub fn to_url(&self) -> String {
        let mut out = format!("{SCHEME}://{}", self.action());
        let mut sep = '?';
        let mut push = |key: &str, value: &str| {
            let _ = write!(out, "{sep}{key}={}", percent_encode(value));
            sep = '&';
        };
        match self {
            Self::LinkUrl { url, id, index } => {
                push("url", url);
                push("id", id);
                if let Some(index) = index {
                    push("index", &index.to_string());
                }
            }
            Self::LaunchUrl { url, id } => {
                push("url", url);
                push("id", id);
            }
            Self::AddWidget {
                url,
                user,
                password,
            } => {
                push("url", url);
                if let Some(user) = user {
                    push("user", user);
                }
                if let Some(password) = password {
                    push("password", password);
                }
            }
        }
        out
    }

    /// Parse a `widget://` URL. Missing string parameters decode as empty strings and an
    /// unparseable `index` as `None`.
    pub fn parse(s: &str) -> WdgtResult<Self> {
        let rest = s
            .trim()
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(|| WdgtError::validation(format!("not a {SCHEME}:// url: \"{s}\"")))?;
        let (action, query) = rest.split_once('?').unwrap_or((rest, ""));
        let action = action.trim_end_matches('/');
        let params = parse_query(query);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        match action {
            "link_url" => Ok(Self::LinkUrl {
                url: get("url").unwrap_or_default(),
                id: get("id").unwrap_or_default(),
                index: get("index").and_then(|i| i.parse().ok()),
            }),
            "launch_url" => Ok(Self::LaunchUrl {
                url: get("url").unwrap_or_default(),
                id: get("id").unwrap_or_default(),
            }),
            "add_widget" => Ok(Self::AddWidget {
                url: get("url").unwrap_or_default(),
                user: get("user"),
                password: get("password"),
            }),
            other => Err(WdgtError::validation(format!(
                "unknown deep link action \"{other}\""
            ))),
        }
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(k), percent_decode(v))
        })
        .collect()
}

/// Turn free-form user input into a widget id.
///
/// Input is trimmed; a `widget://` link is unwrapped to its `url` parameter.
pub fn normalize_widget_input(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("widget://") {
        if let Ok(link) = DeepLink::parse(trimmed) {
            let url = match link {
                DeepLink::LinkUrl { url, .. }
                | DeepLink::LaunchUrl { url, .. }
                | DeepLink::AddWidget { url, .. } => url,
            };
            return url.trim().to_owned();
        }
        tracing::debug!(input = trimmed, "unrecognized widget link, using it verbatim");
    }
    trimmed.to_owned()
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

fn encode_with(s: &str, keep: impl Fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if keep(b) {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

/// Percent-encode a query component: everything except `A-Z a-z 0-9 - . _ ~` is escaped.
pub fn percent_encode(s: &str) -> String {
    encode_with(s, is_unreserved)
}

/// Percent-encode a path, keeping `/` separators.
pub fn percent_encode_path(s: &str) -> String {
    encode_with(s, |b| is_unreserved(b) || b == b'/')
}

/// Decode `%XX` escapes. Malformed escapes are kept literally; invalid UTF-8 is replaced.
pub fn percent_decode(s: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).copied().and_then(hex),
                bytes.get(i + 2).copied().and_then(hex),
            )
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "../tests/unit/deeplink/deeplink.rs"]
mod tests;
