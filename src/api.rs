//! JSON endpoints the editor talks to.
//!
//! The server is an opaque collaborator. [`ApiClient`] knows the paths and
//! payload shapes; moving bytes is left to a [`Transport`] supplied by the
//! host (a browser fetch bridge, an HTTP client, a test double).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type transports report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DRAFT_PATH: &str = "/api/draft";
pub const RESOURCE_PATH: &str = "/api/resource";
pub const LABEL_PATH: &str = "/api/t9n";
pub const LABEL_TABLE_PATH: &str = "/api/l10n";

/// Request/response plumbing for the API endpoints.
pub trait Transport {
    /// `GET path` and return the response body.
    fn get(&self, path: &str) -> Result<String, BoxError>;

    /// `POST path` with a JSON body and return the response body.
    fn post_json(&self, path: &str, body: &str) -> Result<String, BoxError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> Result<String, BoxError> {
        (**self).get(path)
    }

    fn post_json(&self, path: &str, body: &str) -> Result<String, BoxError> {
        (**self).post_json(path, body)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed")]
    Transport {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("invalid response from {path}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body")]
    Encode(#[from] serde_json::Error),
    #[error("response from {path} is missing `{field}`")]
    MissingField { path: String, field: &'static str },
    #[error("server rejected the upload: {0}")]
    Rejected(String),
}

/// A saved draft as returned by `/api/draft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

/// Body of a `/api/resource` upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUpload {
    pub mime: String,
    pub filename: String,
    /// Base64 (standard alphabet, padded) file content.
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct ResourceReply {
    ok: bool,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelReply {
    t9n: String,
}

#[derive(Debug, Deserialize)]
struct LabelTableReply {
    t9n: HashMap<String, String>,
}

/// Typed access to the editor endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a draft by id.
    pub fn draft(&self, id: &str) -> Result<Draft, ApiError> {
        let path = format!("{DRAFT_PATH}?id={}", urlencoding::encode(id));
        self.get_json(&path)
    }

    /// Upload a resource and return the filename the server stored it under.
    pub fn upload_resource(&self, upload: &ResourceUpload) -> Result<String, ApiError> {
        let body = serde_json::to_string(upload)?;
        let raw = self
            .transport
            .post_json(RESOURCE_PATH, &body)
            .map_err(|source| ApiError::Transport {
                path: RESOURCE_PATH.to_string(),
                source,
            })?;
        let reply: ResourceReply = decode(RESOURCE_PATH, &raw)?;
        if reply.ok {
            reply.filename.ok_or_else(|| ApiError::MissingField {
                path: RESOURCE_PATH.to_string(),
                field: "filename",
            })
        } else {
            Err(ApiError::Rejected(reply.error.unwrap_or_default()))
        }
    }

    /// Fetch one localized label.
    pub fn label(&self, which: &str) -> Result<String, ApiError> {
        let path = format!("{LABEL_PATH}?which={}", urlencoding::encode(which));
        self.get_json::<LabelReply>(&path).map(|reply| reply.t9n)
    }

    /// Fetch the whole localized label table.
    pub fn labels(&self) -> Result<HashMap<String, String>, ApiError> {
        self.get_json::<LabelTableReply>(LABEL_TABLE_PATH)
            .map(|reply| reply.t9n)
    }

    fn get_json<R: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<R, ApiError> {
        tracing::debug!(path, "GET");
        let raw = self
            .transport
            .get(path)
            .map_err(|source| ApiError::Transport {
                path: path.to_string(),
                source,
            })?;
        decode(path, &raw)
    }
}

fn decode<R: for<'de> Deserialize<'de>>(path: &str, raw: &str) -> Result<R, ApiError> {
    serde_json::from_str(raw).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Replies with a fixed body and remembers the last request.
    #[derive(Default)]
    struct CannedTransport {
        reply: String,
        last: RefCell<Option<(String, Option<String>)>>,
    }

    impl CannedTransport {
        fn replying(body: &str) -> Self {
            Self {
                reply: body.to_string(),
                ..Self::default()
            }
        }
    }

    impl Transport for CannedTransport {
        fn get(&self, path: &str) -> Result<String, BoxError> {
            *self.last.borrow_mut() = Some((path.to_string(), None));
            Ok(self.reply.clone())
        }

        fn post_json(&self, path: &str, body: &str) -> Result<String, BoxError> {
            *self.last.borrow_mut() = Some((path.to_string(), Some(body.to_string())));
            Ok(self.reply.clone())
        }
    }

    struct DownTransport;

    impl Transport for DownTransport {
        fn get(&self, _path: &str) -> Result<String, BoxError> {
            Err("connection refused".into())
        }

        fn post_json(&self, _path: &str, _body: &str) -> Result<String, BoxError> {
            Err("connection refused".into())
        }
    }

    #[test]
    fn test_draft_requests_encoded_id() {
        let client = ApiClient::new(CannedTransport::replying(
            r##"{"title":"Plan","content":"# Week 1"}"##,
        ));
        let draft = client.draft("a b&c").unwrap();
        assert_eq!(draft.title, "Plan");
        assert_eq!(draft.content, "# Week 1");
        let (path, body) = client.transport().last.borrow().clone().unwrap();
        assert_eq!(path, "/api/draft?id=a%20b%26c");
        assert!(body.is_none());
    }

    #[test]
    fn test_upload_returns_stored_filename() {
        let client = ApiClient::new(CannedTransport::replying(
            r#"{"ok":true,"filename":"1234.png"}"#,
        ));
        let upload = ResourceUpload {
            mime: "image/png".to_string(),
            filename: "cat.png".to_string(),
            data: "AAEC".to_string(),
        };
        assert_eq!(client.upload_resource(&upload).unwrap(), "1234.png");

        let (path, body) = client.transport().last.borrow().clone().unwrap();
        assert_eq!(path, RESOURCE_PATH);
        let sent: ResourceUpload = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(sent, upload);
    }

    #[test]
    fn test_upload_rejection_carries_server_error() {
        let client = ApiClient::new(CannedTransport::replying(
            r#"{"ok":false,"error":"file too large"}"#,
        ));
        let upload = ResourceUpload {
            mime: "image/png".to_string(),
            filename: "big.png".to_string(),
            data: String::new(),
        };
        let err = client.upload_resource(&upload).unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref msg) if msg == "file too large"));
    }

    #[test]
    fn test_upload_ok_without_filename_is_an_error() {
        let client = ApiClient::new(CannedTransport::replying(r#"{"ok":true}"#));
        let upload = ResourceUpload {
            mime: "image/png".to_string(),
            filename: "x.png".to_string(),
            data: String::new(),
        };
        let err = client.upload_resource(&upload).unwrap_err();
        assert!(matches!(err, ApiError::MissingField { field: "filename", .. }));
    }

    #[test]
    fn test_label_and_table() {
        let client = ApiClient::new(CannedTransport::replying(r#"{"t9n":"Ausblenden"}"#));
        assert_eq!(client.label("hide").unwrap(), "Ausblenden");
        let (path, _) = client.transport().last.borrow().clone().unwrap();
        assert_eq!(path, "/api/t9n?which=hide");

        let client = ApiClient::new(CannedTransport::replying(
            r#"{"t9n":{"hide":"Hide","show":"Show"}}"#,
        ));
        let table = client.labels().unwrap();
        assert_eq!(table.get("show").map(String::as_str), Some("Show"));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let client = ApiClient::new(CannedTransport::replying("<html>"));
        let err = client.labels().unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == LABEL_TABLE_PATH));
    }

    #[test]
    fn test_transport_failure_names_path() {
        let client = ApiClient::new(DownTransport);
        let err = client.draft("7").unwrap_err();
        assert_eq!(err.to_string(), "request to /api/draft?id=7 failed");
    }
}
