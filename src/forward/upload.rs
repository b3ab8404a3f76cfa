//! A single uploaded file, fully buffered.

use axum::body::Bytes;
use reqwest::multipart::Part;

/// Filename used when the client did not send one.
pub const DEFAULT_FILENAME: &str = "unnamed";
/// Content type used when the client did not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One inbound file. Lives only as long as the request that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    filename: String,
    content_type: String,
    data: Bytes,
}

impl Upload {
    pub fn new(filename: Option<String>, content_type: Option<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            data: data.into(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Convert into an outbound multipart part without copying the bytes.
    pub fn into_part(self) -> Part {
        let Upload { filename, content_type, data } = self;
        let len = data.len() as u64;
        let build = |data: Bytes| Part::stream_with_length(data, len).file_name(filename.clone());

        // `Bytes::clone` only bumps a refcount.
        match build(data.clone()).mime_str(&content_type) {
            Ok(part) => part,
            Err(_) => {
                tracing::debug!(%content_type, "Unparseable content type, forwarding part without one");
                build(data)
            }
        }
    }
}
