//! Outbound multipart payloads.

use reqwest::multipart::Form;
use url::Url;

use crate::forward::Upload;

/// A multipart request addressed to one downstream endpoint.
///
/// Every upload is sent under the same field name, in the order given.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    url: Url,
    field: String,
    uploads: Vec<Upload>,
}

impl ForwardRequest {
    pub fn new(url: Url, field: impl Into<String>, uploads: Vec<Upload>) -> Self {
        Self {
            url,
            field: field.into(),
            uploads,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    /// Total payload size in bytes, excluding multipart framing.
    pub fn payload_bytes(&self) -> usize {
        self.uploads.iter().map(Upload::len).sum()
    }

    /// Split into the target URL and the multipart form.
    pub fn into_form(self) -> (Url, Form) {
        let ForwardRequest { url, field, uploads } = self;
        let form = uploads
            .into_iter()
            .fold(Form::new(), |form, upload| form.part(field.clone(), upload.into_part()));
        (url, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, data: &'static [u8]) -> Upload {
        Upload::new(Some(name.to_string()), Some("image/jpeg".to_string()), data)
    }

    #[test]
    fn test_preserves_order_and_counts_bytes() {
        let url = Url::parse("http://127.0.0.1:9/predict_batch").unwrap();
        let request = ForwardRequest::new(
            url.clone(),
            "files",
            vec![upload("a.jpg", b"aaaa"), upload("b.jpg", b"bb"), upload("c.jpg", b"c")],
        );

        let names: Vec<_> = request.uploads().iter().map(Upload::filename).collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(request.payload_bytes(), 7);
        assert_eq!(request.field(), "files");

        let (target, form) = request.into_form();
        assert_eq!(target, url);
        assert!(!form.boundary().is_empty());
    }
}
