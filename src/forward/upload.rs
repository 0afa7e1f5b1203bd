//! Assembly of the outbound multipart upload.
//!
//! The body is built in browser-compatible form: the binary part carries a
//! `Content-Disposition` with file name plus a `Content-Type`, text parts
//! carry only their `Content-Disposition`. Two non-standard headers,
//! `fileName` and `mimeType`, ride on the request itself.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::multipart::{Form, Part};

use crate::config::{FormField, UpstreamConfig};
use crate::forward::payload::SourcePayload;

/// Request header carrying the upstream's notion of the file name.
pub const FILE_NAME_HEADER: HeaderName = HeaderName::from_static("filename");

/// Request header carrying the file's MIME type.
pub const MIME_TYPE_HEADER: HeaderName = HeaderName::from_static("mimetype");

/// Everything that goes into the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    /// Field name of the binary part.
    pub file_field: String,
    /// Declared file name of the binary part.
    pub file_name: String,
    /// Declared content type of the binary part.
    pub mime_type: String,
    pub payload: Vec<u8>,
    /// Text fields, in wire order.
    pub fields: Vec<FormField>,
}

impl UploadDescriptor {
    /// Build the multipart form. The binary part goes first, then the text
    /// fields in their configured order.
    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let file = Part::bytes(self.payload)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)?;

        let form = self
            .fields
            .into_iter()
            .fold(Form::new().percent_encode_noop().part(self.file_field, file), |form, field| {
                form.text(field.name, field.value)
            });
        Ok(form)
    }
}

/// A fully described POST to the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    /// Value of the `fileName` header.
    pub file_name_header: String,
    /// Value of the `mimeType` header.
    pub mime_type_header: String,
    pub upload: UploadDescriptor,
}

impl UploadRequest {
    /// Pair a freshly loaded payload with the upstream settings.
    pub fn new(upstream: &UpstreamConfig, declared_file_name: &str, payload: SourcePayload) -> Self {
        Self {
            url: upstream.url.clone(),
            file_name_header: upstream.file_name_header.clone(),
            mime_type_header: upstream.mime_type.clone(),
            upload: UploadDescriptor {
                file_field: upstream.file_field.clone(),
                file_name: declared_file_name.to_string(),
                mime_type: upstream.mime_type.clone(),
                payload: payload.bytes,
                fields: upstream.fields.clone(),
            },
        }
    }

    /// The transport-level headers sent alongside the multipart body.
    pub fn headers(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(FILE_NAME_HEADER, HeaderValue::from_str(&self.file_name_header)?);
        headers.insert(MIME_TYPE_HEADER, HeaderValue::from_str(&self.mime_type_header)?);
        Ok(headers)
    }
}
