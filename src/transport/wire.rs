use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{TransportError, TransportResult};
use crate::session::{Dimensions, EditOperation, EditedImage, ResetImage, UploadedFile};

const UPLOAD_FAILED: &str = "upload failed";
const EDIT_FAILED: &str = "edit failed";
const RESET_FAILED: &str = "reset failed";

#[derive(Debug, Serialize)]
pub(super) struct EditRequest<'a> {
    pub(super) filename: &'a str,
    pub(super) operation: EditOperation,
}

#[derive(Debug, Serialize)]
pub(super) struct ResetRequest<'a> {
    pub(super) original_filename: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UploadReply {
    #[serde(default)]
    success: bool,
    filename: Option<String>,
    original_name: Option<String>,
    url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EditReply {
    #[serde(default)]
    success: bool,
    edited_filename: Option<String>,
    edited_url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResetReply {
    #[serde(default)]
    success: bool,
    filename: Option<String>,
    reset_url: Option<String>,
    error: Option<String>,
}

/// A body that is not JSON is a status failure when the status is not 2xx,
/// otherwise a decode failure.
pub(super) fn decode_reply<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &str,
) -> TransportResult<T> {
    serde_json::from_str(body).map_err(|err| {
        if (200..300).contains(&status) {
            TransportError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Status {
                endpoint: endpoint.to_string(),
                status,
            }
        }
    })
}

fn reported(endpoint: &str, error: Option<String>, fallback: &str) -> TransportError {
    TransportError::ServerReported {
        endpoint: endpoint.to_string(),
        message: error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    }
}

fn required<T>(endpoint: &str, field: &'static str, value: Option<T>) -> TransportResult<T> {
    value.ok_or_else(|| TransportError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("missing field `{field}`"),
    })
}

impl UploadReply {
    pub(super) fn into_uploaded(self, endpoint: &str) -> TransportResult<UploadedFile> {
        if !self.success {
            return Err(reported(endpoint, self.error, UPLOAD_FAILED));
        }
        Ok(UploadedFile {
            filename: required(endpoint, "filename", self.filename)?,
            original_name: required(endpoint, "original_name", self.original_name)?,
            url: required(endpoint, "url", self.url)?,
        })
    }
}

impl EditReply {
    pub(super) fn into_edited(self, endpoint: &str) -> TransportResult<EditedImage> {
        if !self.success {
            return Err(reported(endpoint, self.error, EDIT_FAILED));
        }
        Ok(EditedImage {
            filename: required(endpoint, "edited_filename", self.edited_filename)?,
            url: required(endpoint, "edited_url", self.edited_url)?,
            dimensions: Dimensions::new(
                required(endpoint, "width", self.width)?,
                required(endpoint, "height", self.height)?,
            ),
        })
    }
}

impl ResetReply {
    pub(super) fn into_reset(self, endpoint: &str) -> TransportResult<ResetImage> {
        if !self.success {
            return Err(reported(endpoint, self.error, RESET_FAILED));
        }
        Ok(ResetImage {
            filename: required(endpoint, "filename", self.filename)?,
            url: required(endpoint, "reset_url", self.reset_url)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_success_maps_all_fields() {
        let body = r#"{"success":true,"filename":"9f.png","original_name":"photo.png","url":"/static/uploads/9f.png"}"#;
        let reply: UploadReply = decode_reply("/upload", 200, body).unwrap();

        assert_eq!(
            reply.into_uploaded("/upload").unwrap(),
            UploadedFile {
                filename: "9f.png".to_string(),
                original_name: "photo.png".to_string(),
                url: "/static/uploads/9f.png".to_string(),
            }
        );
    }

    #[test]
    fn error_payload_on_bad_request_is_server_reported() {
        let body = r#"{"error":"unsupported file type"}"#;
        let reply: UploadReply = decode_reply("/upload", 400, body).unwrap();

        match reply.into_uploaded("/upload") {
            Err(TransportError::ServerReported { message, .. }) => {
                assert_eq!(message, "unsupported file type");
            }
            other => panic!("expected server-reported error, got {other:?}"),
        }
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let reply: EditReply = decode_reply("/edit", 200, r#"{"success":false}"#).unwrap();
        match reply.into_edited("/edit") {
            Err(TransportError::ServerReported { message, .. }) => assert_eq!(message, EDIT_FAILED),
            other => panic!("expected server-reported error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_depends_on_status() {
        let err = decode_reply::<ResetReply>("/reset", 502, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502, .. }));

        let err = decode_reply::<ResetReply>("/reset", 200, "not json").unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }

    #[test]
    fn success_missing_fields_is_a_decode_error() {
        let reply: EditReply =
            decode_reply("/edit", 200, r#"{"success":true,"edited_filename":"e.png"}"#).unwrap();
        match reply.into_edited("/edit") {
            Err(TransportError::Decode { message, .. }) => {
                assert_eq!(message, "missing field `edited_url`");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn edit_request_serializes_operation_tag() {
        let body = serde_json::to_value(EditRequest {
            filename: "a.png",
            operation: EditOperation::RotateLeft,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"filename": "a.png", "operation": "rotate_left"})
        );
    }

    #[test]
    fn reset_reply_maps_url() {
        let body = r#"{"success":true,"filename":"orig.png","reset_url":"/static/uploads/orig.png"}"#;
        let reply: ResetReply = decode_reply("/reset", 200, body).unwrap();
        assert_eq!(
            reply.into_reset("/reset").unwrap(),
            ResetImage {
                filename: "orig.png".to_string(),
                url: "/static/uploads/orig.png".to_string(),
            }
        );
    }
}
