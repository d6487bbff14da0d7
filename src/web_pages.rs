use axum::{
    Json,
    extract::Multipart,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::image_uri::{detect_mime_type, to_image_uri};

const UPLOAD_HTML: &str = include_str!("../templates/upload.html");

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct UploadResponse {
    image_uri: String,
    mime_type: String,
    size: usize,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_HTML)
}

/// Converts an uploaded file to a self-describing image URI. This is the
/// file-to-data-URL boundary; nothing is written to disk.
pub async fn handle_image_upload(mut multipart: Multipart) -> Response {
    let mut content_type = None;
    let mut bytes = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    content_type = field.content_type().map(|value| value.to_string());
                    match field.bytes().await {
                        Ok(data) => {
                            bytes = Some(data);
                        }
                        Err(err) => {
                            return json_error(
                                StatusCode::BAD_REQUEST,
                                &format!("failed to read file: {err}"),
                            );
                        }
                    }
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                return json_error(StatusCode::BAD_REQUEST, &format!("failed to read form: {err}"));
            }
        }
    }

    let bytes = match bytes {
        Some(data) if !data.is_empty() => data,
        _ => return json_error(StatusCode::BAD_REQUEST, "no file uploaded"),
    };

    let mime_type = match detect_mime_type(bytes.as_ref())
        .map(str::to_string)
        .or(content_type)
    {
        Some(mime) if mime.starts_with("image/") => mime,
        _ => return json_error(StatusCode::BAD_REQUEST, "unsupported file type"),
    };

    let image_uri = to_image_uri(&mime_type, bytes.as_ref());
    (
        StatusCode::OK,
        Json(UploadResponse {
            image_uri,
            mime_type,
            size: bytes.len(),
        }),
    )
        .into_response()
}
