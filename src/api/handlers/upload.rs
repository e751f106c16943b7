use crate::AppState;
use crate::api::error::AppError;
use crate::models::NewImage;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::Method,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};
use utoipa::ToSchema;

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";
pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const ONLY_POST_MESSAGE: &str = "Only POST allowed";

/// Name of the multipart part carrying the file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

struct FilePart {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

#[utoipa::path(
    post,
    path = "/upload_image/",
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file uploaded"),
        (status = 405, description = "Only POST allowed"),
        (status = 500, description = "Storage failure")
    ),
    tag = "upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<UploadResponse>, AppError> {
    if request.method() != Method::POST {
        return Err(AppError::MethodNotAllowed(ONLY_POST_MESSAGE.to_string()));
    }

    let Some(part) = read_file_part(&state, request).await? else {
        return Err(AppError::BadRequest(NO_FILE_MESSAGE.to_string()));
    };

    let size = part.data.len();
    let record = state
        .images
        .create(NewImage {
            name: Some(part.file_name),
            data: Some(part.data.to_vec()),
            content_type: part.content_type,
        })
        .await?;

    info!(
        "📸 Stored image #{} '{}' ({} bytes, {})",
        record.id, record.name, size, record.content_type
    );

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        filename: record.name,
    }))
}

/// Pull the `file` part out of a multipart body.
///
/// Bodies that are not multipart at all have no file part. Parts without a
/// filename are plain form fields, not files. When the part is repeated the
/// last one wins.
async fn read_file_part(state: &AppState, request: Request) -> Result<Option<FilePart>, AppError> {
    let mut multipart = match Multipart::from_request(request, state).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Upload request is not multipart: {}", rejection);
            return Ok(None);
        }
    };

    let mut file_part = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await?;

        file_part = Some(FilePart {
            file_name,
            content_type,
            data,
        });
    }

    Ok(file_part)
}
