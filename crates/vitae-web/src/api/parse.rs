use std::path::Path;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use vitae_core::ingest::ReadError;
use vitae_core::{DocumentFormat, ParseResult, RawDocument, EXPORT_FILE_NAME};

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the résumé.
const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse))
        .route("/parse/download", post(download))
}

async fn parse(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseResult>, ApiError> {
    let result = parse_upload(&state, multipart?).await?;
    Ok(Json(result))
}

async fn download(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let result = parse_upload(&state, multipart?).await?;
    let body = result.to_json_pretty().map_err(vitae_core::Error::from)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

async fn parse_upload(state: &AppState, mut multipart: Multipart) -> Result<ParseResult, ApiError> {
    let document = read_document(&mut multipart).await?;
    tracing::info!(format = %document.format, bytes = document.data.len(), "Parsing upload");

    // The upload buffer is consumed here and released once text is extracted.
    Ok(state.parser.parse_document(document).await?)
}

/// Pulls the `file` field out of the form and works out its format.
async fn read_document(multipart: &mut Multipart) -> Result<RawDocument, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let format = upload_format(field.file_name(), field.content_type())?;
        let data = field.bytes().await?;
        return Ok(RawDocument::new(data.to_vec(), format));
    }

    Err(ApiError::bad_upload(format!(
        "missing `{FILE_FIELD}` field in upload"
    )))
}

/// The file name's extension decides when present; otherwise the part's
/// content type.
fn upload_format(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<DocumentFormat, ApiError> {
    let extension = file_name
        .map(Path::new)
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str());

    let format = match extension {
        Some(ext) => DocumentFormat::from_extension(ext)
            .ok_or_else(|| ReadError::UnsupportedFormat(ext.to_lowercase()))?,
        None => content_type
            .and_then(DocumentFormat::from_mime)
            .ok_or_else(|| {
                ReadError::UnsupportedFormat(content_type.unwrap_or("unknown").to_string())
            })?,
    };

    Ok(format)
}
