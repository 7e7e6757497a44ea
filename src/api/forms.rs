// Upload form and document generation. The contract is deliberately
// browser-first: every failure redirects back to the form with a transient
// notice, success streams the generated document as an attachment.
use crate::config::Config;
use crate::populate::compose_document;
use crate::records::{read_records, RecordError};
use crate::state::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Local;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub notice: Option<String>,
}

pub async fn healthz() -> Response {
    axum::Json(serde_json::json!({ "ok": true })).into_response()
}

pub async fn index(Query(query): Query<IndexQuery>) -> Html<String> {
    let notice = match query.notice.as_deref() {
        Some(message) if !message.trim().is_empty() => {
            format!(r#"<p class="notice">{}</p>"#, escape_html(message))
        }
        _ => String::new(),
    };
    Html(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>ARN Change Form Generator</title></head>
<body>
<h1>ARN Change Form Generator</h1>
{notice}
<form method="post" action="/upload" enctype="multipart/form-data">
  <input type="file" name="file" accept=".xlsx,.xls">
  <button type="submit">Generate document</button>
</form>
</body>
</html>
"#
    ))
}

pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let upload = match next_file_field(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return notice_redirect("No file selected"),
        Err(response) => return response,
    };

    let extension = Path::new(&upload.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return notice_redirect("Please upload a valid Excel file (.xlsx or .xls)");
    }

    let temp_excel = std::env::temp_dir().join(format!(
        "arnform_upload_{}.{extension}",
        Uuid::new_v4().simple()
    ));
    if let Err(err) = tokio::fs::write(&temp_excel, &upload.data).await {
        warn!("failed to persist upload: {err}");
        return notice_redirect("Error processing file. Please try again.");
    }

    let config = state.config.clone();
    let excel_path = temp_excel.clone();
    let result =
        tokio::task::spawn_blocking(move || process_spreadsheet(&config, &excel_path)).await;

    // Best-effort cleanup on every path; a locked file is not worth failing for.
    if let Err(err) = tokio::fs::remove_file(&temp_excel).await {
        debug!("could not remove temp upload {}: {err}", temp_excel.display());
    }

    match result {
        Ok(Ok(generated)) => attachment_response(generated),
        Ok(Err(message)) => notice_redirect(&message),
        Err(err) => {
            warn!("document generation task failed: {err}");
            notice_redirect("Error processing the document. Please try again.")
        }
    }
}

struct UploadedFile {
    filename: String,
    data: Vec<u8>,
}

struct GeneratedDocument {
    filename: String,
    data: Vec<u8>,
    pages: usize,
}

async fn next_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!("multipart read failed: {err}");
                return Err(notice_redirect("Upload failed. Please try again."));
            }
        };
        let Some(filename) = field.file_name().map(|name| name.to_string()) else {
            continue;
        };
        if filename.is_empty() {
            return Ok(None);
        }
        let data = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                warn!("upload body read failed: {err}");
                return Err(notice_redirect(
                    "Upload failed. The file may exceed the 16 MiB limit.",
                ));
            }
        };
        return Ok(Some(UploadedFile { filename, data }));
    }
}

/// The synchronous pipeline: spreadsheet → records → composed document.
/// Errors are already user-facing messages.
fn process_spreadsheet(config: &Config, excel_path: &Path) -> Result<GeneratedDocument, String> {
    let records = read_records(excel_path, &config.defaults).map_err(|err| match err {
        RecordError::Unreadable(detail) => {
            warn!("spreadsheet unreadable: {detail}");
            "Could not read the Excel file. Please check the file format.".to_string()
        }
        RecordError::NoRecords => "No data rows found in the Excel file.".to_string(),
    })?;

    let template = PathBuf::from(config.templates.active_path());
    let (document, pages) = compose_document(&template, &records).map_err(|err| {
        warn!("population failed: {err}");
        "Error processing the document. Please try again.".to_string()
    })?;
    let data = document.to_bytes().map_err(|err| {
        warn!("serialization failed: {err}");
        "Error processing the document. Please try again.".to_string()
    })?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(GeneratedDocument {
        filename: format!("Populated_ARN_Form_{timestamp}.docx"),
        data,
        pages,
    })
}

fn attachment_response(generated: GeneratedDocument) -> Response {
    debug!(
        "sending {} ({} page(s), {} bytes)",
        generated.filename,
        generated.pages,
        generated.data.len()
    );
    let mut response = (StatusCode::OK, generated.data).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DOCX_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        generated.filename
    )) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

fn notice_redirect(message: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("/?notice={encoded}")).into_response()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_redirect_targets_index_with_encoded_message() {
        let response = notice_redirect("No file selected");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/?notice=No+file+selected");
    }

    #[test]
    fn html_notice_is_escaped() {
        let escaped = escape_html(r#"<script>"x"</script>"#);
        assert!(!escaped.contains('<'));
        assert!(escaped.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn index_renders_notice_when_present() {
        let page = index(Query(IndexQuery {
            notice: Some("No data rows found".to_string()),
        }))
        .await;
        assert!(page.0.contains("No data rows found"));
        assert!(page.0.contains("multipart/form-data"));
    }
}
