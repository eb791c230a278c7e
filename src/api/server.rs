//! HTTP server for the paddleload API.
//!
//! # API Endpoints
//!
//! | Method | Path                 | Description                         |
//! |--------|----------------------|-------------------------------------|
//! | GET    | `/api/health`        | Health check                        |
//! | POST   | `/api/import`        | Upload CSV and run the import       |
//! | POST   | `/api/download-csv`  | Reshape a result list into CSV text |
//! | GET    | `/api/logs`          | SSE stream for real-time progress   |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, DownloadRequest, DownloadResponse};
use crate::error::ExportError;
use crate::export::records_to_csv;
use crate::import::{import_bytes, ImportOptions};
use crate::models::ImportResult;

/// Upload size cap: 2 GiB.
const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024 * 1024;

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/import", post(import_csv))
        .route("/api/download-csv", post(download_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 paddleload server running on http://localhost:{}", port);
    println!("   POST /api/import       - Upload CSV and import customers");
    println!("   POST /api/download-csv - Export a result list as CSV");
    println!("   GET  /api/logs         - SSE progress stream");
    println!("   GET  /api/health       - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "paddleload",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// SSE endpoint for real-time progress streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fields accepted by the import multipart form.
#[derive(Default)]
struct ImportForm {
    csv_file: Option<Vec<u8>>,
    file_name: Option<String>,
    api_key: Option<String>,
    is_sandbox: bool,
}

/// Check the upload form before any processing happens.
///
/// Returns the single message of the request-malformed tier, or the upload
/// bytes plus import options when the form is complete.
fn check_form(form: ImportForm) -> Result<(Vec<u8>, ImportOptions), &'static str> {
    let Some(bytes) = form.csv_file else {
        return Err("No CSV file provided");
    };
    let Some(api_key) = form.api_key else {
        return Err("No API key provided");
    };

    let file_name = form.file_name.unwrap_or_default();
    if file_name.is_empty() {
        return Err("No file selected");
    }
    if !file_name.ends_with(".csv") {
        return Err("File must be a CSV");
    }

    Ok((bytes, ImportOptions::new(api_key, form.is_sandbox)))
}

/// Upload a CSV and run the full import pipeline.
async fn import_csv(
    mut multipart: Multipart,
) -> Result<Json<ImportResult>, (StatusCode, Json<Value>)> {
    let mut form = ImportForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        bad_request(&format!("Multipart error: {e}"))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "csv_file" => {
                form.file_name = field.file_name().map(|s| s.to_string());
                form.csv_file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| bad_request(&format!("Read error: {e}")))?
                        .to_vec(),
                );
            }
            "api_key" => {
                form.api_key = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| bad_request(&format!("Read error: {e}")))?,
                );
            }
            "is_sandbox" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(&format!("Read error: {e}")))?;
                form.is_sandbox = text.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let (bytes, options) = check_form(form).map_err(bad_request)?;

    println!("\n📄 NEW IMPORT ({} bytes, {})", bytes.len(), options_env(&options));

    let result = import_bytes(&bytes, &options).await.map_err(|e| {
        eprintln!("❌ Import error: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response(&e.to_string())))
    })?;

    Ok(Json(result))
}

fn options_env(options: &ImportOptions) -> &'static str {
    if options.sandbox {
        "sandbox"
    } else {
        "production"
    }
}

fn bad_request(msg: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(error_response(msg)))
}

/// Reshape a previously-returned result list into downloadable CSV text.
async fn download_csv(
    Json(request): Json<DownloadRequest>,
) -> Result<Json<DownloadResponse>, (StatusCode, Json<Value>)> {
    let csv_content = match records_to_csv(&request.data) {
        Ok(content) => content,
        Err(ExportError::Empty) => String::new(),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(error_response(&e.to_string())),
            ))
        }
    };

    Ok(Json(DownloadResponse {
        csv_content,
        filename: request.kind.filename().to_string(),
    }))
}
