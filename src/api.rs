// src/api.rs
// Axum-based API router for transaksi submit + list + delete
use crate::assets::AssetStore;
use crate::store::{NewTransaction, RecordStore, StoreError};

use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Extension, Multipart, Path};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Uploads larger than this are rejected before they reach the asset store.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
enum ApiError {
    #[error("proof upload missing")]
    MissingProof,

    #[error("no collection document")]
    NoDocument,

    #[error("record not found")]
    RecordNotFound,

    /// A failure while persisting a new record; only the create path
    /// reports "gagal menyimpan".
    #[error("save failed")]
    SaveFailed(StoreError),

    #[error("store error")]
    Store(StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NoDocument => ApiError::NoDocument,
            StoreError::NotFound(_) => ApiError::RecordNotFound,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingProof => (
                StatusCode::BAD_REQUEST,
                "Bukti transfer tidak ditemukan".to_string(),
            ),
            ApiError::NoDocument => (StatusCode::NOT_FOUND, "Data tidak ditemukan".to_string()),
            ApiError::RecordNotFound => (
                StatusCode::NOT_FOUND,
                "Transaksi tidak ditemukan".to_string(),
            ),
            ApiError::SaveFailed(e) => {
                error!("store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Gagal menyimpan transaksi".to_string(),
                )
            }
            ApiError::Store(e) => {
                error!("store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Terjadi kesalahan pada server".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        let body_json = serde_json::json!({ "error": body });
        (status, Json(body_json)).into_response()
    }
}

async fn text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

///////////////////////////////////////////////////////////////////////////
// POST /transaksi
///////////////////////////////////////////////////////////////////////////
async fn submit_transaksi(
    Extension(store): Extension<Arc<dyn RecordStore>>,
    Extension(assets): Extension<AssetStore>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut fields = NewTransaction::default();
    let mut proof: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            // only a real file upload counts as proof; a plain text part
            // with this name is ignored like any other stray field
            "bukti" => {
                if let Some(original_name) = field.file_name().map(str::to_string) {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                    proof = Some((bytes.to_vec(), original_name));
                }
            }
            "nama" => fields.nama = text(field).await?,
            "telepon" => fields.telepon = text(field).await?,
            "alamat" => fields.alamat = text(field).await?,
            "metode" => fields.metode = text(field).await?,
            // form values arrive as text; stored verbatim, never parsed
            "total" => fields.total = JsonValue::String(text(field).await?),
            _ => {}
        }
    }

    let (bytes, original_name) = proof.ok_or(ApiError::MissingProof)?;
    let reference = assets
        .put(&bytes, &original_name)
        .map_err(ApiError::SaveFailed)?;
    let record = store
        .create(fields, &reference)
        .await
        .map_err(ApiError::SaveFailed)?;

    info!("transaksi {} disimpan ({})", record.id, record.bukti);
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Transaksi berhasil disimpan",
            "data": record,
        })),
    ))
}

///////////////////////////////////////////////////////////////////////////
// GET /transaksi
///////////////////////////////////////////////////////////////////////////
async fn list_transaksi(
    Extension(store): Extension<Arc<dyn RecordStore>>,
) -> Result<impl IntoResponse, ApiError> {
    let records = store.list_all().await?;
    Ok((StatusCode::OK, Json(records)))
}

///////////////////////////////////////////////////////////////////////////
// DELETE /transaksi/:id
///////////////////////////////////////////////////////////////////////////
async fn delete_transaksi(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<dyn RecordStore>>,
) -> Result<impl IntoResponse, ApiError> {
    store.delete_by_id(&id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Transaksi berhasil dihapus" })),
    ))
}

///////////////////////////////////////////////////////////////////////////
// GET /health - Basic health check
///////////////////////////////////////////////////////////////////////////
async fn health(
    Extension(store): Extension<Arc<dyn RecordStore>>,
) -> Result<impl IntoResponse, ApiError> {
    match store.list_all().await {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok" })),
        )),
        Err(e) => {
            error!("health: store error: {:?}", e);
            Ok((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "store-unavailable" })),
            ))
        }
    }
}

/// Request logging middleware.
///
/// Logs all HTTP requests with method, path, status, and latency.
async fn logging_middleware<B>(req: Request<B>, next: Next<B>) -> Result<Response, StatusCode> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    info!("{} {} {} - {:.3}s", method, path, status, latency);

    Ok(response)
}

/// Build router for this service (call from run()).
///
/// `/uploads` serves the asset directory and `public_dir` is served at the
/// root, matching the layout the frontend expects.
pub fn router(
    store: Arc<dyn RecordStore>,
    assets: AssetStore,
    public_dir: &std::path::Path,
) -> Router {
    let api_routes = Router::new()
        .route("/transaksi", post(submit_transaksi).get(list_transaksi))
        .route("/transaksi/:id", delete(delete_transaksi))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .merge(api_routes)
        .nest_service("/uploads", ServeDir::new(assets.dir()))
        .fallback_service(ServeDir::new(public_dir))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(store))
        .layer(Extension(assets))
}
