//! HTTP front end.
//!
//! Axum router exposing the generator over five endpoints:
//! - `GET /` HTML form
//! - `GET /qr/{text}` PNG image
//! - `POST /generate` HTML page with an embedded image
//! - `GET /qr-json/{text}` JSON with a data URL
//! - `POST /qr-advanced` PNG or SVG with custom size, margin and colors
//!
//! Each request maps to exactly one `encode` + `render` pair. Path parameters
//! arrive percent-decoded from the extractor.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Form, Json, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::error::{EncodingError, RenderError};
use crate::render::{OutputImage, OutputKind, RenderOptions};
use crate::{encode, pages, render, QrCodeEcc};

/// Endpoint defaults.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub level: QrCodeEcc,
    /// Quiet zone in modules.
    pub margin: u32,
    /// Target width for `/qr`, `/qr-json` and `/qr-advanced`.
    pub image_width: u32,
    /// Target width for the image embedded by `/generate`.
    pub page_width: u32,
    pub dark_color: String,
    pub light_color: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            level: QrCodeEcc::Medium,
            margin: 2,
            image_width: 300,
            page_width: 400,
            dark_color: "#000000".to_string(),
            light_color: "#FFFFFF".to_string(),
        }
    }
}

impl ServiceConfig {
    fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .margin(self.margin)
            .colors(self.dark_color.clone(), self.light_color.clone())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Text is required")]
    MissingText,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported error correction level: {0}")]
    UnsupportedLevel(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Encoding(EncodingError::Internal(_)) | ServiceError::Render(RenderError::Png(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "Error generating QR code");
        } else {
            tracing::warn!(error = %self, "Rejected QR code request");
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        self.log();
        let body = match &self {
            ServiceError::MissingText => json!({ "error": self.to_string() }),
            _ => json!({ "error": "Failed to generate QR code", "detail": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Same as [`ServiceError`] but answered as plain text, for the HTML endpoint.
#[derive(Debug)]
pub struct PlainError(ServiceError);

impl From<ServiceError> for PlainError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PlainError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = match &self.0 {
            ServiceError::MissingText => self.0.to_string(),
            other => format!("Failed to generate QR code: {other}"),
        };
        (self.0.status(), body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrJsonResponse {
    pub text: String,
    pub qr_code: String,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub size: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub margin: Option<u32>,
    pub dark_color: Option<String>,
    pub light_color: Option<String>,
    pub format: Option<String>,
    pub error_correction_level: Option<String>,
}

/// Accepts a JSON number or a numeric string.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => u32::try_from(n).map(Some).map_err(de::Error::custom),
        Some(NumberOrString::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

type SharedConfig = Arc<ServiceConfig>;

/// Builds the router with all endpoints.
pub fn build_router(config: ServiceConfig) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/qr/{text}", get(qr_image_handler))
        .route("/generate", post(generate_handler))
        .route("/qr-json/{text}", get(qr_json_handler))
        .route("/qr-advanced", post(qr_advanced_handler))
        .with_state(Arc::new(config))
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, config: ServiceConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("QR Code Generator server running at http://{}", listener.local_addr()?);
    tracing::info!("Available endpoints:");
    tracing::info!("  GET  /                    - HTML form interface");
    tracing::info!("  GET  /qr/{{text}}          - Generate QR code image");
    tracing::info!("  POST /generate            - Generate QR code from form");
    tracing::info!("  GET  /qr-json/{{text}}     - Get QR code as JSON");
    tracing::info!("  POST /qr-advanced         - Advanced QR code generation");

    axum::serve(listener, build_router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Server shutting down");
}

fn generate(
    text: &str,
    level: QrCodeEcc,
    width: u32,
    options: RenderOptions,
) -> Result<OutputImage, ServiceError> {
    let qr = encode(text, level)?;
    let options = options.fit_width(width, &qr);
    tracing::debug!(
        version = qr.version().value(),
        mask = qr.mask().value(),
        module_size = options.module_size,
        "Encoded QR code"
    );
    Ok(render(&qr, &options)?)
}

fn png_base64(text: &str, config: &ServiceConfig, width: u32) -> Result<String, ServiceError> {
    let png = generate(text, config.level, width, config.render_options())?.to_bytes()?;
    Ok(STANDARD.encode(png))
}

async fn index_handler() -> Html<String> {
    Html(pages::index_page())
}

async fn qr_image_handler(
    State(config): State<SharedConfig>,
    Path(text): Path<String>,
) -> Result<Response, ServiceError> {
    let image = generate(&text, config.level, config.image_width, config.render_options())?;
    let bytes = image.to_bytes()?;
    let disposition = format!("inline; filename=\"qr-{}.png\"", Utc::now().timestamp_millis());
    Ok((
        [
            (header::CONTENT_TYPE, image.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn generate_handler(
    State(config): State<SharedConfig>,
    Form(form): Form<GenerateForm>,
) -> Result<Html<String>, PlainError> {
    let text = form.text.filter(|t| !t.is_empty()).ok_or(ServiceError::MissingText)?;
    let image = png_base64(&text, &config, config.page_width)?;
    Ok(Html(pages::result_page(&text, &image)))
}

async fn qr_json_handler(
    State(config): State<SharedConfig>,
    Path(text): Path<String>,
) -> Result<Json<QrJsonResponse>, ServiceError> {
    let image = png_base64(&text, &config, config.image_width)?;
    Ok(Json(QrJsonResponse {
        text,
        qr_code: format!("data:image/png;base64,{image}"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn qr_advanced_handler(
    State(config): State<SharedConfig>,
    Json(req): Json<AdvancedRequest>,
) -> Result<Response, ServiceError> {
    let text = req.text.filter(|t| !t.is_empty()).ok_or(ServiceError::MissingText)?;

    let format = req.format.unwrap_or_else(|| "png".to_string());
    let kind: OutputKind = format
        .parse()
        .map_err(|_| ServiceError::UnsupportedFormat(format.clone()))?;
    let level = match req.error_correction_level {
        Some(level) => level.parse().map_err(|_| ServiceError::UnsupportedLevel(level))?,
        None => config.level,
    };

    let options = RenderOptions::default()
        .margin(req.margin.unwrap_or(config.margin))
        .colors(
            req.dark_color.unwrap_or_else(|| config.dark_color.clone()),
            req.light_color.unwrap_or_else(|| config.light_color.clone()),
        )
        .kind(kind);
    let image = generate(&text, level, req.size.unwrap_or(config.image_width), options)?;
    let bytes = image.to_bytes()?;
    Ok(([(header::CONTENT_TYPE, image.content_type())], bytes).into_response())
}
