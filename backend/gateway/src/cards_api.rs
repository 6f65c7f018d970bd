//! Card API handlers: upload + extraction, context + summary
//! generation, listing and lookup.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use cardforge_core::{CardContext, CardError, CardRecord};
use cardforge_illustration::summary_prompt;
use media::{capture_time, image_extension};

use crate::error::ApiError;
use crate::server::AppState;

/// A card record as returned over the API, with image names expanded
/// into servable URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub company_logo_description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub meeting_context: String,
    pub priorities: String,
    pub personal_notes: String,
    pub captured_at: String,
    pub source_image_url: Option<String>,
    pub summary_image_url: Option<String>,
    pub raw_ocr_json: String,
}

impl CardResponse {
    fn from_record(record: &CardRecord) -> Self {
        Self {
            id: record.id.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            company: record.company.clone(),
            company_logo_description: record.company_logo_description.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            meeting_context: record.meeting_context.clone(),
            priorities: record.priorities.clone(),
            personal_notes: record.personal_notes.clone(),
            captured_at: record.captured_at.clone(),
            source_image_url: media_url(&record.source_image),
            summary_image_url: media_url(&record.summary_image),
            raw_ocr_json: record.raw_ocr_json.clone(),
        }
    }
}

fn media_url(filename: &str) -> Option<String> {
    if filename.is_empty() {
        None
    } else {
        Some(format!("/media/{filename}"))
    }
}

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cardforge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/cards — upload a card photo, extract contact fields, and
/// persist a new record.
pub async fn upload_card(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CardResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| CardError::EmptyUpload)?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().map(ToString::to_string);
            let mime_type = field.content_type().unwrap_or("image/png").to_string();
            let bytes = field.bytes().await.map_err(|_| CardError::EmptyUpload)?;
            upload = Some((filename, mime_type, bytes));
            break;
        }
    }

    let Some((filename, mime_type, image_bytes)) = upload else {
        return Err(CardError::EmptyUpload.into());
    };
    if image_bytes.is_empty() {
        return Err(CardError::EmptyUpload.into());
    }

    let captured_at = capture_time(&image_bytes).to_rfc3339();
    let extracted = state.extractor.extract(&image_bytes, &mime_type).await?;

    let card_id = Uuid::new_v4().to_string();
    let ext = image_extension(filename.as_deref());
    let source_image = state
        .images
        .save(&format!("{card_id}_source{ext}"), &image_bytes)
        .await?;

    let record = CardRecord {
        id: card_id,
        first_name: extracted.first_name.clone(),
        last_name: extracted.last_name.clone(),
        company: extracted.company.clone(),
        company_logo_description: extracted.company_logo_description.clone(),
        email: extracted.email.clone(),
        phone: extracted.phone.clone(),
        address: extracted.address.clone(),
        meeting_context: String::new(),
        priorities: String::new(),
        personal_notes: String::new(),
        captured_at,
        source_image,
        summary_image: String::new(),
        raw_ocr_json: extracted.to_json(),
    };
    state.cards.append(record.clone())?;

    info!(id = %record.id, "Card uploaded and extracted");
    Ok(Json(CardResponse::from_record(&record)))
}

/// POST /api/cards/{id}/context — save meeting context and generate the
/// summary illustration.
pub async fn save_context(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    Json(payload): Json<CardContext>,
) -> Result<Json<CardResponse>, ApiError> {
    let record = state.cards.update(&card_id, |r| {
        r.meeting_context = payload.meeting_context.clone();
        r.priorities = payload.priorities.clone();
        r.personal_notes = payload.personal_notes.clone();
    })?;

    let prompt = summary_prompt(&record, &payload);
    let image = state.illustrator.generate(&prompt).await?;
    let summary_image = state
        .images
        .save(&format!("{card_id}_summary.png"), &image)
        .await?;

    let record = state
        .cards
        .update(&card_id, |r| r.summary_image = summary_image.clone())?;

    info!(id = %card_id, "Context saved and summary generated");
    Ok(Json(CardResponse::from_record(&record)))
}

/// GET /api/cards — list all records.
pub async fn list_cards(
    State(state): State<AppState>,
) -> Result<Json<Vec<CardResponse>>, ApiError> {
    let records = state.cards.list()?;
    Ok(Json(records.iter().map(CardResponse::from_record).collect()))
}

/// GET /api/cards/{id} — fetch a single record.
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<CardResponse>, ApiError> {
    let record = state
        .cards
        .get(&card_id)?
        .ok_or(CardError::NotFound(card_id))?;
    Ok(Json(CardResponse::from_record(&record)))
}

/// GET / — the front-end entry point, when a bundle is present.
pub async fn serve_index(State(state): State<AppState>) -> Response {
    let not_built = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Frontend not built yet." })),
        )
            .into_response()
    };

    let Some(dir) = state.frontend_dir else {
        return not_built();
    };
    match tokio::fs::read(dir.join("index.html")).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => not_built(),
    }
}
