//! POST /generate-pdf

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Router,
};
use rakshak_common::llm::{GenerationOptions, LlmError};
use tracing::info;

use crate::pdf::render_statement;
use crate::prompt::{build_prompt, MAX_WORDS};
use crate::{ApiError, ApiResult, AppState};

const MAX_OUTPUT_TOKENS: u32 = 2000;
const CONTENT_DISPOSITION: &str = "attachment; filename=\"worker_statement.pdf\"";

/// Form fields of a statement request
#[derive(Debug, Default)]
struct StatementForm {
    explanation: Option<String>,
    proof: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> ApiResult<StatementForm> {
    let mut form = StatementForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let slot = match field.name() {
            Some("explanation") => &mut form.explanation,
            Some("proof") => &mut form.proof,
            _ => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        *slot = Some(text);
    }

    Ok(form)
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("form field '{}' is required", name)))
}

/// POST /generate-pdf
///
/// Multipart form with `explanation` and `proof`; answers with the PDF as
/// an attachment.
pub async fn generate_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let form = read_form(multipart).await?;
    let explanation = required(form.explanation, "explanation")?;
    let proof = required(form.proof, "proof")?;

    let prompt = build_prompt(&explanation, &proof, MAX_WORDS);
    let options = GenerationOptions {
        temperature: 0.0,
        max_output_tokens: MAX_OUTPUT_TOKENS,
        timeout: Some(state.timeout),
    };

    let generation = state.client.generate(&prompt, &options).await?;
    let text = generation
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LlmError::Parse("model reply had no text".to_string()))?;

    let pdf = render_statement(&text)?;
    info!(bytes = pdf.len(), "Worker statement generated");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, CONTENT_DISPOSITION),
        ],
        pdf,
    ))
}

pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate-pdf", post(generate_pdf))
}
