//! Gift recommendation route handlers.
//!
//! Both endpoints funnel into the advisor. When the model is unreachable
//! the response is still 200 with a friendly fallback suggestion - the
//! shopper never sees a gateway error for a gift idea.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Shown when the advisor is unavailable.
pub const FALLBACK_SUGGESTION: &str =
    "Our gift advisor is taking a short break. In the meantime, the \
     top-rated products in the catalog are always safe picks - sort by \
     rating and choose something in your budget.";

// =============================================================================
// Request / Response Types
// =============================================================================

/// Free-text chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Structured quiz answers.
#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub occasion: String,
    pub recipient: String,
    #[serde(default)]
    pub interests: Vec<String>,
    pub budget: Option<String>,
}

/// A gift suggestion.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub suggestion: String,
    /// True when the advisor was unavailable and the suggestion is the
    /// canned fallback.
    pub fallback: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Free-text gift request.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<RecommendResponse>> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message is required".to_owned()));
    }

    Ok(Json(advise(&state, message).await))
}

/// Structured quiz request.
pub async fn quiz(
    State(state): State<AppState>,
    Json(body): Json<QuizRequest>,
) -> Result<Json<RecommendResponse>> {
    if body.occasion.trim().is_empty() || body.recipient.trim().is_empty() {
        return Err(AppError::BadRequest(
            "occasion and recipient are required".to_owned(),
        ));
    }

    Ok(Json(advise(&state, &quiz_message(&body)).await))
}

// =============================================================================
// Helpers
// =============================================================================

/// Run the advisor over the current catalog, degrading to the fallback.
async fn advise(state: &AppState, message: &str) -> RecommendResponse {
    let catalog = state.store().products();

    match state.advisor().recommend(&catalog, message).await {
        Ok(suggestion) => RecommendResponse {
            suggestion,
            fallback: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "gift advisor unavailable, serving fallback");
            RecommendResponse {
                suggestion: FALLBACK_SUGGESTION.to_owned(),
                fallback: true,
            }
        }
    }
}

/// Flatten quiz answers into a chat message.
fn quiz_message(quiz: &QuizRequest) -> String {
    let mut message = format!(
        "I'm looking for a {} gift for {}.",
        quiz.occasion.trim(),
        quiz.recipient.trim()
    );

    let interests: Vec<&str> = quiz
        .interests
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !interests.is_empty() {
        message.push_str(&format!(" They're into {}.", interests.join(", ")));
    }

    if let Some(budget) = quiz.budget.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        message.push_str(&format!(" My budget is around {budget}."));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_message_includes_all_answers() {
        let quiz = QuizRequest {
            occasion: "birthday".to_owned(),
            recipient: "my sister".to_owned(),
            interests: vec!["hiking".to_owned(), "coffee".to_owned()],
            budget: Some("$30".to_owned()),
        };

        let message = quiz_message(&quiz);
        assert_eq!(
            message,
            "I'm looking for a birthday gift for my sister. They're into \
             hiking, coffee. My budget is around $30."
        );
    }

    #[test]
    fn test_quiz_message_skips_empty_sections() {
        let quiz = QuizRequest {
            occasion: "housewarming".to_owned(),
            recipient: "a coworker".to_owned(),
            interests: vec![String::new()],
            budget: None,
        };

        let message = quiz_message(&quiz);
        assert_eq!(
            message,
            "I'm looking for a housewarming gift for a coworker."
        );
    }
}
