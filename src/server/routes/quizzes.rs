use std::collections::HashSet;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::db::queries::questions::{get_all_questions, get_questions_for_category};
use crate::db::Question;
use crate::server::app::{AppState, RandomPicker};
use crate::server::deserializers::LooseId;
use crate::server::error::{ApiError, ApiResponse};
use crate::telemetry::QUIZ_CNTR;

#[derive(Deserialize, Default)]
struct QuizBody {
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<LooseId>>,
}

#[derive(Deserialize, Default)]
struct QuizCategory {
    #[serde(default)]
    id: Option<LooseId>,
}

/// Picks one random question out of the quiz scope. An exhausted scope is a
/// valid terminal state and answers with `question: null`.
async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(picker): State<RandomPicker>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResponse<Json<Value>> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest)?;

    // category id 0 means "all", same as the frontend's truthiness test
    let category_id = body
        .quiz_category
        .and_then(|c| c.id)
        .map(|id| id.0)
        .filter(|id| *id != 0);
    let previous: HashSet<i64> = body
        .previous_questions
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.0)
        .collect();

    let selection = match category_id {
        Some(id) => get_questions_for_category(&pool, &id.to_string()).await?,
        None => get_all_questions(&pool).await?,
    };
    let eligible: Vec<Question> = selection
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();

    let question = match eligible.len() {
        0 => Value::Null,
        len => {
            let label = category_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "all".to_owned());
            QUIZ_CNTR.with_label_values(&[label.as_str()]).inc();
            json!(eligible[picker.pick(len)])
        }
    };

    Ok(Json(json!({ "question": question })))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
