use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::db::queries::questions;
use crate::server::app::AppState;
use crate::server::deserializers::deserialize_opt_string_from_any;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::pagination::page_window;

use super::{category_map, PageQuery};

/// Body of `POST /questions`. A non-empty `searchTerm` selects the search
/// branch; otherwise all four creation fields are required. `difficulty` and
/// `category` arrive from the form as strings.
#[derive(Deserialize)]
struct QuestionBody {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_string_from_any")]
    category: Option<String>,
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<Value>> {
    let Query(PageQuery { page }) = page.map_err(|_| ApiError::BadRequest)?;

    let selection = questions::get_all_questions(&pool).await?;
    let current = page_window(&selection, page);
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = category_map(&pool).await?;
    Ok(Json(json!({
        "success": true,
        "questions": current,
        "total_questions": selection.len(),
        "categories": categories,
        "current_category": Value::Null,
    })))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    question_id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Value>> {
    let Path(question_id) = question_id.map_err(|_| ApiError::NotFound)?;

    if questions::get_question(&pool, question_id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    questions::delete_question(&pool, question_id).await?;
    let total = questions::count_questions(&pool).await?;

    Ok(Json(json!({
        "success": true,
        "deleted_question": question_id,
        "total_questions": total,
    })))
}

// Anything that goes wrong while creating or searching collapses to 422, as
// the frontend expects a single failure code from this endpoint. Keep the
// detail in the logs, at least.
fn unprocessable(err: impl std::fmt::Display) -> ApiError {
    tracing::warn!("POST /questions failed: {err}");
    ApiError::Unprocessable
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    page: Result<Query<PageQuery>, QueryRejection>,
    body: Result<Json<QuestionBody>, JsonRejection>,
) -> ApiResponse<Json<Value>> {
    let Query(PageQuery { page }) = page.map_err(|_| ApiError::BadRequest)?;
    let Json(body) = body.map_err(unprocessable)?;

    match body.search_term.as_deref() {
        Some(term) if !term.is_empty() => {
            let selection = questions::search_questions(&pool, term)
                .await
                .map_err(unprocessable)?;
            let current = page_window(&selection, page);
            // Quirk kept from the original contract: the reported total is
            // the whole table, not the matching set.
            let total = questions::count_questions(&pool)
                .await
                .map_err(unprocessable)?;
            Ok(Json(json!({
                "questions": current,
                "total_questions": total,
            })))
        }
        _ => {
            let question = body.question.ok_or(ApiError::Unprocessable)?;
            let answer = body.answer.ok_or(ApiError::Unprocessable)?;
            let difficulty = body.difficulty.ok_or(ApiError::Unprocessable)?;
            let category = body.category.ok_or(ApiError::Unprocessable)?;

            let id = questions::create_question(&pool, &question, &answer, difficulty, &category)
                .await
                .map_err(unprocessable)?;
            let selection = questions::get_all_questions(&pool)
                .await
                .map_err(unprocessable)?;
            let current = page_window(&selection, page);
            Ok(Json(json!({
                "success": true,
                "new_question": id,
                "questions": current,
                "total_questions": selection.len(),
            })))
        }
    }
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}
