use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use sqlx::SqlitePool;

use crate::db::queries::categories::get_category;
use crate::db::queries::questions::get_questions_for_category;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResponse};
use crate::server::pagination::page_window;

use super::{category_map, PageQuery};

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<Value>> {
    let categories = category_map(&pool).await?;
    Ok(Json(json!({
        "success": true,
        "categories": categories,
    })))
}

async fn category_questions(
    State(pool): State<SqlitePool>,
    // a non-numeric id never matches a category, same as an unknown one
    category_id: Result<Path<i64>, PathRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResponse<Json<Value>> {
    let Path(category_id) = category_id.map_err(|_| ApiError::NotFound)?;
    let Query(PageQuery { page }) = page.map_err(|_| ApiError::BadRequest)?;

    let category = get_category(&pool, category_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let selection = get_questions_for_category(&pool, &category_id.to_string()).await?;
    let current = page_window(&selection, page);
    if current.is_empty() {
        return Err(ApiError::NotFound);
    }

    let mut current_category = Map::new();
    current_category.insert(category.id.to_string(), Value::String(category.kind.clone()));

    // the count key carries the category name, e.g. "total_Science_questions"
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));
    body.insert("questions".to_owned(), json!(current));
    body.insert(
        format!("total_{}_questions", category.kind),
        json!(selection.len()),
    );
    body.insert("current_category".to_owned(), Value::Object(current_category));
    Ok(Json(Value::Object(body)))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{category_id}/questions", get(category_questions))
        .with_state(state)
}
