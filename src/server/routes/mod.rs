mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

use std::collections::BTreeMap;

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::get_all_categories;
use crate::server::error::ApiResponse;

/// `{"<id>": "<type>", ...}` mapping the frontend renders the sidebar from.
pub(crate) async fn category_map(pool: &SqlitePool) -> ApiResponse<BTreeMap<String, String>> {
    let categories = get_all_categories(pool).await?;
    Ok(categories
        .into_iter()
        .map(|c| (c.id.to_string(), c.kind))
        .collect())
}

#[derive(Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}
