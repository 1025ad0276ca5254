//! Category API endpoints

use api_types::category::CategoryView;
use axum::{Json, extract::State};
use engine::Category;

use crate::{ServerError, server::ServerState};

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        icon_name: category.icon_name,
        background_color: category.background_color,
        text_color: category.text_color,
        created_at: category.created_at,
    }
}

/// Handle requests for the category list
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state.engine.categories().await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}
