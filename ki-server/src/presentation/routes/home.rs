use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::home::{index, post_details};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/Home/Index", get(index))
        .route("/Posts/Details/{id}", get(post_details))
}
