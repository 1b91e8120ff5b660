pub mod handlers;
pub mod render;
pub mod state;
pub mod view;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use handlers::analyze_post;
pub use state::AppState;
pub use view::{AnalysisView, PageView};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
