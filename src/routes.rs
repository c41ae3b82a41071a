use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::NetworkApi;
use crate::handlers::wizard;
use crate::models::AppState;
use crate::services::answer_store::AnswerStore;

pub fn build_router<A, S>(state: AppState<A, S>) -> Router
where
    A: NetworkApi + 'static,
    S: AnswerStore + 'static,
{
    Router::new()
        .route("/healthz", get(wizard::healthz))
        .route("/api/wizard", post(wizard::wizard_create::<A, S>))
        .route(
            "/api/wizard/:id",
            get(wizard::wizard_get::<A, S>).delete(wizard::wizard_cancel::<A, S>),
        )
        .route("/api/wizard/:id/answer", post(wizard::wizard_answer::<A, S>))
        .route("/api/wizard/:id/next", post(wizard::wizard_next::<A, S>))
        .route("/api/wizard/:id/back", post(wizard::wizard_back::<A, S>))
        .route("/api/wizard/:id/review", get(wizard::wizard_review::<A, S>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
