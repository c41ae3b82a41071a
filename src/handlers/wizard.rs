use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{load_snapshot, NetworkApi};
use crate::models::AppState;
use crate::services::answer_store::AnswerStore;
use crate::wizard::{AdvanceOutcome, Answer, WizardSession};

use super::helpers::{api_error_response, random_session_id, session_not_found, wizard_error_response};

#[derive(Deserialize, Default)]
pub struct CreateSessionForm {
    pub network_id: Option<String>,
}

#[derive(Deserialize)]
pub struct AnswerForm {
    pub value: Answer,
    #[serde(default)]
    pub second: bool,
}

// ---------- Session lifecycle ----------

pub async fn wizard_create<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    form: Option<Json<CreateSessionForm>>,
) -> Response {
    let form = form.map(|Json(f)| f).unwrap_or_default();
    let snapshot = match load_snapshot(&*state.api).await {
        Ok(s) => s,
        Err(e) => return api_error_response(&e),
    };
    let session = WizardSession::new(state.catalog.clone(), snapshot, form.network_id);
    let view = session.view();
    let id = random_session_id();
    state.insert_session(id.clone(), session);
    tracing::info!(session = %id, "Wizard session started");
    Json(json!({ "session_id": id, "view": view })).into_response()
}

pub async fn wizard_get<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
) -> Response {
    let Some(shared) = state.session(&id) else {
        return session_not_found();
    };
    let session = shared.lock().await;
    Json(json!({ "session_id": id, "view": session.view() })).into_response()
}

pub async fn wizard_cancel<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
) -> Response {
    let Some(shared) = state.remove_session(&id) else {
        return session_not_found();
    };
    shared.lock().await.cancel();
    Json(json!({ "cancelled": true })).into_response()
}

// ---------- Navigation ----------

pub async fn wizard_answer<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
    Json(form): Json<AnswerForm>,
) -> Response {
    let Some(shared) = state.session(&id) else {
        return session_not_found();
    };
    let mut session = shared.lock().await;
    session.record_answer(form.value, form.second);
    Json(json!({ "session_id": id, "view": session.view() })).into_response()
}

pub async fn wizard_next<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
) -> Response {
    let Some(shared) = state.session(&id) else {
        return session_not_found();
    };
    let mut session = shared.lock().await;

    // Pick up changes made since the previous step
    match load_snapshot(&*state.api).await {
        Ok(snapshot) => session.refresh_snapshot(snapshot),
        Err(e) => tracing::warn!(%e, session = %id, "Could not refresh resources; using the previous snapshot"),
    }

    match session.advance(&*state.api, &*state.store).await {
        Ok(AdvanceOutcome::Moved { .. }) => {
            Json(json!({ "session_id": id, "view": session.view() })).into_response()
        }
        Ok(AdvanceOutcome::Completed {
            network_id,
            tour_type,
            answers,
        }) => {
            drop(session);
            state.remove_session(&id);
            Json(json!({
                "completed": true,
                "network_id": network_id,
                "tour_type": tour_type,
                "answers": answers,
            }))
            .into_response()
        }
        Err(e) => wizard_error_response(&e),
    }
}

pub async fn wizard_back<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
) -> Response {
    let Some(shared) = state.session(&id) else {
        return session_not_found();
    };
    let mut session = shared.lock().await;
    session.retreat();
    Json(json!({ "session_id": id, "view": session.view() })).into_response()
}

pub async fn wizard_review<A: NetworkApi + 'static, S: AnswerStore + 'static>(
    State(state): State<AppState<A, S>>,
    Path(id): Path<String>,
) -> Response {
    let Some(shared) = state.session(&id) else {
        return session_not_found();
    };
    let session = shared.lock().await;
    Json(json!({ "session_id": id, "review": session.review() })).into_response()
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
