use axum::{
    extract::{Form, Json, State},
    http::StatusCode,
};
use chatbox_shared::{GetResponseForm, ReplyBody};
use chrono::Local;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::state::Conversations;

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn handle_get_response(
    State(conversations): State<Conversations>,
    Form(req): Form<GetResponseForm>,
) -> Result<Json<ReplyBody>, (StatusCode, Json<Value>)> {
    let today = Local::now().date_naive();

    match conversations.reply(&req.user_id, &req.message, today) {
        Ok(response) => {
            info!(user_id = %req.user_id, "reply sent");
            Ok(Json(ReplyBody { response }))
        }
        Err(e) => {
            error!(user_id = %req.user_id, error = %e, "failed to build reply");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Failed to build reply: {}", e) })),
            ))
        }
    }
}
