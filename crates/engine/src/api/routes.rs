use axum::{
    routing::{get, post},
    Router,
};
use chatbox_shared::GET_RESPONSE_PATH;

use super::handlers;
use crate::state::Conversations;

pub fn create_router(conversations: Conversations) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route(GET_RESPONSE_PATH, post(handlers::handle_get_response))
        .with_state(conversations)
}
