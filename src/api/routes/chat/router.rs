//! Router for the chat pages

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Html, routing::get};
use axum_extra::extract::{CookieJar, Query};
use serde_json::json;

use super::public;
use crate::api::session::session_id;
use crate::api::state::AppState;
use crate::api::templates::{Page, templates};

type SharedState = Arc<RwLock<AppState>>;

/// Landing page. Visiting it starts the session's chat over.
async fn home(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), crate::api::public::ApiError> {
    let (jar, session_id) = session_id(jar);

    let title = {
        let mut shared_state = state.write().expect("Unable to write share state");
        shared_state.reset_chats(&session_id);
        shared_state.config.app_title.clone()
    };

    let html = templates().render(&Page::Home.to_string(), &json!({ "title": title }))?;

    Ok((jar, Html(html)))
}

/// Generate the next bot response for the session and return it as
/// plain text.
async fn get_bot_response(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<public::ChatQuery>,
) -> Result<(CookieJar, String), crate::api::public::ApiError> {
    let (jar, session_id) = session_id(jar);
    let user_text = params.msg;

    // The previous bot response is used as context for the next one
    let (generator, context) = {
        let shared_state = state.read().expect("Unable to read share state");
        let context = match shared_state.last_chat(&session_id) {
            Some(last) => format!("{}{}", last, user_text),
            None => user_text.clone(),
        };
        (Arc::clone(&shared_state.generator), context)
    };

    let bot_text = generator.generate(&context).await?;

    state
        .write()
        .expect("Unable to write share state")
        .append_turn(&session_id, &user_text, &bot_text);

    Ok((jar, bot_text))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(home))
        .route("/get", get(get_bot_response))
}
