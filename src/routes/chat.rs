use crate::{
    chat::{ask_about_roster, format_reply},
    error::{InvalidJsonBodySnafu, RosterResult},
    state::RosterState,
};
use axum::{
    Form, Json,
    extract::{State, rejection::JsonRejection},
};
use maud::{Markup, Render, html};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    reply: String,
}

pub async fn post_chat(
    State(state): State<RosterState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> RosterResult<Json<ChatReply>> {
    let Json(ChatRequest { message }) = request.context(InvalidJsonBodySnafu)?;
    let roster = state.store().list().await?;
    let reply = ask_about_roster(state.model(), &roster, &message).await?;

    Ok(Json(ChatReply { reply }))
}

fn user_bubble(message: &str) -> Markup {
    html! {
        div class="self-end bg-blue-600 rounded-lg px-3 py-2 max-w-[80%] whitespace-pre-wrap" {(message)}
    }
}

fn bot_bubble(content: impl Render) -> Markup {
    html! {
        div class="self-start bg-gray-700 rounded-lg px-3 py-2 max-w-[80%]" {(content)}
    }
}

/// Appends the user's message and the assistant's answer to the transcript.
pub async fn internal_post_chat(
    State(state): State<RosterState>,
    Form(ChatRequest { message }): Form<ChatRequest>,
) -> Markup {
    let message = message.trim();
    if message.is_empty() {
        return html! {};
    }

    let answer = match state.store().list().await {
        Ok(roster) => ask_about_roster(state.model(), &roster, message).await,
        Err(e) => Err(e),
    };

    let reply = match answer {
        Ok(reply) => bot_bubble(format_reply(&reply)),
        Err(e) => {
            error!(?e, "Error relaying chat message");
            bot_bubble("❌ Error: Could not reach the AI server.")
        }
    };

    html! {
        (user_bubble(message))
        (reply)
    }
}
