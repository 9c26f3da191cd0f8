#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    chat::completions::ChatCompletionsModel,
    config::RuntimeConfiguration,
    data::store::StudentStore,
    routes::{
        chat::{internal_post_chat, post_chat},
        index::get_index_route,
        new_student::{internal_get_new_student_form, internal_put_new_student},
        roster_table::{
            internal_delete_student, internal_get_program_options, internal_get_students_table,
        },
        sse::sse_feed,
        students::{delete_student, export_students_csv, get_students, post_student},
    },
    state::RosterState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod chat;
mod config;
mod data;
mod error;
mod maud_conveniences;
mod roster_view;
mod routes;
mod state;
#[cfg(test)]
mod test_utils;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

pub fn app(state: RosterState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(get_index_route))
        .route("/students", get(get_students).post(post_student))
        .route("/students/export", get(export_students_csv))
        .route("/students/{id}", delete(delete_student))
        .route("/chat", post(post_chat))
        .route("/internal/students_table", get(internal_get_students_table))
        .route("/internal/program_options", get(internal_get_program_options))
        .route(
            "/internal/students/new_form",
            get(internal_get_new_student_form).put(internal_put_new_student),
        )
        .route("/internal/students/{id}", delete(internal_delete_student))
        .route("/internal/chat", post(internal_post_chat))
        .route("/sse_feed", get(sse_feed))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        warn!(?e, "no .env file loaded, using the process environment only");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let server_config = config.server_config();

    let store = StudentStore::new(server_config.data_file.clone());
    match store.backfill_ids().await {
        Ok((students, 0)) => info!(path = ?store.path(), students = students.len(), "Roster loaded"),
        Ok((students, changed)) => info!(
            path = ?store.path(),
            students = students.len(),
            changed,
            "Roster loaded, backfilled missing IDs"
        ),
        Err(e) => error!(?e, "Unable to check roster IDs on startup"),
    }

    let model = ChatCompletionsModel::new(config.chat_config()).expect("unable to create chat client");
    let state = RosterState::new(store, Arc::new(model));

    let app = app(state, server_config.body_limit_bytes);

    let listener = TcpListener::bind(&server_config.server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(server_ip = ?server_config.server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
