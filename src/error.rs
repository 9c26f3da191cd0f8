use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::{num::ParseIntError, path::PathBuf};

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error reading roster file {}", path.display()))]
    ReadStore {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error creating roster file {}", path.display()))]
    CreateStore {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error writing roster file {}", path.display()))]
    WriteStore {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error parsing roster file {}", path.display()))]
    ParseStore {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[snafu(display("Error serialising the roster"))]
    SerialiseStore { source: serde_json::Error },
    #[snafu(display("Unable to extract a JSON body"))]
    InvalidJsonBody { source: JsonRejection },
    #[snafu(display("Missing student ID or name"))]
    MissingStudentIdOrName,
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseEnvVar {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("No API key configured for the chat assistant"))]
    MissingChatApiKey,
    #[snafu(display("Error building the chat HTTP client"))]
    BuildChatClient { source: reqwest::Error },
    #[snafu(display("Error serialising the roster into the chat prompt"))]
    SerialisePrompt { source: serde_json::Error },
    #[snafu(display("Error sending the chat request"))]
    ChatRequest { source: reqwest::Error },
    #[snafu(display("Chat provider answered with {}: {:?}", status, body))]
    ChatUpstream {
        status: reqwest::StatusCode,
        body: String,
    },
    #[snafu(display("Chat provider answered without any content"))]
    EmptyChatReply,
    #[snafu(display("Error with CSVs"))]
    Csv { source: csv::Error },
    #[snafu(display("Error flushing CSV output"))]
    FlushCsv { source: std::io::Error },
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::InvalidJsonBody { source } => source.status(),
            Self::MissingStudentIdOrName => BI,
            Self::MissingStudent { .. } => NF,
            Self::ReadStore { .. }
            | Self::CreateStore { .. }
            | Self::WriteStore { .. }
            | Self::ParseStore { .. }
            | Self::SerialiseStore { .. }
            | Self::BadEnvVar { .. }
            | Self::ParseEnvVar { .. }
            | Self::MissingChatApiKey
            | Self::BuildChatClient { .. }
            | Self::SerialisePrompt { .. }
            | Self::ChatRequest { .. }
            | Self::ChatUpstream { .. }
            | Self::EmptyChatReply
            | Self::Csv { .. }
            | Self::FlushCsv { .. } => ISE,
        }
    }

    /// The short message shown to clients. Internal details stay in the logs.
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidJsonBody { .. } => "Invalid JSON body",
            Self::MissingStudentIdOrName => "Missing student ID or name",
            Self::MissingStudent { .. } => "Student not found",
            Self::ReadStore { .. } | Self::CreateStore { .. } | Self::ParseStore { .. } => {
                "Failed to read students"
            }
            Self::WriteStore { .. } | Self::SerialiseStore { .. } => "Failed to write students",
            Self::MissingChatApiKey
            | Self::BuildChatClient { .. }
            | Self::SerialisePrompt { .. }
            | Self::ChatRequest { .. }
            | Self::ChatUpstream { .. }
            | Self::EmptyChatReply => "Failed to get a reply from the assistant",
            Self::Csv { .. } | Self::FlushCsv { .. } => "Failed to export students",
            Self::BadEnvVar { .. } | Self::ParseEnvVar { .. } => "Server misconfigured",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        error!(?self, "Error!");
        (
            self.status_code(),
            Json(ErrorBody {
                error: self.client_message(),
            }),
        )
            .into_response()
    }
}
