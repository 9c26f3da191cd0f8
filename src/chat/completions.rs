use crate::{
    chat::LanguageModel,
    config::ChatConfig,
    error::{
        BuildChatClientSnafu, ChatRequestSnafu, ChatUpstreamSnafu, EmptyChatReplySnafu,
        MissingChatApiKeySnafu, RosterResult,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionReply,
}

#[derive(Deserialize)]
struct CompletionReply {
    content: Option<String>,
}

/// Talks to any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct ChatCompletionsModel {
    client: Client,
    config: Arc<ChatConfig>,
}

impl ChatCompletionsModel {
    pub fn new(config: Arc<ChatConfig>) -> RosterResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context(BuildChatClientSnafu)?;

        if config.api_key.is_none() {
            warn!("No CHAT_API_KEY set, chat requests will fail");
        }

        Ok(Self { client, config })
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsModel {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> RosterResult<String> {
        let api_key = self.config.api_key.as_ref().context(MissingChatApiKeySnafu)?;

        let body = CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage {
                    role: "system",
                    content: system_prompt,
                },
                CompletionMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        let rsp = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context(ChatRequestSnafu)?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return ChatUpstreamSnafu { status, body }.fail();
        }

        let parsed: CompletionResponse = rsp.json().await.context(ChatRequestSnafu)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .context(EmptyChatReplySnafu)
    }
}
