use crate::{
    app,
    chat::LanguageModel,
    data::store::StudentStore,
    error::{RosterError, RosterResult},
    state::RosterState,
};
use async_trait::async_trait;
use axum::{Router, body::Body, response::Response};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Answers by echoing the question and counting students in the prompt.
pub struct EchoModel {
    fail: bool,
    prompts: Mutex<Vec<(String, String)>>,
}

impl EchoModel {
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> RosterResult<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_message.to_string()));

        if self.fail {
            return Err(RosterError::EmptyChatReply);
        }

        let students = system_prompt.matches("\"studentId\"").count();
        Ok(format!(
            "You asked: {user_message} ({students} students in context)"
        ))
    }
}

pub struct TestApp {
    _dir: TempDir,
    pub state: RosterState,
    pub model: Arc<EchoModel>,
}

impl TestApp {
    fn build(fail: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let store = StudentStore::new(dir.path().join("students.json"));
        let model = Arc::new(EchoModel {
            fail,
            prompts: Mutex::new(vec![]),
        });

        Self {
            state: RosterState::new(store, model.clone()),
            model,
            _dir: dir,
        }
    }

    pub fn new() -> Self {
        Self::build(false)
    }

    pub fn failing() -> Self {
        Self::build(true)
    }

    pub fn router(&self) -> Router {
        app(self.state.clone(), 1024 * 1024)
    }
}

pub async fn read_text(rsp: Response<Body>) -> String {
    let bytes = rsp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn read_json(rsp: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&read_text(rsp).await).unwrap()
}
