use crate::{
    data::student::Student,
    error::{RosterResult, SerialisePromptSnafu},
};
use async_trait::async_trait;
use maud::{Escaper, PreEscaped};
use snafu::ResultExt;
use std::fmt::Write;

pub mod completions;

/// Anything that can turn a system instruction plus one user message into a reply.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> RosterResult<String>;
}

/// Puts the whole roster, as JSON, into the instruction sent ahead of the user's message.
pub fn build_system_prompt(roster: &[Student]) -> RosterResult<String> {
    let roster_json = serde_json::to_string_pretty(roster).context(SerialisePromptSnafu)?;

    Ok(format!(
        "You are a helpful assistant for a student roster management application. \
         Here is the current list of students in JSON format:\n{roster_json}\n\n\
         Answer the user's questions about these students accurately and concisely. \
         If the answer is not in the data, say so."
    ))
}

/// Relays one question about the roster to the model and hands back its reply untouched.
pub async fn ask_about_roster(
    model: &dyn LanguageModel,
    roster: &[Student],
    message: &str,
) -> RosterResult<String> {
    let system_prompt = build_system_prompt(roster)?;
    info!(students = roster.len(), "Relaying chat message");
    model.complete(&system_prompt, message).await
}

fn push_escaped(out: &mut String, s: &str) {
    Escaper::new(out).write_str(s).unwrap(); //this method always succeeds - strange api!
}

fn push_line_with_bold(out: &mut String, line: &str) {
    let mut rest = line;
    while let Some(start) = rest.find("**") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("**") else {
            break;
        };

        push_escaped(out, &rest[..start]);
        out.push_str("<strong>");
        push_escaped(out, &after_open[..end]);
        out.push_str("</strong>");
        rest = &after_open[end + 2..];
    }
    push_escaped(out, rest);
}

/// Turns a model reply into markup: `**bold**` becomes `<strong>`, newlines become `<br>`, and
/// everything else is escaped.
pub fn format_reply(text: &str) -> PreEscaped<String> {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        push_line_with_bold(&mut out, line);
    }
    PreEscaped(out)
}
