use crate::{chat::LanguageModel, data::store::StudentStore, routes::sse::SseEvent};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::sync::Arc;
use tokio::sync::broadcast::{Receiver, Sender, channel};

/// Shows toasts for `showToast` events sent via `HX-Trigger`, and a generic failure toast whenever
/// htmx gets an error status or can't reach the server.
const TOAST_SCRIPT: &str = r"
let toastTimer;
function showToast(message, ok) {
    const toast = document.getElementById('toast');
    toast.textContent = (ok ? '✓ ' : '✗ ') + message;
    toast.classList.toggle('bg-green-700', ok);
    toast.classList.toggle('bg-red-700', !ok);
    toast.hidden = false;
    clearTimeout(toastTimer);
    toastTimer = setTimeout(() => { toast.hidden = true; }, 2000);
}
document.addEventListener('showToast', (e) => showToast(e.detail.message, e.detail.ok));
document.addEventListener('htmx:responseError', () => showToast('Something went wrong', false));
document.addEventListener('htmx:sendError', () => showToast('Network error', false));
";

#[derive(Clone)]
pub struct RosterState {
    store: StudentStore,
    model: Arc<dyn LanguageModel>,
    sse_events_sender: Sender<SseEvent>,
}

impl RosterState {
    pub fn new(store: StudentStore, model: Arc<dyn LanguageModel>) -> Self {
        let (tx, _rx) = channel(16);

        Self {
            store,
            model,
            sse_events_sender: tx,
        }
    }

    pub const fn store(&self) -> &StudentStore {
        &self.store
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://unpkg.com/htmx-ext-sse@2.2.3" integrity="sha384-Y4gc0CK6Kg+hmulDc6rZPJu0tqvk7EWlih0Oh+2OkAi1ZDlCbBDCQEE2uVk472Ky" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Roster" }
                }
                body hx-ext="sse" class="bg-gray-900 min-h-screen flex flex-col items-center text-white p-4" {
                    (markup)
                    div id="toast" hidden class="fixed bottom-4 left-1/2 -translate-x-1/2 px-4 py-2 rounded shadow-lg font-semibold" {}
                    script { (PreEscaped(TOAST_SCRIPT)) }
                }
            }
        }
    }

    pub fn subscribe_to_sse_feed(&self) -> Receiver<SseEvent> {
        self.sse_events_sender.subscribe()
    }

    pub fn send_sse_event(&self, event: SseEvent) {
        let _ = self.sse_events_sender.send(event);
    }
}
