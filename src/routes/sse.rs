use crate::state::RosterState;
use axum::{
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SseEvent {
    CrudStudent,
}

impl SseEvent {
    /// Name the page listens for as `sse:<name>`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CrudStudent => "crud_student",
        }
    }
}

pub async fn sse_feed(
    State(state): State<RosterState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_to_sse_feed();

    // lagged receivers just miss a beat, the next event refreshes everything anyway
    let stream = BroadcastStream::new(rx).filter_map(|evt| {
        evt.ok()
            .map(|evt| Ok(Event::default().event(evt.name()).data("changed")))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
