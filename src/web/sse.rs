//! Map a [`JobStream`] onto `text/event-stream`.
//!
//! Every output line becomes one `data:` event. After the last line a single
//! `event: complete` carries the run outcome, so a failed or missing engine
//! is visible to the browser instead of looking like an empty success.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::exec::{JobEvent, JobStream};

pub const COMPLETE_EVENT: &str = "complete";

pub fn job_event_to_sse(event: JobEvent) -> Event {
    match event {
        // Carriage returns can't be framed; newlines are split by `data`.
        JobEvent::Line(line) => Event::default().data(line.replace('\r', "")),
        JobEvent::Finished(outcome) => Event::default()
            .event(COMPLETE_EVENT)
            .data(outcome.to_string()),
    }
}

pub fn job_sse(stream: JobStream) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(stream.map(|event| Ok(job_event_to_sse(event)))).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
