//! Page session endpoints: the frame stream and explicit unmount.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Router,
};
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};
use tracing::{debug, info};

use crate::{session::Attachment, AppError, AppState, SessionId};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/sessions/{id}/events", get(events))
        .route("/sessions/{id}/unmount", post(unmount))
}

/// Stream `ClockFrame`s to the page. The attachment lives as long as the
/// stream, so a client disconnect detaches it.
async fn events(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // ---
    let Attachment { frames, guard } = state
        .sessions
        .attach(id)
        .ok_or_else(|| AppError::NotFound(format!("no live session {}", id)))?;
    debug!("GET /sessions/{}/events - attached", id);

    let stream = WatchStream::new(frames).map(move |frame| {
        let _attached = &guard;
        let event = match Event::default().json_data(&frame) {
            Ok(event) => event,
            Err(e) => {
                debug!("Failed to encode frame for session {}: {}", id, e);
                Event::default().comment("frame encoding failed")
            }
        };
        Ok(event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn unmount(
    Path(id): Path<SessionId>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    // ---
    if state.sessions.unmount(id) {
        info!("POST /sessions/{}/unmount - unmounted", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("no live session {}", id)))
    }
}
