use std::{convert::Infallible, sync::Arc};

use axum::{
    Extension, Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::Stream;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use tracing::{debug, warn};

use crate::{
    db::session::get_session,
    models::{app_state::AppState, auth::SubjectId, error::ServerError},
};

pub fn event_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/{session_id}", get(subscribe))
        .with_state(state.clone())
}

/// Server-sent event feed of row changes for one session. Clients treat the
/// events as re-fetch hints; a lagged subscriber just misses hints, the
/// snapshot endpoints remain authoritative.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Extension(subject_id): Extension<SubjectId>,
    Path(session_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    if get_session(state.get_pool(), session_id).await?.is_none() {
        return Err(ServerError::NotFound(format!(
            "Session {} does not exist",
            session_id
        )));
    }

    debug!(
        "Subject {} subscribed to session {}",
        subject_id.uuid(),
        session_id
    );

    let receiver = state.get_notifier().subscribe(session_id);

    let stream = futures::stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Ok(sse_event) = Event::default().json_data(&event) else {
                        continue;
                    };
                    return Some((Ok(sse_event), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
