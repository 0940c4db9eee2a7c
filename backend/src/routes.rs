use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use rocket::http::Status;
use rocket::{get, post, serde::json::Json, State};
use rocket_ws as ws;
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, instrument, warn};

use crate::broadcaster::Broadcaster;
use crate::error::ApiError;
use crate::store;
use shared::fraud::{detect_fraud, CandidateVote};
use shared::models::{MessageResponse, VoteRequest, VoteSnapshot};

pub struct AppState {
    pub db: SqlitePool,
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            db: pool,
            broadcaster: Arc::new(Broadcaster::new()),
        }
    }
}

#[get("/")]
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Fraud Detection Voting API is Running!".into(),
    })
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

/// Check then insert is deliberately not transactional; the store's UNIQUE
/// constraints are the backstop when two conflicting submissions both pass
/// the fraud check.
#[instrument(skip(state, request), fields(voter_id = %request.voter_id))]
#[post("/submit_vote", format = "json", data = "<request>")]
pub async fn submit_vote(
    state: &State<AppState>,
    request: Json<VoteRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = request.into_inner();
    let candidate =
        CandidateVote::from_request(&request).map_err(|_| ApiError::InvalidTimestamp)?;

    let existing = store::fetch_all_votes(&state.db).await?;
    detect_fraud(&candidate, &existing)?;

    let vote = store::insert_vote(&state.db, &candidate).await?;
    debug!("Vote {} accepted from {}", vote.id, vote.location);

    let snapshot = store::snapshot(&state.db).await?;
    state.broadcaster.broadcast(snapshot);

    Ok(Json(MessageResponse {
        message: "Vote submitted successfully!".into(),
    }))
}

#[get("/get_votes")]
pub async fn get_votes(state: &State<AppState>) -> Result<Json<VoteSnapshot>, ApiError> {
    store::snapshot(&state.db)
        .await
        .map(Json)
        .map_err(ApiError::from)
}

/// Persistent subscriber connection. Snapshots arrive after each accepted
/// vote; inbound client frames are drained and ignored. The connection is
/// deregistered on client close or send failure.
#[get("/ws")]
pub fn subscribe(ws: ws::WebSocket, state: &State<AppState>) -> ws::Channel<'static> {
    let broadcaster = state.broadcaster.clone();

    ws.channel(move |mut stream| {
        let broadcaster = broadcaster.clone();
        Box::pin(async move {
            let conn_id = broadcaster.add_connection();
            let mut updates = broadcaster.subscribe();

            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Ok(snapshot) => {
                            let payload = match serde_json::to_string(&snapshot) {
                                Ok(json) => json,
                                Err(e) => {
                                    warn!("Failed to serialize snapshot: {}", e);
                                    continue;
                                }
                            };

                            if stream.send(ws::Message::Text(payload)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(missed)) => {
                            warn!("Subscriber {} lagged by {} snapshots", conn_id, missed);
                        }
                        Err(RecvError::Closed) => break,
                    },
                    incoming = stream.next() => match incoming {
                        Some(Ok(ws::Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            debug!("Subscriber {} errored: {}", conn_id, e);
                            break;
                        }
                    },
                }
            }

            broadcaster.remove_connection(&conn_id);
            Ok(())
        })
    })
}
