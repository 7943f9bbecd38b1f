//! Read-only event snapshot from the CRUD collaborator.
//!
//! The collaborator owns the records; we only mirror them. A failed refresh
//! keeps the last good snapshot so the map stays serviceable.

use std::{sync::Arc, time::Duration};

use atlas::event::Event;
use tracing::{info, warn};

use crate::state::State;

pub async fn fetch_events(url: &str) -> Result<Vec<Event>, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let response = client.get(url).send().await?;

    response.error_for_status()?.json().await
}

pub async fn refresh_loop(state: Arc<State>) {
    let secs = state.config.events_refresh_secs;
    if secs == 0 {
        info!("Event refresh disabled");
        return;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match fetch_events(&state.config.events_url).await {
            Ok(events) => {
                info!("Refreshed events: {}", events.len());
                *state.events.write().await = events;
            }
            Err(e) => warn!("Event refresh failed, keeping snapshot: {e}"),
        }
    }
}
