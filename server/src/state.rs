use std::sync::Arc;

use atlas::event::Event;
use atlas::geometry::{GeometryCache, HttpFetcher};
use tokio::sync::RwLock;
use tracing::info;

use super::{config::Config, events::fetch_events};

pub struct State {
    pub config: Config,
    pub events: RwLock<Vec<Event>>,
    pub geometry: GeometryCache,
    pub fetcher: HttpFetcher,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let fetcher = HttpFetcher::new(&config.geo_base_url);

        let events = fetch_events(&config.events_url)
            .await
            .expect("Event source unreachable!");
        info!("Loaded events: {}", events.len());

        Arc::new(Self {
            config,
            events: RwLock::new(events),
            geometry: GeometryCache::default(),
            fetcher,
        })
    }
}
