//! The drill-down state machine and its interaction layer.
//!
//! One [`MapView`] exists per mounted map. It owns the drill state, the
//! injected geometry cache and the fetcher; interaction handlers mutate it,
//! and it is dropped at unmount. All aggregation it performs is synchronous;
//! the only suspension point is the geometry fetch.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::aggregate::{self, AggLevel, RegionCount};
use crate::error::AtlasError;
use crate::event::Event;
use crate::geometry::{FetchGeometry, GeometryAsset, GeometryCache, load_geometry};
use crate::normalize::{normalize_province, normalize_subregion};
use crate::region::{COUNTRY_CODE, COUNTRY_MAP_NAME, is_municipality, province_code};

/// Current drill position. The selections live inside the variants, so a
/// district selection without its parent province cannot exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillState {
    Country,
    Province { province: String },
    District { province: String, district: String },
}

impl DrillState {
    /// Name the current level's geometry is registered under.
    pub fn map_name(&self) -> &str {
        match self {
            DrillState::Country => COUNTRY_MAP_NAME,
            DrillState::Province { province } | DrillState::District { province, .. } => province,
        }
    }

    /// Geometry code the current level renders with. District selections
    /// stay on their municipality's boundary set.
    pub fn map_code(&self) -> Result<&'static str, AtlasError> {
        match self {
            DrillState::Country => Ok(COUNTRY_CODE),
            DrillState::Province { province } | DrillState::District { province, .. } => {
                province_code(province)
            }
        }
    }
}

/// What a click on the rendered map resolved to.
#[derive(Debug, PartialEq)]
pub enum ClickOutcome {
    /// Entered a deeper level; new geometry must resolve before the chart
    /// renders again.
    Drilled,
    /// Left the drill-down via the province's own label.
    Returned,
    /// Terminal region: show its events instead of drilling.
    Popup(Vec<Event>),
    /// Nothing to do.
    Ignored,
}

/// Transient hover feedback. Reads the same counts the chart shows and
/// never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub name: String,
    pub count: u32,
}

/// Handle for an in-flight geometry load, pinned to the state generation it
/// was started under. Applying it after a newer transition is a no-op.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    code: &'static str,
}

impl LoadTicket {
    pub fn code(&self) -> &'static str {
        self.code
    }
}

pub struct MapView<F> {
    events: Vec<Event>,
    state: DrillState,
    generation: u64,
    loaded: Option<Arc<GeometryAsset>>,
    cache: Arc<GeometryCache>,
    fetcher: F,
}

impl<F: FetchGeometry> MapView<F> {
    pub fn new(events: Vec<Event>, cache: Arc<GeometryCache>, fetcher: F) -> Self {
        Self {
            events,
            state: DrillState::Country,
            generation: 0,
            loaded: None,
            cache,
            fetcher,
        }
    }

    pub fn state(&self) -> &DrillState {
        &self.state
    }

    pub fn map_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn geometry(&self) -> Option<&Arc<GeometryAsset>> {
        self.loaded.as_ref()
    }

    /// Region counts for the level currently displayed.
    pub fn counts(&self) -> Vec<RegionCount> {
        match &self.state {
            DrillState::Country => aggregate::country_counts(&self.events),
            DrillState::Province { province } | DrillState::District { province, .. } => {
                aggregate::subregion_counts(&self.events, province)
            }
        }
    }

    /// Resolves a click on the rendered map. Clicks arriving while geometry
    /// is still loading are dropped, since the map surface is not shown
    /// then; this also keeps a repeated click from starting a second fetch.
    pub fn click(&mut self, raw_name: &str) -> ClickOutcome {
        if self.loaded.is_none() {
            return ClickOutcome::Ignored;
        }

        match self.state.clone() {
            DrillState::Country => {
                let Some(province) = normalize_province(raw_name) else {
                    return ClickOutcome::Ignored;
                };
                if self.count_for(&province) > 0 {
                    self.transition(DrillState::Province { province });
                    ClickOutcome::Drilled
                } else {
                    self.popup(AggLevel::Country, &province)
                }
            }
            DrillState::Province { province } | DrillState::District { province, .. } => {
                self.click_subregion(province, raw_name)
            }
        }
    }

    /// Explicit back affordance. Available everywhere except `Country`.
    pub fn back(&mut self) -> bool {
        let parent = match &self.state {
            DrillState::Country => return false,
            DrillState::Province { .. } => DrillState::Country,
            DrillState::District { province, .. } => DrillState::Province {
                province: province.clone(),
            },
        };
        self.transition(parent);
        true
    }

    /// Hover feedback for a region at the current level.
    pub fn hover(&self, raw_name: &str) -> Option<Tooltip> {
        if self.loaded.is_none() {
            return None;
        }

        let name = match self.state {
            DrillState::Country => normalize_province(raw_name)?,
            _ => normalize_subregion(raw_name)?,
        };

        Some(Tooltip {
            count: self.count_for(&name),
            name,
        })
    }

    /// Events for the currently selected district, if any.
    pub fn selected_events(&self) -> Vec<&Event> {
        match &self.state {
            DrillState::District { province, district } => {
                aggregate::events_in_subregion(&self.events, province, district)
            }
            _ => Vec::new(),
        }
    }

    /// Starts a geometry load for the current level.
    pub fn begin_load(&self) -> Result<LoadTicket, AtlasError> {
        let code = self.state.map_code()?;
        Ok(LoadTicket {
            generation: self.generation,
            code,
        })
    }

    /// Applies resolved geometry if the view still shows the level the
    /// ticket was issued for. Stale responses are discarded.
    pub fn apply(&mut self, ticket: &LoadTicket, asset: Arc<GeometryAsset>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.warn_unmatched(&asset);
        self.loaded = Some(asset);
        true
    }

    /// Resolves the current level's geometry through the cache and marks
    /// the view loaded. On failure the view stays in the loading state; an
    /// unknown region abandons the load for good.
    pub async fn sync_geometry(&mut self) -> Result<bool, AtlasError> {
        let ticket = self
            .begin_load()
            .inspect_err(|e| warn!("Abandoning geometry load: {e}"))?;

        let asset = load_geometry(&self.cache, &self.fetcher, ticket.code).await?;

        Ok(self.apply(&ticket, asset))
    }

    fn click_subregion(&mut self, province: String, raw_name: &str) -> ClickOutcome {
        // Clicking the province's own label leaves the drill-down.
        if raw_name.trim() == province.as_str() {
            self.transition(DrillState::Country);
            return ClickOutcome::Returned;
        }

        let Some(subregion) = normalize_subregion(raw_name) else {
            return ClickOutcome::Ignored;
        };

        if is_municipality(&province) && self.count_for(&subregion) > 0 {
            self.transition(DrillState::District {
                province,
                district: subregion,
            });
            ClickOutcome::Drilled
        } else {
            self.popup(AggLevel::Province(&province), &subregion)
        }
    }

    fn popup(&self, level: AggLevel<'_>, region: &str) -> ClickOutcome {
        let matches: Vec<Event> = aggregate::events_for_region(&self.events, level, region)
            .into_iter()
            .cloned()
            .collect();

        if matches.is_empty() {
            ClickOutcome::Ignored
        } else {
            ClickOutcome::Popup(matches)
        }
    }

    /// Counted regions should land on a boundary feature once both sides
    /// are normalized; anything that does not would render as an unshaded
    /// hole in the map.
    fn warn_unmatched(&self, asset: &GeometryAsset) {
        let features: HashSet<String> = asset
            .feature_names
            .iter()
            .filter_map(|name| match self.state {
                DrillState::Country => normalize_province(name),
                _ => normalize_subregion(name),
            })
            .collect();

        for entry in self.counts() {
            if entry.count > 0 && !features.contains(&entry.name) {
                warn!("No boundary feature for {}", entry.name);
            }
        }
    }

    fn count_for(&self, region: &str) -> u32 {
        self.counts()
            .iter()
            .find(|entry| entry.name == region)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Every transition bumps the generation and drops the loaded geometry,
    /// so the chart cannot render the previous level's shapes.
    fn transition(&mut self, next: DrillState) {
        self.state = next;
        self.generation += 1;
        self.loaded = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use super::*;
    use crate::event::EventType;

    #[derive(Clone, Default)]
    struct StubFetcher {
        calls: Arc<Mutex<Vec<String>>>,
        empty: bool,
    }

    impl StubFetcher {
        fn empty() -> Self {
            Self {
                empty: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FetchGeometry for StubFetcher {
        async fn fetch(&self, code: &str) -> Result<Value, AtlasError> {
            self.calls.lock().unwrap().push(code.to_string());

            if self.empty {
                Ok(json!({ "type": "FeatureCollection", "features": [] }))
            } else {
                Ok(json!({
                    "type": "FeatureCollection",
                    "features": [{ "properties": { "name": "测试区" } }]
                }))
            }
        }
    }

    fn event(id: u32, province: &str, city: &str, district: &str) -> Event {
        Event {
            id,
            event_name: format!("race-{id}"),
            event_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            location: String::new(),
            province: province.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            event_type: EventType::Full,
            finish_time: "3:58:21".to_string(),
            pace: "5:39".to_string(),
            certificate: None,
        }
    }

    fn sample_events() -> Vec<Event> {
        vec![
            event(1, "上海市", "上海市", "黄浦区"),
            event(2, "上海", "上海市", "静安区"),
            event(3, "广东省", "深圳市", "南山区"),
            event(4, "广东省", "广州市", ""),
        ]
    }

    async fn mounted_view(fetcher: StubFetcher) -> MapView<StubFetcher> {
        let mut view = MapView::new(
            sample_events(),
            Arc::new(GeometryCache::default()),
            fetcher,
        );
        view.sync_geometry().await.unwrap();
        view
    }

    #[tokio::test]
    async fn test_mount_loads_country_geometry() {
        let fetcher = StubFetcher::default();
        let view = mounted_view(fetcher.clone()).await;

        assert!(view.map_loaded());
        assert_eq!(view.state(), &DrillState::Country);
        assert_eq!(fetcher.calls(), vec!["100000"]);
    }

    #[tokio::test]
    async fn test_click_drills_into_province_with_one_fetch() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        assert_eq!(view.click("广东"), ClickOutcome::Drilled);
        assert!(!view.map_loaded());

        // The map surface is gone while loading; a repeat click does nothing
        // and starts no second fetch.
        assert_eq!(view.click("广东"), ClickOutcome::Ignored);
        assert_eq!(fetcher.calls(), vec!["100000"]);

        assert!(view.sync_geometry().await.unwrap());
        assert!(view.map_loaded());
        assert_eq!(fetcher.calls(), vec!["100000", "440000"]);
    }

    #[tokio::test]
    async fn test_zero_count_click_stays_on_country() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        assert_eq!(view.click("西藏"), ClickOutcome::Ignored);
        assert_eq!(view.state(), &DrillState::Country);
        assert_eq!(fetcher.calls(), vec!["100000"]);
    }

    #[tokio::test]
    async fn test_city_click_opens_popup_for_regular_province() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        view.click("广东省");
        view.sync_geometry().await.unwrap();

        // Cities are the terminal level outside municipalities.
        match view.click("深圳市") {
            ClickOutcome::Popup(events) => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].id, 3);
            }
            other => panic!("expected popup, got {other:?}"),
        }
        assert_eq!(
            view.state(),
            &DrillState::Province { province: "广东".to_string() }
        );
    }

    #[tokio::test]
    async fn test_label_click_returns_to_country() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        view.click("广东");
        view.sync_geometry().await.unwrap();

        assert_eq!(view.click("广东"), ClickOutcome::Returned);
        assert_eq!(view.state(), &DrillState::Country);
        assert!(!view.map_loaded());

        // Country geometry is already cached, so the reload is immediate.
        assert!(view.sync_geometry().await.unwrap());
        assert_eq!(fetcher.calls(), vec!["100000", "440000"]);
    }

    #[tokio::test]
    async fn test_municipality_drills_on_districts() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        assert_eq!(view.click("上海市"), ClickOutcome::Drilled);
        view.sync_geometry().await.unwrap();

        assert_eq!(view.click("静安区"), ClickOutcome::Drilled);
        assert_eq!(
            view.state(),
            &DrillState::District {
                province: "上海".to_string(),
                district: "静安".to_string(),
            }
        );

        // District selections reuse the municipality boundary set.
        assert!(view.sync_geometry().await.unwrap());
        assert_eq!(fetcher.calls(), vec!["100000", "310000"]);

        let selected = view.selected_events();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);
    }

    #[tokio::test]
    async fn test_back_walks_up_one_level_at_a_time() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        view.click("上海");
        view.sync_geometry().await.unwrap();
        view.click("黄浦区");
        view.sync_geometry().await.unwrap();

        assert!(view.back());
        assert_eq!(
            view.state(),
            &DrillState::Province { province: "上海".to_string() }
        );

        assert!(view.back());
        assert_eq!(view.state(), &DrillState::Country);

        assert!(!view.back());
    }

    #[tokio::test]
    async fn test_stale_geometry_is_discarded() {
        let fetcher = StubFetcher::default();
        let mut view = mounted_view(fetcher.clone()).await;

        view.click("广东");
        let ticket = view.begin_load().unwrap();

        // The user backs out before the fetch resolves.
        view.back();

        let raw = fetcher.fetch(ticket.code()).await.unwrap();
        let asset = Arc::new(GeometryAsset::from_value(ticket.code(), raw).unwrap());

        assert!(!view.apply(&ticket, asset));
        assert!(!view.map_loaded());
    }

    #[tokio::test]
    async fn test_empty_feature_collection_keeps_view_unloaded() {
        let fetcher = StubFetcher::empty();
        let cache = Arc::new(GeometryCache::default());
        let mut view = MapView::new(sample_events(), cache.clone(), fetcher);

        assert!(matches!(
            view.sync_geometry().await,
            Err(AtlasError::GeometryFetch { .. })
        ));
        assert!(!view.map_loaded());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_hover_reads_counts_without_transitions() {
        let fetcher = StubFetcher::default();
        let view = mounted_view(fetcher).await;

        assert_eq!(
            view.hover("上海市"),
            Some(Tooltip { name: "上海".to_string(), count: 2 })
        );
        assert_eq!(
            view.hover("海南"),
            Some(Tooltip { name: "海南".to_string(), count: 0 })
        );
        assert_eq!(view.state(), &DrillState::Country);
    }
}
