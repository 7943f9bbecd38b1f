//! Per-region event counts.
//!
//! A pure fold over the event list: order-independent, no I/O. The country
//! level fills in every province so the whole map renders (grey at zero);
//! below that only observed sub-regions appear.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::event::Event;
use crate::normalize::{normalize_province, normalize_subregion};
use crate::region::{canonical_province, is_municipality, province_names};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    pub name: String,
    pub count: u32,
}

/// Aggregation target: the whole country, or the sub-regions of one
/// canonical province.
#[derive(Debug, Clone, Copy)]
pub enum AggLevel<'a> {
    Country,
    Province(&'a str),
}

pub fn aggregated_data(events: &[Event], level: AggLevel<'_>) -> Vec<RegionCount> {
    match level {
        AggLevel::Country => country_counts(events),
        AggLevel::Province(province) => subregion_counts(events, province),
    }
}

/// One entry per canonical province in table order, zero-filled.
pub fn country_counts(events: &[Event]) -> Vec<RegionCount> {
    let mut by_province: BTreeMap<&str, u32> = BTreeMap::new();
    for event in events {
        if let Some(province) = canonical_province(&event.province) {
            *by_province.entry(province).or_default() += 1;
        }
    }

    province_names()
        .map(|name| RegionCount {
            name: name.to_string(),
            count: by_province.get(name).copied().unwrap_or(0),
        })
        .collect()
}

/// Observed sub-regions of one province. Municipalities count the district
/// field, everything else the city field. Zero-count regions are omitted.
pub fn subregion_counts(events: &[Event], province: &str) -> Vec<RegionCount> {
    let municipal = is_municipality(province);

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for event in events {
        if !in_province(event, province) {
            continue;
        }
        if let Some(name) = normalize_subregion(subregion_field(event, municipal)) {
            *counts.entry(name).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| RegionCount { name, count })
        .collect()
}

/// Events behind one region at the given level, for the list popup. The
/// region name may arrive in any form; it is normalized here like
/// everything else.
pub fn events_for_region<'a>(
    events: &'a [Event],
    level: AggLevel<'_>,
    region: &str,
) -> Vec<&'a Event> {
    match level {
        AggLevel::Country => match normalize_province(region) {
            Some(province) => events
                .iter()
                .filter(|event| in_province(event, &province))
                .collect(),
            None => Vec::new(),
        },
        AggLevel::Province(province) => match normalize_subregion(region) {
            Some(subregion) => events_in_subregion(events, province, &subregion),
            None => Vec::new(),
        },
    }
}

pub fn events_in_subregion<'a>(
    events: &'a [Event],
    province: &str,
    subregion: &str,
) -> Vec<&'a Event> {
    let municipal = is_municipality(province);
    events
        .iter()
        .filter(|event| {
            in_province(event, province)
                && normalize_subregion(subregion_field(event, municipal))
                    .is_some_and(|name| name == subregion)
        })
        .collect()
}

fn in_province(event: &Event, province: &str) -> bool {
    canonical_province(&event.province).is_some_and(|name| name == province)
}

fn subregion_field(event: &Event, municipal: bool) -> &str {
    if municipal { &event.district } else { &event.city }
}
