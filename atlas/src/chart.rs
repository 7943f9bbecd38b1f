//! Chart configuration for the rendering surface.
//!
//! Recomputed from the view on every state change; purely internal, no
//! stability guarantee. While geometry is loading the config carries no map
//! series at all, so the previous level's shapes can never flash through.

use serde::Serialize;

use crate::drill::{DrillState, MapView};
use crate::geometry::FetchGeometry;

/// Grey at zero, then brightening yellow.
pub const COLOR_RAMP: [&str; 5] = ["#E0E0E0", "#FFF59D", "#FFEB3B", "#FFC107", "#FF9800"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionDatum {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualMap {
    pub min: u32,
    pub max: u32,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSeries {
    pub map: String,
    pub data: Vec<RegionDatum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartOptions {
    /// Placeholder while geometry resolves.
    Loading { title: String },
    Map {
        title: String,
        visual_map: VisualMap,
        series: MapSeries,
    },
}

pub fn chart_options<F: FetchGeometry>(view: &MapView<F>) -> ChartOptions {
    if !view.map_loaded() {
        return ChartOptions::Loading {
            title: "地图数据加载中...".to_string(),
        };
    }

    let title = match view.state() {
        DrillState::Country => "赛事地点分布（全国）".to_string(),
        DrillState::Province { province } | DrillState::District { province, .. } => {
            format!("赛事地点分布（{province}）")
        }
    };

    let data: Vec<RegionDatum> = view
        .counts()
        .into_iter()
        .map(|entry| RegionDatum {
            name: entry.name,
            value: entry.count,
        })
        .collect();

    let max = data.iter().map(|datum| datum.value).max().unwrap_or(0).max(1);

    ChartOptions::Map {
        title,
        visual_map: VisualMap {
            min: 0,
            max,
            colors: COLOR_RAMP.to_vec(),
        },
        series: MapSeries {
            map: view.state().map_name().to_string(),
            data,
        },
    }
}
