use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[serde(rename = "5km")]
    FiveKm,
    #[serde(rename = "10km")]
    TenKm,
    #[serde(rename = "15km")]
    FifteenKm,
    Half,
    Full,
}

/// One finished race, as served by the events backend. The province, city
/// and district fields are operator-entered free text and must go through
/// [`crate::normalize`] before any comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub event_name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    pub event_type: EventType,
    pub finish_time: String,
    pub pace: String,
    #[serde(default)]
    pub certificate: Option<String>,
}

/// Compact row for event-list popups: name, date and distance only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRow {
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_type: EventType,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            event_name: event.event_name.clone(),
            event_date: event.event_date,
            event_type: event.event_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_backend_payload() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": 7,
                "event_name": "上海马拉松",
                "event_date": "2024-11-17",
                "location": "上海",
                "province": "上海市",
                "city": "上海市",
                "district": "黄浦区",
                "event_type": "full",
                "finish_time": "3:58:21",
                "pace": "5:39"
            }"#,
        )
        .unwrap();

        assert_eq!(event.event_type, EventType::Full);
        assert_eq!(event.certificate, None);
        assert_eq!(event.district, "黄浦区");
    }

    #[test]
    fn test_distance_tags() {
        assert_eq!(
            serde_json::to_string(&EventType::FiveKm).unwrap(),
            "\"5km\""
        );
        assert_eq!(
            serde_json::from_str::<EventType>("\"half\"").unwrap(),
            EventType::Half
        );
    }
}
