use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::points::{Points, TREE_COST};

/// Calendar date rendering, e.g. `3/14/2025`.
const DATE_FORMAT: &str = "%-m/%-d/%Y";
/// Wall-clock rendering, e.g. `9:05:07 PM`.
const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// What was planted. Trees are the only reward today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantKind {
    Tree,
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// Immutable record of one successful plant.
///
/// Serialized in the shape the web client has always consumed:
/// `{"date": "...", "time": "...", "points": 1000, "type": "tree"}`.
/// `pointsSpent` is accepted as an alias for `points` on decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantEvent {
    pub date: String,
    pub time: String,
    #[serde(rename = "points", alias = "pointsSpent")]
    pub points_spent: Points,
    #[serde(rename = "type")]
    pub kind: PlantKind,
}

impl PlantEvent {
    /// A tree planted at the given instant, rendered in that instant's zone.
    pub fn tree_at<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            time: at.format(TIME_FORMAT).to_string(),
            points_spent: TREE_COST,
            kind: PlantKind::Tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 21, 5, 7).unwrap()
    }

    #[test]
    fn tree_at_formats_date_and_time() {
        let event = PlantEvent::tree_at(&fixed());
        assert_eq!(event.date, "3/4/2025");
        assert_eq!(event.time, "9:05:07 PM");
        assert_eq!(event.points_spent, TREE_COST);
        assert_eq!(event.kind, PlantKind::Tree);
    }

    #[test]
    fn wire_shape() {
        let event = PlantEvent::tree_at(&fixed());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "date": "3/4/2025",
                "time": "9:05:07 PM",
                "points": 1000,
                "type": "tree",
            })
        );
    }

    #[test]
    fn decodes_points_spent_alias() {
        let event: PlantEvent = serde_json::from_str(
            r#"{"date":"1/1/2024","time":"8:00:00 AM","pointsSpent":1000,"type":"tree"}"#,
        )
        .unwrap();
        assert_eq!(event.points_spent, 1000);
    }

    #[test]
    fn unknown_kind_rejected() {
        let res = serde_json::from_str::<PlantEvent>(
            r#"{"date":"1/1/2024","time":"8:00:00 AM","points":1000,"type":"shrub"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn kind_display() {
        assert_eq!(PlantKind::Tree.to_string(), "tree");
    }
}
