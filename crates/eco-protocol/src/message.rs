use eco_types::{PlantEvent, PlantReceipt, Points};
use serde::{Deserialize, Serialize};

/// Error text returned when a plant is rejected for lack of points.
pub const NOT_ENOUGH_POINTS: &str = "Not enough points";
/// Error text returned when a credit would overflow the balance.
pub const POINTS_OVERFLOW: &str = "Points overflow";

/// `POST /api/addPoints` body. A missing `points` field is a delta of zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPointsRequest {
    #[serde(default)]
    pub points: Points,
}

/// Balance-only success body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: Points,
}

/// `POST /api/plantTree` success body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantTreeResponse {
    pub success: bool,
    pub points: Points,
    pub plant: PlantEvent,
}

impl From<PlantReceipt> for PlantTreeResponse {
    fn from(receipt: PlantReceipt) -> Self {
        Self {
            success: true,
            points: receipt.balance,
            plant: receipt.event,
        }
    }
}

/// Error body. `points` is present when the error carries a balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Points>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            points: None,
        }
    }

    pub fn not_enough_points(balance: Points) -> Self {
        Self {
            error: NOT_ENOUGH_POINTS.into(),
            points: Some(balance),
        }
    }

    pub fn points_overflow(balance: Points) -> Self {
        Self {
            error: POINTS_OVERFLOW.into(),
            points: Some(balance),
        }
    }

    /// Whether this is the overflow rejection, and if so the balance it
    /// reported.
    pub fn overflow_balance(&self) -> Option<Points> {
        if self.error == POINTS_OVERFLOW {
            self.points
        } else {
            None
        }
    }

    /// Whether this is the insufficient-funds rejection, and if so the
    /// balance it reported.
    pub fn insufficient_balance(&self) -> Option<Points> {
        if self.error == NOT_ENOUGH_POINTS {
            self.points
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn add_points_missing_field_is_zero() {
        let req: AddPointsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.points, 0);
    }

    #[test]
    fn plant_response_shape() {
        let event = PlantEvent::tree_at(&Utc.with_ymd_and_hms(2025, 2, 3, 14, 0, 0).unwrap());
        let resp = PlantTreeResponse::from(PlantReceipt { balance: 500, event });
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "success": true,
                "points": 500,
                "plant": {"date": "2/3/2025", "time": "2:00:00 PM", "points": 1000, "type": "tree"},
            })
        );
    }

    #[test]
    fn not_enough_points_shape() {
        let body = ErrorResponse::not_enough_points(500);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Not enough points", "points": 500})
        );
        assert_eq!(body.insufficient_balance(), Some(500));
    }

    #[test]
    fn points_overflow_shape() {
        let body = ErrorResponse::points_overflow(7);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "Points overflow", "points": 7})
        );
        assert_eq!(body.overflow_balance(), Some(7));
        assert_eq!(body.insufficient_balance(), None);
    }

    #[test]
    fn plain_error_omits_points() {
        let body = ErrorResponse::new("invalid JSON body");
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"error": "invalid JSON body"}));
        assert_eq!(body.insufficient_balance(), None);
    }
}
