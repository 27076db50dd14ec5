use serde::{Deserialize, Serialize};

use crate::plant::PlantEvent;
use crate::points::Points;
use crate::snapshot::LedgerSnapshot;

/// User card plus ledger state, as served by the profile endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub points: Points,
    #[serde(default)]
    pub plants: Vec<PlantEvent>,
}

impl Profile {
    pub fn new(name: impl Into<String>, email: impl Into<String>, snapshot: LedgerSnapshot) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points: snapshot.points,
            plants: snapshot.plants,
        }
    }

    /// The ledger half of the profile.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            points: self.points,
            plants: self.plants.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_snapshot() {
        let snap = LedgerSnapshot::with_balance(700);
        let profile = Profile::new("Alex", "alex@ecotrack.com", snap.clone());
        assert_eq!(profile.snapshot(), snap);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Alex");
        assert_eq!(json["points"], 700);
        assert!(json["plants"].as_array().unwrap().is_empty());
    }
}
