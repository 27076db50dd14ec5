/// HTTP endpoint paths for the ledger API.
pub mod endpoints {
    pub const ADD_POINTS: &str = "/api/addPoints";
    pub const PLANT_TREE: &str = "/api/plantTree";
    pub const PROFILE: &str = "/api/getProfile";
    pub const PLANTS: &str = "/api/getPlants";
    pub const HEALTH: &str = "/v1/health";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn endpoint_paths() {
        assert_eq!(endpoints::HEALTH, "/v1/health");
        assert_eq!(endpoints::ADD_POINTS, "/api/addPoints");
        assert_eq!(endpoints::PLANT_TREE, "/api/plantTree");
        assert_eq!(endpoints::PROFILE, "/api/getProfile");
        assert_eq!(endpoints::PLANTS, "/api/getPlants");
    }
}
