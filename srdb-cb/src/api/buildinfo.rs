//! Build information API endpoint

use axum::{extract::State, response::Json};
use serde::Serialize;
use std::fmt;

use crate::AppState;

/// Compile-time build identification
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            build_profile: env!("BUILD_PROFILE"),
        }
    }
}

impl fmt::Display for BuildInfo {
    /// `v0.1.0 [1a2b3c4d] built <timestamp> (release)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{} [{}] built {} ({})",
            self.version, self.git_hash, self.build_timestamp, self.build_profile
        )
    }
}

#[derive(Debug, Serialize)]
pub struct BuildInfoResponse {
    #[serde(flatten)]
    pub build: BuildInfo,
    /// Configured data directory or base URL
    pub data_source: String,
}

/// GET /api/buildinfo
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfoResponse> {
    Json(BuildInfoResponse {
        build: BuildInfo::current(),
        data_source: state.source.describe(),
    })
}
