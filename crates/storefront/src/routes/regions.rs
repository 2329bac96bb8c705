//! Delivery region table.

use axum::{Json, extract::State};
use serde::Serialize;

use shopyz_core::RegionRate;
use shopyz_core::region::DEFAULT_REGION;

use crate::state::AppState;

/// Region picker data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionsView {
    pub default_region: &'static str,
    pub regions: &'static [RegionRate],
}

/// All delivery regions with their rates, in table order.
pub async fn index(State(state): State<AppState>) -> Json<RegionsView> {
    Json(RegionsView {
        default_region: DEFAULT_REGION,
        regions: state.regions().rates(),
    })
}
