use chrono::Local;

use crate::models::{DailyInsights, DashboardOverview, LifeContext};
use crate::services::dashboard_engine::build_dashboard_overview;
use crate::services::insight_engine::{load_daily_insights, load_life_context};
use crate::state::AppState;

pub async fn get_dashboard_overview(state: &AppState) -> Result<DashboardOverview, String> {
    build_dashboard_overview(&state.store, &Local::now(), state.preferences.get().tone)
        .map_err(|e| e.to_string())
}

pub async fn get_life_context(state: &AppState) -> Result<LifeContext, String> {
    load_life_context(&state.store, &Local::now()).map_err(|e| e.to_string())
}

pub async fn get_daily_insights(state: &AppState) -> Result<DailyInsights, String> {
    load_daily_insights(&state.store, &Local::now()).map_err(|e| e.to_string())
}
