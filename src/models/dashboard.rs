use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverloadLevel {
    #[serde(rename = "baixo")]
    Baixo,
    #[serde(rename = "médio")]
    Medio,
    #[serde(rename = "alto")]
    Alto,
}

impl OverloadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverloadLevel::Baixo => "baixo",
            OverloadLevel::Medio => "médio",
            OverloadLevel::Alto => "alto",
        }
    }
}

/// Running-commentary snapshot of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifeContext {
    pub open_tasks: usize,
    pub habits_at_risk: usize,
    pub today_events: usize,
    pub overload_level: OverloadLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarLoad {
    Light,
    Balanced,
    Heavy,
}

/// Dashboard-card and passive-chat signals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyInsights {
    pub overdue_tasks_count: usize,
    pub habits_at_risk: usize,
    pub calendar_load: CalendarLoad,
    pub has_priority_today: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    HabitsAtRisk,
    CalendarOverload,
    OpenTasks,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub date_key: String,
    pub context: LifeContext,
    pub daily: DailyInsights,
    pub insights: Vec<Insight>,
    /// Primary insight phrased for the current tone.
    pub message: Option<String>,
    pub passive_opener: String,
    pub updated_at: i64,
}
