use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    Alta,
    Media,
    Baixa,
}

impl Energy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Energy::Alta => "alta",
            Energy::Media => "media",
            Energy::Baixa => "baixa",
        }
    }

    pub fn parse(value: &str) -> Option<Energy> {
        match value.trim().to_lowercase().as_str() {
            "alta" => Some(Energy::Alta),
            "media" | "média" => Some(Energy::Media),
            "baixa" => Some(Energy::Baixa),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    /// `YYYY-MM-DD`. Events stored before dates existed have none and read as today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<Energy>,
}

impl CalendarEvent {
    pub fn effective_energy(&self) -> Energy {
        self.energy.unwrap_or(Energy::Media)
    }

    pub fn date_or<'a>(&'a self, today_key: &'a str) -> &'a str {
        self.date.as_deref().unwrap_or(today_key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub energy: Option<Energy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<Option<String>>,
    pub energy: Option<Energy>,
}
