use crate::models::{AssistantTone, Preferences, Theme, Tone};
use crate::state::AppState;

pub async fn get_preferences(state: &AppState) -> Result<Preferences, String> {
    Ok(state.preferences.get())
}

pub async fn set_tone(state: &AppState, tone: String) -> Result<Preferences, String> {
    let tone = Tone::parse(&tone).ok_or_else(|| format!("unknown tone `{}` (calm, balanced, direct)", tone))?;
    state.preferences.set_tone(tone).map_err(|e| e.to_string())
}

pub async fn set_assistant_tone(state: &AppState, tone: String) -> Result<Preferences, String> {
    let tone = AssistantTone::parse(&tone)
        .ok_or_else(|| format!("unknown assistant tone `{}` (calmo, direto, rigido)", tone))?;
    state.preferences.set_assistant_tone(tone).map_err(|e| e.to_string())
}

pub async fn set_theme(state: &AppState, theme: String) -> Result<Preferences, String> {
    let theme = Theme::parse(&theme).ok_or_else(|| format!("unknown theme `{}` (light, dark)", theme))?;
    state.preferences.set_theme(theme).map_err(|e| e.to_string())
}

pub async fn toggle_theme(state: &AppState) -> Result<Preferences, String> {
    state.preferences.toggle_theme().map_err(|e| e.to_string())
}
