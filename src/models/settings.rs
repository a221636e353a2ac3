use serde::{Deserialize, Deserializer, Serialize};

/// Tone used for insight and confirmation copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Calm,
    #[default]
    Balanced,
    Direct,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Calm => "calm",
            Tone::Balanced => "balanced",
            Tone::Direct => "direct",
        }
    }

    pub fn parse(value: &str) -> Option<Tone> {
        match value.trim() {
            "calm" => Some(Tone::Calm),
            "balanced" => Some(Tone::Balanced),
            "direct" => Some(Tone::Direct),
            _ => None,
        }
    }
}

/// Tone forwarded to the assistant from the simplified settings screen.
/// Kept apart from [`Tone`]; the two vocabularies phrase different messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssistantTone {
    Calmo,
    #[default]
    Direto,
    Rigido,
}

impl AssistantTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantTone::Calmo => "calmo",
            AssistantTone::Direto => "direto",
            AssistantTone::Rigido => "rigido",
        }
    }

    pub fn parse(value: &str) -> Option<AssistantTone> {
        match value.trim() {
            "calmo" => Some(AssistantTone::Calmo),
            "direto" => Some(AssistantTone::Direto),
            "rigido" => Some(AssistantTone::Rigido),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, deserialize_with = "lenient_tone")]
    pub tone: Tone,
    #[serde(default, deserialize_with = "lenient_assistant_tone")]
    pub assistant_tone: AssistantTone,
    #[serde(default, deserialize_with = "lenient_theme")]
    pub theme: Theme,
}

fn lenient_tone<'de, D: Deserializer<'de>>(d: D) -> Result<Tone, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(Tone::parse).unwrap_or_default())
}

fn lenient_assistant_tone<'de, D: Deserializer<'de>>(d: D) -> Result<AssistantTone, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(AssistantTone::parse).unwrap_or_default())
}

fn lenient_theme<'de, D: Deserializer<'de>>(d: D) -> Result<Theme, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(Theme::parse).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"tone":"shouty","assistantTone":42,"theme":"neon"}"#)
                .unwrap();
        assert_eq!(prefs, Preferences::default());

        let prefs: Preferences =
            serde_json::from_str(r#"{"tone":"loud","theme":"neon"}"#).unwrap();
        assert_eq!(prefs.tone, Tone::Balanced);
        assert_eq!(prefs.assistant_tone, AssistantTone::Direto);
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[test]
    fn known_values_round_trip() {
        let prefs = Preferences {
            tone: Tone::Direct,
            assistant_tone: AssistantTone::Rigido,
            theme: Theme::Dark,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("\"assistantTone\":\"rigido\""));
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
