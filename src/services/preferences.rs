use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::LifeResult;
use crate::models::{AssistantTone, Preferences, Theme, Tone};

pub const PREFERENCES_FILE: &str = "preferences.json";

pub type PreferenceListener = Box<dyn Fn(&Preferences) + Send + Sync>;

/// Tone and theme choices, persisted under `config/` and pushed to whoever
/// subscribed whenever a value actually changes.
pub struct PreferencesService {
    path: PathBuf,
    current: RwLock<Preferences>,
    listeners: Mutex<Vec<PreferenceListener>>,
}

impl PreferencesService {
    pub fn load(data_dir: &Path) -> LifeResult<Self> {
        let path = data_dir.join("config").join(PREFERENCES_FILE);
        let current = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable {}: {}", path.display(), e);
                Preferences::default()
            })
        } else {
            Preferences::default()
        };

        Ok(Self {
            path,
            current: RwLock::new(current),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Preferences {
        *self.current.read().unwrap_or_else(|p| p.into_inner())
    }

    pub fn subscribe(&self, listener: PreferenceListener) {
        self.listeners
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(listener);
    }

    pub fn set_tone(&self, tone: Tone) -> LifeResult<Preferences> {
        self.update(|p| p.tone = tone)
    }

    pub fn set_assistant_tone(&self, tone: AssistantTone) -> LifeResult<Preferences> {
        self.update(|p| p.assistant_tone = tone)
    }

    pub fn set_theme(&self, theme: Theme) -> LifeResult<Preferences> {
        self.update(|p| p.theme = theme)
    }

    pub fn toggle_theme(&self) -> LifeResult<Preferences> {
        self.update(|p| p.theme = p.theme.toggled())
    }

    fn update(&self, change: impl FnOnce(&mut Preferences)) -> LifeResult<Preferences> {
        let (before, after) = {
            let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
            let before = *guard;
            let mut next = before;
            change(&mut next);
            if next != before {
                self.persist(&next)?;
                *guard = next;
            }
            (before, next)
        };

        if after != before {
            log::debug!("preferences changed: {:?}", after);
            for listener in self.listeners.lock().unwrap_or_else(|p| p.into_inner()).iter() {
                listener(&after);
            }
        }
        Ok(after)
    }

    fn persist(&self, prefs: &Preferences) -> LifeResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(prefs)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
