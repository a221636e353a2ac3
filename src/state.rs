use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::database::{LocalStore, DB_FILE_NAME};
use crate::error::LifeResult;
use crate::services::assistant_client::{Assistant, HttpAssistant};
use crate::services::chat_session::ChatSession;
use crate::services::preferences::PreferencesService;
use crate::utils::config::AssistantConfig;

/// Shared handles passed to every command.
pub struct AppState {
    pub data_dir: PathBuf,
    pub store: Arc<LocalStore>,
    pub preferences: PreferencesService,
    pub assistant: Arc<dyn Assistant>,
    pub chat: Mutex<ChatSession>,
}

impl AppState {
    pub fn open(data_dir: &Path, assistant_config: AssistantConfig) -> LifeResult<Self> {
        let assistant = HttpAssistant::new(assistant_config)?;
        log::debug!("assistant endpoint: {}", assistant.endpoint());
        Self::with_assistant(data_dir, Arc::new(assistant))
    }

    pub fn with_assistant(data_dir: &Path, assistant: Arc<dyn Assistant>) -> LifeResult<Self> {
        std::fs::create_dir_all(data_dir)?;
        let store = LocalStore::open(&data_dir.join(DB_FILE_NAME))?;
        let preferences = PreferencesService::load(data_dir)?;
        let chat = ChatSession::new(preferences.get().assistant_tone);

        preferences.subscribe(Box::new(|prefs| {
            log::info!(
                "preferences now tone={} assistantTone={} theme={}",
                prefs.tone.as_str(),
                prefs.assistant_tone.as_str(),
                prefs.theme.as_str()
            );
        }));

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            store: Arc::new(store),
            preferences,
            assistant,
            chat: Mutex::new(chat),
        })
    }
}
