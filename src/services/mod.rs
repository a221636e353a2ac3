pub mod assistant_client;
pub mod chat_context;
pub mod chat_session;
pub mod dashboard_engine;
pub mod data_transfer;
pub mod finance_actions;
pub mod insight_engine;
pub mod preferences;
pub mod routine_cleanup;
pub mod tone_adapter;
