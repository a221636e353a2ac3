use crate::models::FinanceState;
use crate::services::finance_actions;
use crate::state::AppState;
use crate::utils::now_ms;

pub async fn get_finance_state(state: &AppState) -> Result<Option<FinanceState>, String> {
    finance_actions::get_finance_state(&state.store).map_err(|e| e.to_string())
}

pub async fn add_debt(state: &AppState, name: String, value: f64) -> Result<FinanceState, String> {
    finance_actions::add_debt(&state.store, &name, value, now_ms()).map_err(|e| e.to_string())
}

pub async fn remove_debt(state: &AppState, value: f64) -> Result<FinanceState, String> {
    finance_actions::remove_debt_by_value(&state.store, value, now_ms()).map_err(|e| e.to_string())
}

pub async fn clear_debts(state: &AppState) -> Result<FinanceState, String> {
    finance_actions::clear_all_debts(&state.store, now_ms()).map_err(|e| e.to_string())
}

pub async fn set_payoff_horizon(state: &AppState, months: i64) -> Result<FinanceState, String> {
    finance_actions::set_payoff_horizon(&state.store, months, now_ms()).map_err(|e| e.to_string())
}

pub async fn start_execution(state: &AppState) -> Result<FinanceState, String> {
    finance_actions::start_execution(&state.store, now_ms()).map_err(|e| e.to_string())
}
