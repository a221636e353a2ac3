//! Every change to the debt plan goes through these functions; nothing else
//! writes the finance singleton.

use crate::database::LocalStore;
use crate::error::{LifeError, LifeResult};
use crate::models::{FinancePhase, FinanceState};

const DAYS_PER_MONTH: f64 = 30.0;

fn current(store: &LocalStore) -> LifeResult<Option<FinanceState>> {
    store.get_finance_state()
}

fn save(store: &LocalStore, state: FinanceState) -> LifeResult<FinanceState> {
    store.put_finance_state(&state)?;
    log::debug!(
        "finance state saved: phase {:?}, total {:?}",
        state.fase_atual,
        state.total_divida
    );
    Ok(state)
}

fn with_phase(mut state: FinanceState, phase: FinancePhase) -> FinanceState {
    state.fase_atual = Some(phase.code().to_string());
    state.foco_atual = Some(phase.focus_label().to_string());
    state
}

/// Adds `value` to the running debt total and restarts the plan at phase 1.
/// Horizon and pacing from earlier steps are kept.
pub fn add_debt(store: &LocalStore, name: &str, value: f64, now_ms: i64) -> LifeResult<FinanceState> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LifeError::validation("Valor deve ser maior que zero"));
    }
    let previous = current(store)?.unwrap_or_default();
    let total = previous.total_divida.unwrap_or(0.0) + value;
    log::info!("debt added: {} ({:.2})", name.trim(), value);

    let state = FinanceState {
        total_divida: Some(total),
        ultima_atualizacao: now_ms,
        ..previous
    };
    save(store, with_phase(state, FinancePhase::StopTheBleeding))
}

/// Subtracts `value` from the total. When nothing is left, phase, total and
/// focus are cleared together.
pub fn remove_debt_by_value(store: &LocalStore, value: f64, now_ms: i64) -> LifeResult<FinanceState> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LifeError::validation("Valor deve ser maior que zero"));
    }
    let previous = match current(store)? {
        Some(state) if state.total_divida.map_or(false, |t| t != 0.0) => state,
        _ => return Err(LifeError::validation("Não há dívidas para remover")),
    };

    let remaining = previous.total_divida.unwrap_or(0.0) - value;
    let state = if remaining > 0.0 {
        FinanceState {
            total_divida: Some(remaining),
            ultima_atualizacao: now_ms,
            ..previous
        }
    } else {
        FinanceState {
            fase_atual: None,
            total_divida: None,
            foco_atual: None,
            ultima_atualizacao: now_ms,
            ..previous
        }
    };
    save(store, state)
}

pub fn clear_all_debts(store: &LocalStore, now_ms: i64) -> LifeResult<FinanceState> {
    log::info!("all debts cleared");
    save(store, FinanceState::cleared(now_ms))
}

/// Fixes the payoff horizon and derives the monthly and daily pace from the
/// current total.
pub fn set_payoff_horizon(store: &LocalStore, months: i64, now_ms: i64) -> LifeResult<FinanceState> {
    if months <= 0 {
        return Err(LifeError::validation("Prazo deve ser de pelo menos um mês"));
    }
    let previous = current(store)?.unwrap_or_default();
    let total = previous
        .total_divida
        .filter(|t| *t > 0.0)
        .ok_or_else(|| LifeError::validation("Cadastre uma dívida antes de definir o prazo"))?;

    let monthly = total / months as f64;
    let state = FinanceState {
        prazo_alvo_meses: Some(months),
        ritmo_mensal: Some(monthly),
        ritmo_diario: Some(monthly / DAYS_PER_MONTH),
        ultima_atualizacao: now_ms,
        ..previous
    };
    save(store, with_phase(state, FinancePhase::ComputePace))
}

pub fn start_execution(store: &LocalStore, now_ms: i64) -> LifeResult<FinanceState> {
    let previous = current(store)?.unwrap_or_default();
    if previous.ritmo_mensal.is_none() || previous.total_divida.is_none() {
        return Err(LifeError::validation("Defina o prazo antes de executar o plano"));
    }
    let state = FinanceState {
        ultima_atualizacao: now_ms,
        ..previous
    };
    save(store, with_phase(state, FinancePhase::Execute))
}

pub fn get_finance_state(store: &LocalStore) -> LifeResult<Option<FinanceState>> {
    current(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_debt_accumulates_and_resets_phase() {
        let store = LocalStore::open_in_memory().unwrap();
        add_debt(&store, "cartão", 1200.0, 10).unwrap();
        set_payoff_horizon(&store, 12, 20).unwrap();

        let state = add_debt(&store, "empréstimo", 300.0, 30).unwrap();
        assert_eq!(state.total_divida, Some(1500.0));
        assert_eq!(state.fase_atual.as_deref(), Some("1"));
        assert_eq!(state.foco_atual.as_deref(), Some("Parar sangria"));
        assert_eq!(state.prazo_alvo_meses, Some(12));
        assert_eq!(state.ritmo_mensal, Some(100.0));
        assert_eq!(state.ultima_atualizacao, 30);
        assert_eq!(get_finance_state(&store).unwrap(), Some(state));
    }

    #[test]
    fn rejects_non_positive_values() {
        let store = LocalStore::open_in_memory().unwrap();
        for value in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                add_debt(&store, "x", value, 1),
                Err(LifeError::Validation(_))
            ));
        }
        assert_eq!(get_finance_state(&store).unwrap(), None);
    }

    #[test]
    fn removing_everything_clears_phase_and_focus() {
        let store = LocalStore::open_in_memory().unwrap();
        add_debt(&store, "cartão", 500.0, 1).unwrap();

        let partial = remove_debt_by_value(&store, 200.0, 2).unwrap();
        assert_eq!(partial.total_divida, Some(300.0));
        assert_eq!(partial.fase_atual.as_deref(), Some("1"));

        let empty = remove_debt_by_value(&store, 400.0, 3).unwrap();
        assert_eq!(empty.total_divida, None);
        assert_eq!(empty.fase_atual, None);
        assert_eq!(empty.foco_atual, None);

        assert!(matches!(
            remove_debt_by_value(&store, 1.0, 4),
            Err(LifeError::Validation(_))
        ));
    }

    #[test]
    fn horizon_computes_pace() {
        let store = LocalStore::open_in_memory().unwrap();
        assert!(set_payoff_horizon(&store, 10, 1).is_err());

        add_debt(&store, "cartão", 3000.0, 1).unwrap();
        assert!(set_payoff_horizon(&store, 0, 2).is_err());

        let state = set_payoff_horizon(&store, 10, 2).unwrap();
        assert_eq!(state.phase(), Some(FinancePhase::ComputePace));
        assert_eq!(state.foco_atual.as_deref(), Some("Calcular ritmo"));
        assert_eq!(state.ritmo_mensal, Some(300.0));
        assert_eq!(state.ritmo_diario, Some(10.0));
    }

    #[test]
    fn execution_needs_a_pace() {
        let store = LocalStore::open_in_memory().unwrap();
        add_debt(&store, "cartão", 600.0, 1).unwrap();
        assert!(start_execution(&store, 2).is_err());

        set_payoff_horizon(&store, 6, 3).unwrap();
        let state = start_execution(&store, 4).unwrap();
        assert_eq!(state.phase(), Some(FinancePhase::Execute));
        assert_eq!(state.foco_atual.as_deref(), Some("Executar e repetir"));
    }

    #[test]
    fn clear_wipes_the_plan() {
        let store = LocalStore::open_in_memory().unwrap();
        add_debt(&store, "cartão", 600.0, 1).unwrap();
        set_payoff_horizon(&store, 6, 2).unwrap();

        let state = clear_all_debts(&store, 9).unwrap();
        assert_eq!(state, FinanceState::cleared(9));
        assert_eq!(get_finance_state(&store).unwrap(), Some(FinanceState::cleared(9)));
    }
}
