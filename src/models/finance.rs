use serde::{Deserialize, Serialize};

pub const FINANCE_STATE_ID: i64 = 1;

/// Stages of the simplified debt payoff plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinancePhase {
    StopTheBleeding,
    DefineTotalAndHorizon,
    ComputePace,
    Execute,
    DebtFree,
}

impl FinancePhase {
    pub fn code(&self) -> &'static str {
        match self {
            FinancePhase::StopTheBleeding => "1",
            FinancePhase::DefineTotalAndHorizon => "2",
            FinancePhase::ComputePace => "3",
            FinancePhase::Execute => "4",
            FinancePhase::DebtFree => "5",
        }
    }

    pub fn from_code(code: &str) -> Option<FinancePhase> {
        match code.trim() {
            "1" => Some(FinancePhase::StopTheBleeding),
            "2" => Some(FinancePhase::DefineTotalAndHorizon),
            "3" => Some(FinancePhase::ComputePace),
            "4" => Some(FinancePhase::Execute),
            "5" => Some(FinancePhase::DebtFree),
            _ => None,
        }
    }

    pub fn focus_label(&self) -> &'static str {
        match self {
            FinancePhase::StopTheBleeding => "Parar sangria",
            FinancePhase::DefineTotalAndHorizon => "Definir total e prazo",
            FinancePhase::ComputePace => "Calcular ritmo",
            FinancePhase::Execute => "Executar e repetir",
            FinancePhase::DebtFree => "Dívida zerada",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinanceState {
    pub fase_atual: Option<String>,
    pub total_divida: Option<f64>,
    pub prazo_alvo_meses: Option<i64>,
    pub ritmo_mensal: Option<f64>,
    pub ritmo_diario: Option<f64>,
    pub foco_atual: Option<String>,
    pub ultima_atualizacao: i64,
}

impl FinanceState {
    pub fn phase(&self) -> Option<FinancePhase> {
        self.fase_atual.as_deref().and_then(FinancePhase::from_code)
    }

    pub fn cleared(now_ms: i64) -> Self {
        Self {
            ultima_atualizacao: now_ms,
            ..Self::default()
        }
    }
}
