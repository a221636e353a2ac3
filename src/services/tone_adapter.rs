//! Canned phrasings of insight and confirmation copy per [`Tone`].

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{CalendarLoad, DailyInsights, InsightCategory, Tone};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Adapted {
    pub message: String,
    /// Action buttons stay off until assistant-driven actions exist for insights.
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationCopy {
    pub prompt: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub success_message: String,
}

/// Guess the category from message wording, as older insight producers only
/// hand over text.
pub fn detect_category(message: &str) -> InsightCategory {
    let msg = message.to_lowercase();
    if msg.contains("hábito") {
        InsightCategory::HabitsAtRisk
    } else if msg.contains("carga") || msg.contains("overload") {
        InsightCategory::CalendarOverload
    } else if msg.contains("tarefas") {
        InsightCategory::OpenTasks
    } else {
        InsightCategory::General
    }
}

pub fn adapt_insight(category: InsightCategory, base_message: &str, tone: Tone) -> Adapted {
    let category = match category {
        InsightCategory::General => detect_category(base_message),
        known => known,
    };

    let message = match (category, tone) {
        (InsightCategory::HabitsAtRisk, Tone::Calm) => {
            "Talvez seja um bom momento para desacelerar.".to_string()
        }
        (InsightCategory::HabitsAtRisk, Tone::Balanced) => {
            "Há itens da rotina em risco hoje. Considere priorizar o essencial.".to_string()
        }
        (InsightCategory::HabitsAtRisk, Tone::Direct) => {
            "Há itens da rotina em risco — corrija hoje.".to_string()
        }
        (InsightCategory::CalendarOverload, Tone::Calm) => {
            "Talvez seja um bom momento para desacelerar.".to_string()
        }
        (InsightCategory::CalendarOverload, Tone::Balanced) => {
            "Carga moderada — considere reorganizar hoje.".to_string()
        }
        (InsightCategory::CalendarOverload, Tone::Direct) => {
            "Carga alta — reorganize suas prioridades.".to_string()
        }
        (InsightCategory::OpenTasks, Tone::Calm) => {
            "Você tem algumas tarefas pendentes; vá devagar.".to_string()
        }
        (InsightCategory::OpenTasks, Tone::Balanced) => {
            "Há tarefas em aberto — foque nas prioridades.".to_string()
        }
        (InsightCategory::OpenTasks, Tone::Direct) => {
            "Muitas tarefas abertas — organize imediatamente.".to_string()
        }
        (InsightCategory::General, Tone::Calm) => format!("Observação: {}", base_message),
        (InsightCategory::General, Tone::Balanced) => base_message.to_string(),
        (InsightCategory::General, Tone::Direct) => format!("Atenção — {}", base_message),
    };

    Adapted {
        message,
        actions: Vec::new(),
    }
}

fn is_reorganize_action(action: &str) -> bool {
    let a = action.to_lowercase();
    a.contains("reorganizar tarde") || a.contains("reorganizar agora")
}

pub fn adapt_action_confirmation(action: &str, tone: Tone) -> ConfirmationCopy {
    if is_reorganize_action(action) {
        let (prompt, confirm) = match tone {
            Tone::Calm => (
                "Posso mover tarefas não essenciais para amanhã. Quer que eu faça isso?",
                "Sim, por favor",
            ),
            Tone::Balanced => (
                "Posso mover tarefas não essenciais para amanhã?",
                "Confirmar",
            ),
            Tone::Direct => ("Mover tarefas não essenciais para amanhã?", "Confirmar"),
        };
        return ConfirmationCopy {
            prompt: prompt.to_string(),
            confirm_label: confirm.to_string(),
            cancel_label: "Cancelar".to_string(),
            success_message: "Feito. Ajustei sua tarde.".to_string(),
        };
    }

    let (prompt, confirm) = match tone {
        Tone::Calm => (format!("Quer que eu execute: {}?", action), "Sim"),
        Tone::Balanced => (format!("Deseja executar: {}?", action), "Confirmar"),
        Tone::Direct => (format!("{}?", action), "Confirmar"),
    };
    ConfirmationCopy {
        prompt,
        confirm_label: confirm.to_string(),
        cancel_label: "Cancelar".to_string(),
        success_message: "Feito.".to_string(),
    }
}

// ─── Passive chat panel ───

pub const PASSIVE_FALLBACK: &str =
    "Desculpe, não entendi. Tente: foco do dia, carga do dia, pendências.";

struct PassivePatterns {
    focus: Regex,
    load: Regex,
    pending: Regex,
}

fn passive_patterns() -> &'static PassivePatterns {
    static PATTERNS: OnceLock<PassivePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| PassivePatterns {
        focus: Regex::new(r"foco|prioridad(e|em)").expect("static pattern"),
        load: Regex::new(r"carga|agenda|calend(a|ário)").expect("static pattern"),
        pending: Regex::new(r"pend|atrasad|tarefa").expect("static pattern"),
    })
}

/// Opening line of the passive panel: the most pressing daily signal.
pub fn passive_opener(insights: &DailyInsights, tone: Tone) -> String {
    if insights.overdue_tasks_count > 0 {
        let n = insights.overdue_tasks_count;
        return match tone {
            Tone::Calm => format!("{} tarefa(s) atrasada(s). Considere priorizar com calma.", n),
            Tone::Direct => format!("{} tarefa(s) atrasada(s). Priorize agora.", n),
            Tone::Balanced => format!("{} tarefa(s) atrasada(s) — pode ser bom focar nelas hoje.", n),
        };
    }

    if insights.habits_at_risk > 0 {
        let n = insights.habits_at_risk;
        return match tone {
            Tone::Calm => format!("{} item(s) da rotina em risco. Um pequeno ajuste já ajuda.", n),
            Tone::Direct => format!("{} item(s) da rotina em risco.", n),
            Tone::Balanced => format!("{} item(s) da rotina em risco — atenção leve.", n),
        };
    }

    if insights.calendar_load == CalendarLoad::Heavy {
        return match tone {
            Tone::Calm => "Hoje está carregado no calendário. Planeje pausas curtas.",
            Tone::Direct => "Dia carregado no calendário.",
            Tone::Balanced => "Dia com muita carga no calendário.",
        }
        .to_string();
    }

    match tone {
        Tone::Calm => "Tudo equilibrado — mantenha o ritmo.",
        Tone::Direct => "Nenhuma atenção imediata necessária.",
        Tone::Balanced => "Tudo equilibrado hoje.",
    }
    .to_string()
}

/// Answers the panel's predefined questions (focus, load, pending).
pub fn passive_reply(query: &str, insights: &DailyInsights, tone: Tone) -> String {
    let q = query.trim().to_lowercase();
    let patterns = passive_patterns();

    if patterns.focus.is_match(&q) {
        let text = match (insights.has_priority_today, tone) {
            (true, Tone::Direct) => "Há prioridade definida para hoje.",
            (true, Tone::Calm) => "Existe uma prioridade para hoje — considere focar nela com calma.",
            (true, Tone::Balanced) => "Existe uma prioridade para hoje.",
            (false, Tone::Calm) => "Nenhuma prioridade definida hoje — siga tranquilo.",
            (false, _) => "Nenhuma prioridade definida hoje.",
        };
        return text.to_string();
    }

    if patterns.load.is_match(&q) {
        let text = match (insights.calendar_load, tone) {
            (CalendarLoad::Heavy, Tone::Direct) => "Dia carregado no calendário.",
            (CalendarLoad::Heavy, Tone::Calm) => {
                "Seu calendário está carregado hoje. Lembre-se de pequenas pausas."
            }
            (CalendarLoad::Heavy, Tone::Balanced) => "Dia com carga alta no calendário.",
            (CalendarLoad::Light, _) => "Calendário leve hoje.",
            (CalendarLoad::Balanced, _) => "Carga do dia balanceada.",
        };
        return text.to_string();
    }

    if patterns.pending.is_match(&q) {
        let n = insights.overdue_tasks_count;
        if n == 0 {
            return "Nenhuma tarefa em atraso.".to_string();
        }
        return match tone {
            Tone::Calm => format!(
                "Há {} tarefa(s) em atraso. Talvez priorizar uma ou duas ajude.",
                n
            ),
            Tone::Direct | Tone::Balanced => format!("{} tarefa(s) em atraso.", n),
        };
    }

    PASSIVE_FALLBACK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TONES: [Tone; 3] = [Tone::Calm, Tone::Balanced, Tone::Direct];

    fn insights(overdue: usize, habits: usize, load: CalendarLoad, priority: bool) -> DailyInsights {
        DailyInsights {
            overdue_tasks_count: overdue,
            habits_at_risk: habits,
            calendar_load: load,
            has_priority_today: priority,
        }
    }

    #[test]
    fn known_categories_have_one_phrasing_per_tone() {
        for category in [
            InsightCategory::HabitsAtRisk,
            InsightCategory::CalendarOverload,
            InsightCategory::OpenTasks,
        ] {
            let messages: Vec<String> = TONES
                .iter()
                .map(|t| adapt_insight(category, "irrelevant", *t).message)
                .collect();
            assert_ne!(messages[0], messages[1]);
            assert_ne!(messages[1], messages[2]);
            assert_ne!(messages[0], messages[2]);
        }
    }

    #[test]
    fn unknown_category_wraps_base_message() {
        let base = "Semana cheia.";
        assert_eq!(
            adapt_insight(InsightCategory::General, base, Tone::Calm).message,
            "Observação: Semana cheia."
        );
        assert_eq!(
            adapt_insight(InsightCategory::General, base, Tone::Balanced).message,
            base
        );
        assert_eq!(
            adapt_insight(InsightCategory::General, base, Tone::Direct).message,
            "Atenção — Semana cheia."
        );
    }

    #[test]
    fn calm_day_keeps_its_own_wording() {
        use crate::models::{LifeContext, OverloadLevel};
        use crate::services::insight_engine::analyze_life_context;

        let insights = analyze_life_context(&LifeContext {
            open_tasks: 0,
            habits_at_risk: 0,
            today_events: 0,
            overload_level: OverloadLevel::Baixo,
        });
        let calm = &insights[1];
        assert_eq!(
            adapt_insight(calm.category, &calm.message, Tone::Direct).message,
            "Atenção — Dia tranquilo."
        );
        assert_eq!(
            adapt_insight(calm.category, &calm.message, Tone::Balanced).message,
            "Dia tranquilo."
        );
    }

    #[test]
    fn category_is_detected_from_text() {
        assert_eq!(
            detect_category("Há 2 hábito(s) em risco hoje."),
            InsightCategory::HabitsAtRisk
        );
        assert_eq!(
            detect_category("Carga alta hoje — avalie prioridades."),
            InsightCategory::CalendarOverload
        );
        assert_eq!(detect_category("Tarefas abertas: 3"), InsightCategory::OpenTasks);
        assert_eq!(
            adapt_insight(InsightCategory::General, "Tarefas abertas: 3", Tone::Direct).message,
            "Muitas tarefas abertas — organize imediatamente."
        );
    }

    #[test]
    fn reorganize_action_gets_specialized_copy() {
        let copy = adapt_action_confirmation("Reorganizar tarde", Tone::Calm);
        assert_eq!(copy.confirm_label, "Sim, por favor");
        assert_eq!(copy.success_message, "Feito. Ajustei sua tarde.");

        let copy = adapt_action_confirmation("limpar registros", Tone::Balanced);
        assert_eq!(copy.prompt, "Deseja executar: limpar registros?");
        assert_eq!(copy.cancel_label, "Cancelar");
        assert_eq!(copy.success_message, "Feito.");

        let copy = adapt_action_confirmation("limpar registros", Tone::Direct);
        assert_eq!(copy.prompt, "limpar registros?");
    }

    #[test]
    fn passive_opener_picks_most_pressing_signal() {
        let ins = insights(2, 3, CalendarLoad::Heavy, false);
        assert_eq!(
            passive_opener(&ins, Tone::Direct),
            "2 tarefa(s) atrasada(s). Priorize agora."
        );
        let ins = insights(0, 0, CalendarLoad::Heavy, false);
        assert_eq!(passive_opener(&ins, Tone::Balanced), "Dia com muita carga no calendário.");
        let ins = insights(0, 0, CalendarLoad::Light, false);
        assert_eq!(passive_opener(&ins, Tone::Calm), "Tudo equilibrado — mantenha o ritmo.");
    }

    #[test]
    fn passive_reply_matches_predefined_questions() {
        let ins = insights(3, 0, CalendarLoad::Light, true);
        assert_eq!(
            passive_reply("Qual o foco do dia?", &ins, Tone::Direct),
            "Há prioridade definida para hoje."
        );
        assert_eq!(
            passive_reply("como está a agenda", &ins, Tone::Calm),
            "Calendário leve hoje."
        );
        assert_eq!(
            passive_reply("pendências", &ins, Tone::Calm),
            "Há 3 tarefa(s) em atraso. Talvez priorizar uma ou duas ajude."
        );
        assert_eq!(passive_reply("bom dia", &ins, Tone::Calm), PASSIVE_FALLBACK);
    }
}
