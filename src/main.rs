use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use lifeos::commands::{calendar, chat, dashboard, finance, habits, routines, settings, storage, tasks};
use lifeos::models::{
    ConfirmOutcome, CreateEventRequest, CreateHabitRequest, CreateTaskRequest, Energy, Frequency,
    Priority, ReplyKind, TaskPatch,
};
use lifeos::utils::config::{self, AssistantConfig};
use lifeos::AppState;

#[derive(Parser)]
#[command(name = "lifeos")]
#[command(about = "Tasks, habits, calendar, routine and debt plan, with an assistant chat")]
struct Cli {
    /// Data directory (database, preferences, exports)
    #[arg(short, long, env = "LIFEOS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Assistant chat endpoint
    #[arg(long, env = "LIFEOS_ASSISTANT_URL")]
    assistant_url: Option<String>,

    /// Bearer token for the assistant
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tasks
    #[command(subcommand)]
    Task(TaskCmd),
    /// Habits
    #[command(subcommand)]
    Habit(HabitCmd),
    /// Calendar events
    #[command(subcommand)]
    Event(EventCmd),
    /// Lived routine records
    #[command(subcommand)]
    Routine(RoutineCmd),
    /// Debt payoff plan
    #[command(subcommand)]
    Finance(FinanceCmd),
    /// Tone and theme
    #[command(subcommand)]
    Prefs(PrefsCmd),
    /// Talk to the assistant; without a message, opens an interactive thread
    Chat { message: Option<String> },
    /// Ask the passive panel (focus, load, pending)
    Ask { query: String },
    /// Today's overview
    Dashboard,
    /// Write a backup under <data-dir>/exports
    Export,
    /// Replace tasks, habits and calendar from a backup file
    Import { path: PathBuf },
    /// Store size and record counts
    Stats,
}

#[derive(Subcommand)]
enum TaskCmd {
    List,
    Board,
    Filter {
        #[arg(value_parser = parse_priority)]
        priority: Priority,
    },
    Add {
        title: String,
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    Rename { id: i64, title: String },
    Toggle { id: i64 },
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum HabitCmd {
    List,
    Today,
    Add {
        title: String,
        /// Weekly on this weekday (0 = Sunday .. 6 = Saturday)
        #[arg(long)]
        weekly: Option<u8>,
    },
    Toggle { id: i64 },
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum EventCmd {
    List,
    Today,
    On { date: String },
    Add {
        title: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long, value_parser = parse_energy)]
        energy: Option<Energy>,
    },
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum RoutineCmd {
    List,
    Today,
    Add { text: String },
    Rm { id: i64 },
    /// Remove greetings, fragments and unconfirmed chat entries
    Cleanup,
}

#[derive(Subcommand)]
enum FinanceCmd {
    Show,
    Add { name: String, value: f64 },
    Remove { value: f64 },
    Clear,
    Horizon { months: i64 },
    Execute,
}

#[derive(Subcommand)]
enum PrefsCmd {
    Show,
    Tone { value: String },
    AssistantTone { value: String },
    Theme { value: String },
    ToggleTheme,
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value).ok_or_else(|| "expected essential, important or optional".to_string())
}

fn parse_energy(value: &str) -> Result<Energy, String> {
    Energy::parse(value).ok_or_else(|| "expected alta, media or baixa".to_string())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

trait OrBail<T> {
    fn or_bail(self) -> anyhow::Result<T>;
}

impl<T> OrBail<T> for Result<T, String> {
    fn or_bail(self) -> anyhow::Result<T> {
        self.map_err(anyhow::Error::msg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(config::data_dir_from_env);
    let mut assistant_config = AssistantConfig::from_env().with_token(cli.token.as_deref());
    if let Some(url) = cli.assistant_url {
        assistant_config = assistant_config.with_endpoint(url);
    }

    let state = AppState::open(&data_dir, assistant_config)
        .with_context(|| format!("opening data dir {}", data_dir.display()))?;

    match cli.command {
        Command::Task(cmd) => run_task(&state, cmd).await,
        Command::Habit(cmd) => run_habit(&state, cmd).await,
        Command::Event(cmd) => run_event(&state, cmd).await,
        Command::Routine(cmd) => run_routine(&state, cmd).await,
        Command::Finance(cmd) => run_finance(&state, cmd).await,
        Command::Prefs(cmd) => run_prefs(&state, cmd).await,
        Command::Chat { message: Some(message) } => {
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            chat_turn(&state, &mut input, &message).await
        }
        Command::Chat { message: None } => chat_loop(&state).await,
        Command::Ask { query } => {
            println!("{}", chat::ask_passive(&state, query).await.or_bail()?);
            Ok(())
        }
        Command::Dashboard => print_json(&dashboard::get_dashboard_overview(&state).await.or_bail()?),
        Command::Export => {
            println!("{}", storage::export_data(&state).await.or_bail()?);
            Ok(())
        }
        Command::Import { path } => print_json(&storage::import_data(&state, path).await.or_bail()?),
        Command::Stats => print_json(&storage::get_storage_stats(&state).await.or_bail()?),
    }
}

async fn run_task(state: &AppState, cmd: TaskCmd) -> anyhow::Result<()> {
    match cmd {
        TaskCmd::List => print_json(&tasks::list_tasks(state).await.or_bail()?),
        TaskCmd::Board => print_json(&tasks::get_task_board(state).await.or_bail()?),
        TaskCmd::Filter { priority } => print_json(&tasks::tasks_by_priority(state, priority).await.or_bail()?),
        TaskCmd::Add { title, priority } => {
            let request = CreateTaskRequest { title, priority };
            print_json(&tasks::create_task(state, request).await.or_bail()?)
        }
        TaskCmd::Rename { id, title } => {
            let patch = TaskPatch {
                title: Some(title),
                ..TaskPatch::default()
            };
            print_json(&tasks::update_task(state, id, patch).await.or_bail()?)
        }
        TaskCmd::Toggle { id } => print_json(&tasks::toggle_task(state, id).await.or_bail()?),
        TaskCmd::Rm { id } => tasks::delete_task(state, id).await.or_bail(),
    }
}

async fn run_habit(state: &AppState, cmd: HabitCmd) -> anyhow::Result<()> {
    match cmd {
        HabitCmd::List => print_json(&habits::list_habits(state).await.or_bail()?),
        HabitCmd::Today => print_json(&habits::habits_for_today(state).await.or_bail()?),
        HabitCmd::Add { title, weekly } => {
            let request = CreateHabitRequest {
                title,
                frequency: Some(if weekly.is_some() { Frequency::Weekly } else { Frequency::Daily }),
                scheduled_weekday: weekly,
            };
            print_json(&habits::create_habit(state, request).await.or_bail()?)
        }
        HabitCmd::Toggle { id } => print_json(&habits::toggle_habit(state, id).await.or_bail()?),
        HabitCmd::Rm { id } => habits::delete_habit(state, id).await.or_bail(),
    }
}

async fn run_event(state: &AppState, cmd: EventCmd) -> anyhow::Result<()> {
    match cmd {
        EventCmd::List => print_json(&calendar::list_events(state).await.or_bail()?),
        EventCmd::Today => print_json(&calendar::events_for_today(state).await.or_bail()?),
        EventCmd::On { date } => print_json(&calendar::events_for_date(state, date).await.or_bail()?),
        EventCmd::Add { title, date, time, energy } => {
            let request = CreateEventRequest { title, date, time, energy };
            print_json(&calendar::create_event(state, request).await.or_bail()?)
        }
        EventCmd::Rm { id } => calendar::delete_event(state, id).await.or_bail(),
    }
}

async fn run_routine(state: &AppState, cmd: RoutineCmd) -> anyhow::Result<()> {
    match cmd {
        RoutineCmd::List => print_json(&routines::list_routines(state).await.or_bail()?),
        RoutineCmd::Today => print_json(&routines::todays_routine(state).await.or_bail()?),
        RoutineCmd::Add { text } => print_json(&routines::add_manual_routine(state, text).await.or_bail()?),
        RoutineCmd::Rm { id } => routines::delete_routine(state, id).await.or_bail(),
        RoutineCmd::Cleanup => {
            let removed = routines::cleanup_routines(state).await.or_bail()?;
            println!("{} record(s) removed", removed);
            Ok(())
        }
    }
}

async fn run_finance(state: &AppState, cmd: FinanceCmd) -> anyhow::Result<()> {
    let result = match cmd {
        FinanceCmd::Show => return print_json(&finance::get_finance_state(state).await.or_bail()?),
        FinanceCmd::Add { name, value } => finance::add_debt(state, name, value).await,
        FinanceCmd::Remove { value } => finance::remove_debt(state, value).await,
        FinanceCmd::Clear => finance::clear_debts(state).await,
        FinanceCmd::Horizon { months } => finance::set_payoff_horizon(state, months).await,
        FinanceCmd::Execute => finance::start_execution(state).await,
    };
    print_json(&result.or_bail()?)
}

async fn run_prefs(state: &AppState, cmd: PrefsCmd) -> anyhow::Result<()> {
    let prefs = match cmd {
        PrefsCmd::Show => settings::get_preferences(state).await,
        PrefsCmd::Tone { value } => settings::set_tone(state, value).await,
        PrefsCmd::AssistantTone { value } => settings::set_assistant_tone(state, value).await,
        PrefsCmd::Theme { value } => settings::set_theme(state, value).await,
        PrefsCmd::ToggleTheme => settings::toggle_theme(state).await,
    };
    print_json(&prefs.or_bail()?)
}

type Input = Lines<BufReader<Stdin>>;

async fn read_line(input: &mut Input, prompt: &str) -> anyhow::Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?)
}

/// One turn, asking on stdin when the reply proposes an action.
async fn chat_turn(state: &AppState, input: &mut Input, message: &str) -> anyhow::Result<()> {
    let Some(reply) = chat::send_chat_message(state, message.to_string()).await.or_bail()? else {
        return Ok(());
    };
    println!("lifeos> {}", reply.text);
    if reply.kind != Some(ReplyKind::ActionProposal) {
        return Ok(());
    }

    let copy = chat::get_confirmation_copy(state).await.or_bail()?;
    let prompt = match &copy {
        Some(copy) => format!("{} [s = {} / n = {}] ", copy.prompt, copy.confirm_label, copy.cancel_label),
        None => "Confirmar? [s/n] ".to_string(),
    };
    let answer = read_line(input, &prompt).await?.unwrap_or_default();

    if matches!(answer.trim().to_lowercase().as_str(), "s" | "sim" | "y" | "yes") {
        let outcome = chat::confirm_chat_action(state).await.or_bail()?;
        if outcome == ConfirmOutcome::NothingPending {
            log::warn!("nothing pending to confirm");
        }
    } else {
        chat::cancel_chat_action(state).await.or_bail()?;
    }
    if let Some(last) = chat::get_chat_messages(state).await.or_bail()?.last() {
        println!("lifeos> {}", last.text);
    }
    Ok(())
}

async fn chat_loop(state: &AppState) -> anyhow::Result<()> {
    println!("Converse com o LifeOS. Linha vazia ignora, \"sair\" encerra.");
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = read_line(&mut input, "você> ").await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("sair") {
            break;
        }
        chat_turn(state, &mut input, line).await?;
    }
    Ok(())
}
