//! Interactive session
//!
//! Input screen → results screen → reset, driven by [`Session`]. Results
//! render immediately with the rates on hand; live rates are fetched in a
//! background task and re-rendered when they arrive for the view that is
//! still on screen, even if the prompt is already waiting for input.

pub mod progress;
pub mod readline;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::ExternalPrinter;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

use crate::cli::formatters::format_results_table;
use crate::cli::help::{render_help, RenderOpts};
use crate::config::Config;
use crate::models::{MarketRateSet, RateOrigin};
use crate::rates;
use crate::session::{AppState, FetchTicket, Session};

const INPUT_PROMPT: &str = "R$ ";
const RESULTS_PROMPT: &str = "[n] nova simulação  [q] sair > ";

/// What the loop should do after a line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ShowResults(FetchTicket),
    Reset,
    /// Confirm was inert; carries a notice for the user
    Rejected(String),
    Ignored,
}

/// Apply one line of input to the session
pub fn handle_line(session: &mut Session, line: &str) -> Action {
    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();
    match lowered.trim_start_matches('/') {
        "q" | "quit" | "exit" | "sair" => return Action::Quit,
        "?" | "help" | "ajuda" => return Action::Help,
        _ => {}
    }

    match session.state() {
        AppState::AwaitingInput => match session.confirm(trimmed) {
            Ok(ticket) => Action::ShowResults(ticket),
            Err(e) => Action::Rejected(e.to_string()),
        },
        AppState::ShowingResults(_) => match lowered.as_str() {
            "n" | "nova" | "reset" => {
                session.reset();
                Action::Reset
            }
            _ => Action::Ignored,
        },
    }
}

/// Where refreshed results go once the loop stopped waiting for them
trait RefreshPrinter: Send {
    fn print(&mut self, text: String);
}

/// Writes above the active readline prompt
struct PromptPrinter<P>(P);

impl<P: ExternalPrinter + Send> RefreshPrinter for PromptPrinter<P> {
    fn print(&mut self, text: String) {
        if let Err(e) = self.0.print(text) {
            debug!("External print failed: {}", e);
        }
    }
}

/// Used when the terminal offers no external printer
struct StdoutPrinter;

impl RefreshPrinter for StdoutPrinter {
    fn print(&mut self, text: String) {
        print!("{}", text);
    }
}

type SharedSession = Arc<Mutex<Session>>;
type SharedPrinter = Arc<Mutex<Box<dyn RefreshPrinter>>>;

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct RateUpdate {
    ticket: FetchTicket,
    rates: MarketRateSet,
    origin: RateOrigin,
}

/// Background rate fetches, one per results view
struct RateRefresher {
    config: Config,
    session: SharedSession,
    printer: SharedPrinter,
}

impl RateRefresher {
    fn new(config: Config, session: SharedSession, printer: Box<dyn RefreshPrinter>) -> Self {
        Self {
            config,
            session,
            printer: Arc::new(Mutex::new(printer)),
        }
    }

    /// Fetch rates for `ticket`. The receiver yields the refreshed view if
    /// live rates were applied while it is still held; once it is dropped
    /// the refresh is printed above the prompt instead.
    fn spawn(&self, ticket: FetchTicket) -> oneshot::Receiver<String> {
        let (waiting_tx, waiting_rx) = oneshot::channel();
        let config = self.config.clone();
        let session = Arc::clone(&self.session);
        let printer = Arc::clone(&self.printer);
        tokio::spawn(async move {
            let (rates, origin) = rates::current_rates(&config).await;
            let update = RateUpdate {
                ticket,
                rates,
                origin,
            };
            deliver(&session, &printer, update, waiting_tx);
        });
        waiting_rx
    }
}

/// Apply `update` and show the refreshed results when live rates replaced
/// the ones on screen. Returns whether anything was shown.
fn deliver(
    session: &Mutex<Session>,
    printer: &Mutex<Box<dyn RefreshPrinter>>,
    update: RateUpdate,
    waiting: oneshot::Sender<String>,
) -> bool {
    // Held until printed, so a reset cannot slip in between
    let mut session = lock(session);
    let origin = update.origin;
    let applied = session.apply_rates(update.ticket, update.rates, origin);
    debug!("Rate update ({}) applied: {}", origin.as_str(), applied);
    if !applied || origin != RateOrigin::Live {
        return false;
    }

    let Some(view) = results_view(&session) else {
        return false;
    };
    let text = refreshed(&view);
    if let Err(text) = waiting.send(text) {
        lock(printer).print(text);
    }
    true
}

fn results_view(session: &Session) -> Option<String> {
    match (session.state(), session.projections()) {
        (AppState::ShowingResults(principal), Some(rows)) => {
            let (_, origin) = session.rates();
            Some(format_results_table(principal, &rows, origin))
        }
        _ => None,
    }
}

fn refreshed(view: &str) -> String {
    format!("\n{} Taxas atualizadas\n{}", "✓".green().bold(), view)
}

fn print_banner() {
    println!(
        "\n{} {}",
        "Se você ganhasse na".bold(),
        "Mega-Sena...".yellow().bold().italic()
    );
    println!(
        "Digite o valor do prêmio (os dois últimos dígitos são centavos), {} para ajuda, {} para sair\n",
        "?".cyan(),
        "q".cyan()
    );
}

/// Launch the interactive session.
pub async fn launch_interactive(config: &Config) -> Result<()> {
    let session: SharedSession = Arc::new(Mutex::new(Session::new(config.fallback_rates()?)));
    let mut rl = readline::Readline::new()?;
    let printer: Box<dyn RefreshPrinter> = match rl.external_printer() {
        Ok(printer) => Box::new(PromptPrinter(printer)),
        Err(e) => {
            debug!("No external printer ({}), late refreshes go to stdout", e);
            Box::new(StdoutPrinter)
        }
    };
    let refresher = RateRefresher::new(config.clone(), Arc::clone(&session), printer);

    print_banner();

    loop {
        let state = lock(&session).state();
        let line = match state {
            AppState::AwaitingInput => rl.read_amount(INPUT_PROMPT),
            AppState::ShowingResults(_) => rl.read_command(RESULTS_PROMPT),
        };

        match line {
            Ok(line) => {
                let action = handle_line(&mut lock(&session), &line);
                match action {
                    Action::Quit => {
                        println!("Até logo!");
                        break;
                    }
                    Action::Help => {
                        render_help(std::io::stdout(), &RenderOpts::default())?;
                    }
                    Action::ShowResults(ticket) => {
                        if let Some(view) = results_view(&lock(&session)) {
                            print!("{}", view);
                        }
                        if config.offline {
                            continue;
                        }

                        let mut waiting = refresher.spawn(ticket);
                        let spinner = progress::spinner("Buscando taxas do Banco Central...");
                        let outcome = timeout(config.refresh_grace(), &mut waiting).await;
                        // Anything sent after this point goes to the printer
                        waiting.close();
                        spinner.finish_and_clear();
                        match outcome {
                            Ok(Ok(text)) => print!("{}", text),
                            Ok(Err(_)) => {}
                            Err(_) => {
                                if let Ok(text) = waiting.try_recv() {
                                    print!("{}", text);
                                }
                            }
                        }
                    }
                    Action::Reset => {
                        println!();
                        print_banner();
                    }
                    Action::Rejected(reason) => {
                        println!("{} {}", "ℹ".blue().bold(), reason);
                    }
                    Action::Ignored => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Até logo!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
