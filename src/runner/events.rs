use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;
use tokio::sync::broadcast;

use super::state::{Outcome, OutcomeStatus};
use crate::scenario::Scenario;

/// Probe events for real-time updates
#[derive(Debug, Clone)]
pub enum ProbeEvent {
    Authenticated {
        base_url: String,
    },
    AuthFailed {
        reason: String,
    },
    ScenarioStarted {
        scenario: Scenario,
    },
    /// A dependent scenario had to create a booking first
    BookingCreatedImplicitly {
        scenario: Scenario,
        booking_id: Option<i64>,
    },
    ScenarioFinished {
        scenario: Scenario,
        outcome: Outcome,
    },
}

/// Event emitter for broadcasting probe events
pub struct EventEmitter {
    sender: broadcast::Sender<ProbeEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<ProbeEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: ProbeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProbeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<ProbeEvent>) {
        let mut spinner: Option<ProgressBar> = None;

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                ProbeEvent::Authenticated { base_url } => {
                    println!("{} Authenticated against {}", "🔑".green(), base_url.cyan());
                }
                ProbeEvent::AuthFailed { reason } => {
                    println!(
                        "{} Login failed, mutating scenarios will run unauthorized: {}",
                        "⚠".yellow(),
                        reason
                    );
                }
                ProbeEvent::ScenarioStarted { scenario } => {
                    let pb = if std::io::stdout().is_terminal() {
                        ProgressBar::new_spinner()
                    } else {
                        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
                    };
                    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
                        pb.set_style(style);
                    }
                    pb.set_message(scenario.display_name().to_string());
                    pb.enable_steady_tick(Duration::from_millis(100));
                    spinner = Some(pb);
                }
                ProbeEvent::BookingCreatedImplicitly { booking_id, .. } => {
                    let line = match booking_id {
                        Some(id) => format!("    ↳ created booking {} first", id),
                        None => "    ↳ implicit booking creation failed".to_string(),
                    };
                    match &spinner {
                        Some(pb) => pb.println(line.dimmed().to_string()),
                        None => println!("{}", line.dimmed()),
                    }
                }
                ProbeEvent::ScenarioFinished { outcome, .. } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    println!("{}", format_outcome_line(&outcome));
                }
            }
        }
    }
}

/// One colored console line per outcome
pub fn format_outcome_line(outcome: &Outcome) -> String {
    let marker = match outcome.status {
        OutcomeStatus::Passed => "✓".green().bold(),
        OutcomeStatus::Failed => "✗".red().bold(),
        OutcomeStatus::Error => "!".yellow().bold(),
    };
    format!(
        "  {} {} {} ({}ms) - {}",
        marker,
        outcome.test_name.white().bold(),
        format!("[{}]", outcome.status_code).dimmed(),
        outcome.duration_ms,
        outcome.message
    )
}
