use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chronicle_event::{CompletionStatus, TaskIdentity, TaskOutcome};
use chronicle_payload::Payload;
use chronicle_recorder::{Config, Session};

/// Chronicle - records task lifecycle events from an orchestration engine
///
/// Reads engine notifications as JSON lines from stdin and appends normalized
/// event records to the configured events file.
#[derive(Parser)]
#[command(name = "chronicle")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path of the events file (overrides CHRONICLE_EVENTS_FILE)
  #[arg(long)]
  events_file: Option<PathBuf>,
}

/// Per-task fields shared by every task notification.
#[derive(Debug, Deserialize)]
struct TaskFields {
  host: String,
  task: String,
  action: String,
  task_id: String,
}

/// One engine notification, as a JSON line on stdin.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Notification {
  /// A playbook began; its name is stamped into subsequent task events.
  PlaybookStart { playbook: String },
  /// A play began; its name becomes the current host group.
  PlayStart { name: String },
  TaskStart {
    #[serde(flatten)]
    task: TaskFields,
  },
  TaskOk {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
  },
  TaskFailed {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
    ignore_errors: Option<bool>,
  },
  TaskSkipped {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
  },
  /// Item-level skip; recorded the same way as a whole-task skip.
  TaskItemSkipped {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
  },
  TaskUnreachable {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
  },
  /// Async task failure; the engine reports these as unreachable.
  TaskAsyncFailed {
    #[serde(flatten)]
    task: TaskFields,
    result: Option<Payload>,
  },
  /// End of run: flush and close the events file.
  RunEnd,
}

/// Translates engine notifications into recorder operations, tracking the
/// current playbook and play the way the engine's callbacks scope them.
struct Adapter {
  session: Session,
  playbook: String,
  host_group: String,
}

impl Adapter {
  fn new(session: Session) -> Self {
    Self {
      session,
      playbook: String::new(),
      host_group: String::new(),
    }
  }

  fn handle(&mut self, notification: Notification) -> Result<()> {
    match notification {
      Notification::PlaybookStart { playbook } => {
        info!(playbook = %playbook, "playbook started");
        self.playbook = playbook;
      }
      Notification::PlayStart { name } => {
        self.host_group = name;
      }
      Notification::TaskStart { task } => {
        let identity = self.identity(task);
        self
          .session
          .on_task_start(&identity)
          .context("failed to record task start")?;
      }
      Notification::TaskOk { task, result } => {
        self.complete(task, CompletionStatus::Ok, result, None)?;
      }
      Notification::TaskFailed {
        task,
        result,
        ignore_errors,
      } => {
        self.complete(task, CompletionStatus::Failed, result, ignore_errors)?;
      }
      Notification::TaskSkipped { task, result }
      | Notification::TaskItemSkipped { task, result } => {
        self.complete(task, CompletionStatus::Skipped, result, None)?;
      }
      Notification::TaskUnreachable { task, result }
      | Notification::TaskAsyncFailed { task, result } => {
        self.complete(task, CompletionStatus::Unreachable, result, None)?;
      }
      Notification::RunEnd => unreachable!("run_end is handled by the notification loop"),
    }
    Ok(())
  }

  fn complete(
    &mut self,
    task: TaskFields,
    status: CompletionStatus,
    result: Option<Payload>,
    ignore_errors: Option<bool>,
  ) -> Result<()> {
    let outcome = TaskOutcome {
      identity: self.identity(task),
      status,
      result,
      ignore_errors,
    };
    self
      .session
      .on_task_complete(outcome)
      .context("failed to record task completion")
  }

  fn identity(&self, task: TaskFields) -> TaskIdentity {
    TaskIdentity {
      playbook: self.playbook.clone(),
      host: task.host,
      host_group: self.host_group.clone(),
      task: task.task,
      action: task.action,
      task_id: task.task_id,
    }
  }

  fn close(self) -> Result<()> {
    self.session.close().context("failed to close events file")
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let config = match cli.events_file {
    Some(events_file) => Config::new(events_file),
    None => Config::from_env().context("failed to read recorder configuration")?,
  };

  let session = Session::open(config).context("failed to open recording session")?;
  run(Adapter::new(session))
}

fn run(mut adapter: Adapter) -> Result<()> {
  if io::stdin().is_terminal() {
    warn!("stdin is a terminal; expecting JSON-line notifications");
  }

  for line in io::stdin().lock().lines() {
    let line = line.context("failed to read notification from stdin")?;
    if line.trim().is_empty() {
      continue;
    }

    let notification: Notification = match serde_json::from_str(&line) {
      Ok(notification) => notification,
      Err(e) => {
        warn!(error = %e, "ignoring malformed notification");
        continue;
      }
    };

    if matches!(notification, Notification::RunEnd) {
      info!("run complete");
      return adapter.close();
    }
    adapter.handle(notification)?;
  }

  // The engine went away without signaling run end; close what we have.
  warn!("notification stream ended without run_end");
  adapter.close()
}
