//! Interactive dashboard: the note form, search box, note list and focus
//! timer composed into one line-driven screen.
use std::fmt::Write;

use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::{
    render_notes, render_stats, render_timer, FocusTicker, NoteDraft, NoteId, NoteStore, Result,
    StudyStatsProvider, TimerPhase, TimerSnapshot,
};

pub const HELP: &str = "\
Commands:
  title <text>     set the note title
  body <text>      append a line to the note body
  clear            discard the note draft
  add              save the draft as a note
  search [text]    filter notes (no text shows all)
  done <id>        mark a note done / pending
  del <id>         delete a note
  minutes <n>      type a focus length in minutes
  set              apply the typed focus length
  start            start, pause or restart the focus session
  reset            stop and reload the focus session
  show             redraw the dashboard
  help             show this help
  quit             leave the dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Title(String),
    Body(String),
    ClearDraft,
    Add,
    Search(String),
    Done(NoteId),
    Delete(NoteId),
    Minutes(String),
    SetMinutes,
    StartPause,
    Reset,
    Show,
    Help,
    Quit,
}

/// Parses one input line. Errors carry a message for the user.
pub fn parse_command(line: &str) -> std::result::Result<DashboardCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let note_id = |rest: &str| {
        rest.parse::<NoteId>()
            .map_err(|_| format!("Expected a note ID, got {:?}", rest))
    };

    let command = match word.to_lowercase().as_str() {
        "title" => DashboardCommand::Title(rest.to_string()),
        "body" => DashboardCommand::Body(rest.to_string()),
        "clear" => DashboardCommand::ClearDraft,
        "add" => DashboardCommand::Add,
        "search" => DashboardCommand::Search(rest.to_string()),
        "done" => DashboardCommand::Done(note_id(rest)?),
        "del" | "delete" => DashboardCommand::Delete(note_id(rest)?),
        "minutes" => DashboardCommand::Minutes(rest.to_string()),
        "set" => DashboardCommand::SetMinutes,
        "start" | "pause" | "restart" => DashboardCommand::StartPause,
        "reset" => DashboardCommand::Reset,
        "show" | "" => DashboardCommand::Show,
        "help" | "?" => DashboardCommand::Help,
        "quit" | "exit" => DashboardCommand::Quit,
        other => return Err(format!("Unknown command: {} (type 'help')", other)),
    };
    Ok(command)
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

pub struct Dashboard {
    store: NoteStore,
    draft: NoteDraft,
    search: String,
    ticker: FocusTicker,
    timer_rx: watch::Receiver<TimerSnapshot>,
    stats: Box<dyn StudyStatsProvider>,
}

impl Dashboard {
    pub fn new(store: NoteStore, ticker: FocusTicker, stats: Box<dyn StudyStatsProvider>) -> Self {
        let timer_rx = ticker.subscribe();
        Self {
            store,
            draft: NoteDraft::default(),
            search: String::new(),
            ticker,
            timer_rx,
            stats,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn timer(&self) -> TimerSnapshot {
        self.timer_rx.borrow().clone()
    }

    pub async fn execute(&mut self, command: DashboardCommand) -> Result<Flow> {
        debug!("Dashboard command: {:?}", command);
        let message = match command {
            DashboardCommand::Title(title) => {
                self.draft.title = title;
                None
            }
            DashboardCommand::Body(line) => {
                if !self.draft.content.is_empty() {
                    self.draft.content.push('\n');
                }
                self.draft.content.push_str(&line);
                None
            }
            DashboardCommand::ClearDraft => {
                self.draft.clear();
                None
            }
            DashboardCommand::Add => self
                .store
                .create_from_draft(&mut self.draft)
                .map(|id| format!("Added note {}", id)),
            DashboardCommand::Search(query) => {
                self.search = query;
                Some(render_notes(&self.store.filter(&self.search)))
            }
            DashboardCommand::Done(id) => match self.store.toggle_done(id) {
                Some(true) => Some(format!("Note {} marked done", id)),
                Some(false) => Some(format!("Note {} marked pending", id)),
                None => Some(format!("Note not found: {}", id)),
            },
            DashboardCommand::Delete(id) => match self.store.delete(id) {
                Some(note) => Some(format!("Deleted '{}'", note.title)),
                None => Some(format!("Note not found: {}", id)),
            },
            DashboardCommand::Minutes(input) => {
                self.ticker.set_minutes_input(&input).await;
                None
            }
            DashboardCommand::SetMinutes => {
                self.ticker.apply_pending_minutes().await?;
                Some(render_timer(&self.timer()))
            }
            DashboardCommand::StartPause => Some(render_timer(&self.ticker.toggle().await?)),
            DashboardCommand::Reset => Some(render_timer(&self.ticker.reset().await?)),
            DashboardCommand::Show => Some(self.render()),
            DashboardCommand::Help => Some(HELP.to_string()),
            DashboardCommand::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(message))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", render_timer(&self.timer()));
        let _ = writeln!(out, "{}", render_stats(self.stats.as_ref()));
        let _ = writeln!(
            out,
            "Draft: title={:?} body={:?}",
            self.draft.title, self.draft.content
        );
        if !self.search.is_empty() {
            let _ = writeln!(out, "Search: {:?}", self.search);
        }
        out.push_str(&render_notes(&self.store.filter(&self.search)));
        out
    }

    /// Reads commands from stdin until `quit` or end of input. Announces
    /// when a focus session runs out while waiting for input.
    pub async fn run(mut self) -> Result<()> {
        info!("Dashboard started");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut timer_rx = self.ticker.subscribe();
        let mut announced = false;

        println!("{}", self.render());
        println!("Type 'help' for commands.");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(command) => match self.execute(command).await? {
                            Flow::Quit => break,
                            Flow::Continue(Some(message)) => println!("{}", message),
                            Flow::Continue(None) => {}
                        },
                        Err(message) => println!("{}", message),
                    }
                }
                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let expired = timer_rx.borrow_and_update().phase == TimerPhase::Expired;
                    if expired && !announced {
                        println!("Focus session complete. Type 'start' to restart.");
                    }
                    announced = expired;
                }
            }
        }

        self.ticker.shutdown().await?;
        info!("Dashboard closed");
        Ok(())
    }
}
