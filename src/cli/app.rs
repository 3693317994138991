//! CLI module for the studynotes application
//!
//! This module handles the command-line interface for interacting with the
//! note store and the focus timer.
use std::{
    fs::{read_to_string, OpenOptions},
    io::{stdin, stdout, Write},
    path::Path,
    process::Command,
};

use log::info;
use shell_words::split;
use tempfile::Builder;

use crate::{
    render_note, render_notes, render_stats, render_timer, strip_editor_comments, Commands,
    Config, Dashboard, FileKvStore, FocusTicker, FocusTimer, NoteId, NoteStore, Result,
    StudyError, StudyStatsProvider, TimerPhase,
};

/// CLI Application handler - processes CLI commands against the note store
pub struct App {
    /// The note store backend
    note_store: NoteStore,

    /// Application configuration
    config: Config,

    /// Source of the weekly study figure
    stats: Box<dyn StudyStatsProvider>,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given store and config
    pub fn new(
        note_store: NoteStore,
        config: Config,
        stats: Box<dyn StudyStatsProvider>,
        verbose: bool,
    ) -> Self {
        Self {
            note_store,
            config,
            stats,
            verbose,
        }
    }

    /// Opens the file-backed note store described by `config`.
    pub fn open_store(config: &Config) -> Result<NoteStore> {
        let kv = FileKvStore::open(&config.data_dir)?;
        Ok(NoteStore::open(Box::new(kv), config.storage_slot.clone()))
    }

    /// Run the CLI application with the given command
    pub async fn run(mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                content,
                edit,
            } => self.add_note(title, content, edit)?,

            Commands::List { search, json } => self.list_notes(search, json)?,

            Commands::Toggle { id } => self.toggle_note(id)?,

            Commands::Delete { id, force } => self.handle_delete(id, force)?,

            Commands::Focus { minutes } => self.run_focus(minutes).await?,

            Commands::Stats => println!("{}", render_stats(self.stats.as_ref())),

            Commands::Shell => {
                let ticker = FocusTicker::new(FocusTimer::new(self.config.default_focus_minutes));
                Dashboard::new(self.note_store, ticker, self.stats)
                    .run()
                    .await?
            }
        }

        Ok(())
    }

    fn add_note(&mut self, title: Option<String>, content: Option<String>, edit: bool) -> Result<()> {
        let title = title.unwrap_or_default();

        let content = match (content, edit) {
            (Some(c), _) => c,
            (None, true) => self.open_editor_for_content(&title)?,
            (None, false) => String::new(),
        };

        match self.note_store.create(&title, &content) {
            Some(note) => {
                println!("Note created with ID: {}", note.id);
                if self.verbose {
                    println!("{}", render_note(note));
                }
            }
            None => println!("Nothing to add: title and content are both empty."),
        }
        Ok(())
    }

    fn open_editor_for_content(&self, title: &str) -> Result<String> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        let editor_cmd = self.config.get_editor_command();
        self.write_editor_template(&temp_path, title)?;

        info!("Opening editor to write note content. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(strip_editor_comments(&content))
    }

    fn write_editor_template(&self, path: &Path, title: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).open(path)?;

        writeln!(file, "<!--")?;
        if !title.trim().is_empty() {
            writeln!(file, "Note: {}", title.trim())?;
        }
        writeln!(file, "Key ideas, formulas, code snippets...")?;
        writeln!(file, "Lines between <!-- and --> are ignored.")?;
        writeln!(file, "-->")?;
        writeln!(file)?;

        Ok(())
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let args = split(editor_cmd).map_err(|e| StudyError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(StudyError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(file_path)
            .status()
            .map_err(|e| StudyError::EditorError {
                message: format!("Failed to launch editor '{}': {}", program, e),
            })?;

        if !status.success() {
            return Err(StudyError::EditorError {
                message: format!("Editor exited with status {}", status),
            });
        }
        Ok(())
    }

    /// List notes matching the optional search term, newest first
    fn list_notes(&self, search: Option<String>, json: bool) -> Result<()> {
        let query = search.unwrap_or_default();
        let view = self.note_store.filter(&query);

        if json {
            let notes: Vec<_> = view.iter().collect();
            println!("{}", serde_json::to_string_pretty(&notes)?);
        } else {
            print!("{}", render_notes(&view));
        }
        Ok(())
    }

    fn toggle_note(&mut self, id: NoteId) -> Result<()> {
        let is_done = self
            .note_store
            .toggle_done(id)
            .ok_or(StudyError::NoteNotFound { id })?;

        println!(
            "Note {} marked {}",
            id,
            if is_done { "done" } else { "pending" }
        );
        Ok(())
    }

    fn handle_delete(&mut self, id: NoteId, force: bool) -> Result<()> {
        // Step 1: Fetch the note to show it in the prompt
        let Some(note) = self.note_store.get(id) else {
            return Err(StudyError::NoteNotFound { id });
        };

        // Step 2: Confirm unless forced
        if !force {
            println!("You are about to delete the following note:");
            println!("{}", render_note(note));
            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this note? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        // Step 3: Delete the note
        if let Some(removed) = self.note_store.delete(id) {
            println!(
                "Note '{}' ({}) has been permanently deleted.",
                removed.title, removed.id
            );
        }
        Ok(())
    }

    /// Counts a focus session down in place until it expires or Ctrl-C.
    async fn run_focus(&self, minutes: Option<String>) -> Result<()> {
        let mut ticker = FocusTicker::new(FocusTimer::new(self.config.default_focus_minutes));

        if let Some(minutes) = minutes {
            if ticker.apply_minutes(&minutes).await?.is_none() {
                println!(
                    "Ignoring invalid duration {:?}, using {} minutes",
                    minutes, self.config.default_focus_minutes
                );
            }
        }

        let mut timer_rx = ticker.subscribe();
        let started = ticker.toggle().await?;
        print!("{}", render_timer(&started));
        stdout().flush()?;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = timer_rx.borrow_and_update().clone();
                    print!("\r{}", render_timer(&snapshot));
                    stdout().flush()?;
                    if snapshot.phase == TimerPhase::Expired {
                        println!("\nFocus session complete.");
                        break;
                    }
                }
                _ = &mut ctrl_c => {
                    println!("\nFocus session interrupted.");
                    break;
                }
            }
        }

        ticker.shutdown().await
    }
}
