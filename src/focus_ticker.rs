// src/focus_ticker.rs - Periodic task driving the focus timer
use std::sync::Arc;

use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

use crate::{FocusTimer, Result, StudyError, TimerPhase};

/// Point-in-time view of the timer, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub is_running: bool,
    pub duration_minutes: u32,
    pub remaining_seconds: u32,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub button_label: &'static str,
    /// Duration text typed but not yet applied
    pub pending_minutes_input: String,
}

impl From<&FocusTimer> for TimerSnapshot {
    fn from(timer: &FocusTimer) -> Self {
        Self {
            phase: timer.phase(),
            is_running: timer.is_running(),
            duration_minutes: timer.duration_minutes(),
            remaining_seconds: timer.remaining_seconds(),
            display: timer.display(),
            button_label: timer.button_label(),
            pending_minutes_input: timer.pending_minutes_input().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum TickerCommand {
    /// Stop ticking and exit the task
    Stop,
}

/// Owns the focus timer and the single task that ticks it.
///
/// The task exists only while the timer runs. Pausing, resetting, applying
/// a new duration and shutting down all stop and join it, so once one of
/// those calls returns no further tick can touch the timer. Dropping the
/// ticker aborts whatever task is left.
pub struct FocusTicker {
    /// Timer shared with the ticking task
    timer: Arc<Mutex<FocusTimer>>,

    /// Channel to send commands to the ticking task
    command_tx: mpsc::Sender<TickerCommand>,

    /// Handle to the ticking task
    ticker_task: Option<JoinHandle<()>>,

    /// Latest snapshot for subscribers
    snapshot_tx: Arc<watch::Sender<TimerSnapshot>>,

    tick_interval: Duration,
}

impl FocusTicker {
    pub fn new(timer: FocusTimer) -> Self {
        info!(
            "Initializing focus ticker with a {} minute session",
            timer.duration_minutes()
        );
        let (command_tx, _) = mpsc::channel(4);
        let (snapshot_tx, _) = watch::channel(TimerSnapshot::from(&timer));

        Self {
            timer: Arc::new(Mutex::new(timer)),
            command_tx,
            ticker_task: None,
            snapshot_tx: Arc::new(snapshot_tx),
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Overrides the one-second tick period.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Receives a snapshot after every tick and every user action.
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.timer.lock().await)
    }

    /// Whether a ticking task is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Start/pause button.
    pub async fn toggle(&mut self) -> Result<TimerSnapshot> {
        let running = self.timer.lock().await.toggle();

        if running {
            self.start_ticker().await?;
            info!("Focus session running");
        } else {
            self.stop_ticker().await?;
            info!("Focus session paused");
        }

        Ok(self.publish().await)
    }

    pub async fn reset(&mut self) -> Result<TimerSnapshot> {
        self.timer.lock().await.reset();
        self.stop_ticker().await?;
        info!("Focus session reset");

        Ok(self.publish().await)
    }

    /// Records the raw duration text without committing it.
    pub async fn set_minutes_input(&self, input: &str) {
        self.timer.lock().await.set_pending_minutes_input(input);
        self.publish().await;
    }

    /// Commits `input` as the new duration. Invalid input changes nothing
    /// and leaves a running session ticking.
    pub async fn apply_minutes(&mut self, input: &str) -> Result<Option<u32>> {
        self.timer.lock().await.set_pending_minutes_input(input);
        self.apply_pending_minutes().await
    }

    /// Commits whatever duration text is pending.
    pub async fn apply_pending_minutes(&mut self) -> Result<Option<u32>> {
        let (applied, input) = {
            let mut timer = self.timer.lock().await;
            (timer.apply_pending_minutes(), timer.pending_minutes_input().to_string())
        };

        match applied {
            Some(minutes) => {
                self.stop_ticker().await?;
                info!("Focus duration set to {} minutes", minutes);
            }
            None => debug!("Ignoring invalid focus duration {:?}", input),
        }

        self.publish().await;
        Ok(applied)
    }

    /// Stops the ticking task and pauses the timer, keeping the remaining
    /// time. Subscribers receive the stopped snapshot.
    pub async fn shutdown(&mut self) -> Result<()> {
        {
            let mut timer = self.timer.lock().await;
            if timer.is_running() {
                timer.toggle();
            }
        }
        self.stop_ticker().await?;
        self.publish().await;
        Ok(())
    }

    async fn publish(&self) -> TimerSnapshot {
        let snapshot = self.snapshot().await;
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    async fn start_ticker(&mut self) -> Result<()> {
        // A finished or stale task is joined before a new one is spawned
        self.stop_ticker().await?;

        let (command_tx, mut command_rx) = mpsc::channel(4);
        self.command_tx = command_tx;

        let timer = Arc::clone(&self.timer);
        let snapshot_tx = Arc::clone(&self.snapshot_tx);
        let tick_interval = self.tick_interval;

        let task = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.tick().await; // Initial tick

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let snapshot = {
                            let mut timer = timer.lock().await;
                            if !timer.is_running() {
                                debug!("Timer no longer running, ticker exiting");
                                break;
                            }
                            if timer.tick() {
                                info!("Focus session complete");
                            }
                            TimerSnapshot::from(&*timer)
                        };

                        let finished = !snapshot.is_running;
                        snapshot_tx.send_replace(snapshot);
                        if finished {
                            break;
                        }
                    }
                    Some(cmd) = command_rx.recv() => match cmd {
                        TickerCommand::Stop => {
                            debug!("Ticker stopping...");
                            break;
                        }
                    }
                }
            }
        });

        self.ticker_task = Some(task);
        Ok(())
    }

    async fn stop_ticker(&mut self) -> Result<()> {
        let Some(task) = self.ticker_task.take() else {
            return Ok(());
        };

        if !task.is_finished() {
            // The task may already be on its way out, in which case nobody listens
            if let Err(e) = self.command_tx.send(TickerCommand::Stop).await {
                debug!("Ticker already gone: {}", e);
            }
        }

        if let Err(e) = task.await {
            let error_mgs = format!("Failed to stop focus ticker: {}", e);
            error!("{}", error_mgs);
            return Err(StudyError::ApplicationError { message: error_mgs });
        }

        debug!("Focus ticker stopped");
        Ok(())
    }
}

impl Drop for FocusTicker {
    fn drop(&mut self) {
        if let Some(task) = self.ticker_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn one_minute_ticker() -> FocusTicker {
        let mut ticker = FocusTicker::new(FocusTimer::default());
        assert_eq!(ticker.apply_minutes("1").await.unwrap(), Some(1));
        ticker
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_runs_to_expiry() {
        let mut ticker = one_minute_ticker().await;
        let started = ticker.toggle().await.unwrap();
        assert!(started.is_running);
        assert_eq!(started.button_label, "Pause");

        time::sleep(Duration::from_millis(30_500)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, 30);

        time::sleep(Duration::from_secs(40)).await;
        let snapshot = ticker.snapshot().await;
        assert_eq!(snapshot.remaining_seconds, 0);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.phase, TimerPhase::Expired);
        assert_eq!(snapshot.button_label, "Restart");
        assert!(!ticker.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_expiry_reloads() {
        let mut ticker = one_minute_ticker().await;
        ticker.toggle().await.unwrap();
        time::sleep(Duration::from_secs(61)).await;

        let restarted = ticker.toggle().await.unwrap();
        assert!(restarted.is_running);
        assert_eq!(restarted.remaining_seconds, 60);

        time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, 55);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let mut ticker = one_minute_ticker().await;
        ticker.toggle().await.unwrap();
        time::sleep(Duration::from_millis(10_500)).await;

        let paused = ticker.toggle().await.unwrap();
        assert_eq!(paused.phase, TimerPhase::Paused);
        assert_eq!(paused.remaining_seconds, 50);
        assert!(!ticker.is_ticking());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_while_running() {
        let mut ticker = FocusTicker::new(FocusTimer::default());
        ticker.toggle().await.unwrap();
        time::sleep(Duration::from_millis((1500 - 37) * 1000 + 500)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, 37);

        let reset = ticker.reset().await.unwrap();
        assert_eq!(reset.remaining_seconds, 1500);
        assert!(!reset.is_running);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_minutes_keep_session_running() {
        let mut ticker = FocusTicker::new(FocusTimer::default());
        ticker.toggle().await.unwrap();

        for input in ["0", "-5", "abc"] {
            assert_eq!(ticker.apply_minutes(input).await.unwrap(), None);
        }
        let snapshot = ticker.snapshot().await;
        assert_eq!(snapshot.duration_minutes, 25);
        assert!(snapshot.is_running);
        assert!(ticker.is_ticking());

        assert_eq!(ticker.apply_minutes("300").await.unwrap(), Some(180));
        let snapshot = ticker.snapshot().await;
        assert_eq!(snapshot.remaining_seconds, 180 * 60);
        assert!(!snapshot.is_running);
        assert!(!ticker.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let mut ticker = one_minute_ticker().await;
        let mut rx = ticker.subscribe();
        ticker.toggle().await.unwrap();
        let _ = rx.borrow_and_update();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().remaining_seconds, 59);
        assert_eq!(rx.borrow().display, "00:59");
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_tick_interval() {
        let mut ticker =
            FocusTicker::new(FocusTimer::new(1)).with_tick_interval(Duration::from_millis(10));
        ticker.toggle().await.unwrap();

        time::sleep(Duration::from_millis(605)).await;
        let snapshot = ticker.snapshot().await;
        assert_eq!(snapshot.remaining_seconds, 0);
        assert_eq!(snapshot.phase, TimerPhase::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_releases_task() {
        let mut ticker = one_minute_ticker().await;
        ticker.toggle().await.unwrap();
        assert!(ticker.is_ticking());
        time::sleep(Duration::from_millis(3_500)).await;

        let mut rx = ticker.subscribe();
        ticker.shutdown().await.unwrap();
        assert!(!ticker.is_ticking());

        let published = rx.borrow_and_update().clone();
        assert!(!published.is_running);
        assert_eq!(published.phase, TimerPhase::Paused);
        assert_eq!(published.remaining_seconds, 57);
        assert_eq!(published, ticker.snapshot().await);

        let before = ticker.snapshot().await.remaining_seconds;
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ticker.snapshot().await.remaining_seconds, before);
    }
}
