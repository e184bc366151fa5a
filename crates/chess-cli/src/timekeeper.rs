//! Background task that runs the clock of the side to move.
//!
//! The engine only stores remaining time. This task decrements the active
//! side's clock on every tick and reports a side whose clock reaches zero;
//! the command loop then ends the game.

use chess_core::Color;
use chess_engine::Clocks;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Handle to the running timer task.
pub struct Timekeeper {
    active: watch::Sender<Option<Color>>,
    flags: mpsc::Receiver<Color>,
    task: JoinHandle<()>,
}

impl Timekeeper {
    /// Spawns the timer task. No clock runs until [`Timekeeper::set_active`]
    /// names a side.
    pub fn spawn(clocks: Arc<Clocks>, tick: Duration) -> Self {
        let (active, active_rx) = watch::channel(None);
        let (flag_tx, flags) = mpsc::channel(4);
        let task = tokio::spawn(run(clocks, tick, active_rx, flag_tx));
        Timekeeper {
            active,
            flags,
            task,
        }
    }

    /// Switches the running clock, or stops both with `None`.
    pub fn set_active(&self, color: Option<Color>) {
        if *self.active.borrow() != color {
            self.active.send_replace(color);
        }
    }

    /// Waits for a side to run out of time.
    pub async fn flagged(&mut self) -> Option<Color> {
        self.flags.recv().await
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn run(
    clocks: Arc<Clocks>,
    tick: Duration,
    mut active: watch::Receiver<Option<Color>>,
    flags: mpsc::Sender<Color>,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    let mut reported = false;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let elapsed = now - last;
                last = now;

                let current = *active.borrow();
                let Some(color) = current else {
                    continue;
                };
                if reported {
                    // re-armed once a new game or an undo refills the clock
                    if clocks.is_flagged(color) {
                        continue;
                    }
                    reported = false;
                }
                if clocks.consume(color, elapsed).is_zero() {
                    tracing::info!("{} ran out of time", color);
                    reported = true;
                    if flags.send(color).await.is_err() {
                        break;
                    }
                }
            }
            changed = active.changed() => {
                if changed.is_err() {
                    break;
                }
                last = Instant::now();
                reported = false;
            }
        }
    }
    tracing::debug!("Timekeeper stopped");
}
