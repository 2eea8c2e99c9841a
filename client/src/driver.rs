use crate::app::{UserAction, parse_key_event, status_line};
use common::animator::{Animator, FrameSink, RunState};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How often the input reader checks whether it should exit
const INPUT_POLL: Duration = Duration::from_millis(100);

/// A surface that can also show a line of status text
pub trait StatusDisplay {
    /// Text drawn together with the next frame
    fn set_status(&mut self, status: String);
    /// Redraw only the status text, leaving the frame as is
    fn show_status(&mut self, status: String) -> io::Result<()>;
}

/// Restores the terminal on every exit path
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
}

pub struct DriverOptions {
    /// Time between ticks
    pub interval: Duration,
    /// Shown in the status line
    pub fps: u32,
    /// Quit after this many frames
    pub max_frames: Option<u64>,
}

/// Read key presses on a blocking thread and forward them as actions
pub fn spawn_input_reader(
    tx: mpsc::Sender<UserAction>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    task::spawn_blocking(move || {
        while running.load(Ordering::Relaxed) {
            match event::poll(INPUT_POLL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("failed to poll terminal input: {}", e);
                    break;
                }
            }

            let action = match event::read() {
                Ok(Event::Key(key)) => parse_key_event(key),
                Ok(_) => continue,
                Err(e) => {
                    warn!("failed to read terminal input: {}", e);
                    break;
                }
            };

            if action != UserAction::None && tx.blocking_send(action).is_err() {
                // driver is gone
                break;
            }
        }
    })
}

/// Apply a user action to the animator; returns false on quit
pub fn apply_action<S: FrameSink>(animator: &mut Animator<S>, action: UserAction) -> bool {
    match action {
        UserAction::Start => animator.start(),
        UserAction::Stop => animator.stop(),
        UserAction::Toggle => animator.toggle(),
        UserAction::Reset => animator.reset(),
        UserAction::Quit => return false,
        UserAction::None => {}
    }
    true
}

/// Tick the animator on a fixed cadence until the user quits.
///
/// The animator is started on entry and stopped on exit. A closed action
/// channel counts as a quit.
pub async fn drive<S>(
    animator: &mut Animator<S>,
    actions: &mut mpsc::Receiver<UserAction>,
    options: &DriverOptions,
) -> Result<(), Box<dyn Error>>
where
    S: FrameSink + StatusDisplay,
{
    let mut ticker = time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    animator.start();
    info!("animation started at {} fps", options.fps);

    loop {
        tokio::select! {
            // input first, so a queued stop or quit wins over a ready tick
            biased;

            action = actions.recv() => {
                let action = action.unwrap_or(UserAction::Quit);
                debug!("user action: {:?}", action);

                if !apply_action(animator, action) {
                    break;
                }

                let status = status_line(
                    animator.run_state(),
                    animator.frames_rendered(),
                    options.fps,
                );
                animator.sink_mut().show_status(status)?;
            }
            _ = ticker.tick() => {
                if !animator.is_running() {
                    continue;
                }

                let status = status_line(
                    RunState::Running,
                    animator.frames_rendered() + 1,
                    options.fps,
                );
                animator.sink_mut().set_status(status);
                animator.tick()?;

                if options
                    .max_frames
                    .is_some_and(|max| animator.frames_rendered() >= max)
                {
                    debug!("frame limit reached");
                    break;
                }
            }
        }
    }

    animator.stop();
    info!("animation stopped after {} frames", animator.frames_rendered());

    Ok(())
}
