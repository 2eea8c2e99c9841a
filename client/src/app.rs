use common::animator::RunState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

// Actions the user can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Start,
    Stop,
    /// Start when stopped, stop when running
    Toggle,
    Reset,
    Quit,
    None,
}

/// Map a key press onto a viewer action
pub fn parse_key_event(event: KeyEvent) -> UserAction {
    if event.kind == KeyEventKind::Release {
        return UserAction::None;
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => UserAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => UserAction::Quit,
        KeyCode::Char(' ') | KeyCode::Char('s') => UserAction::Toggle,
        KeyCode::Char('r') => UserAction::Reset,
        KeyCode::Enter => UserAction::Start,
        KeyCode::Backspace => UserAction::Stop,
        _ => UserAction::None,
    }
}

/// Line shown under the torus
pub fn status_line(run_state: RunState, frames: u64, fps: u32) -> String {
    let state = match run_state {
        RunState::Running => "running",
        RunState::Stopped => "stopped",
    };

    format!(
        "{} | frame {} @ {} fps | [space] start/stop  [r] reset  [q] quit",
        state, frames, fps
    )
}
