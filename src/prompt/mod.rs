//! Timed yes/no confirmation.
//!
//! One capability: ask whether existing images may be overwritten, resolve
//! within a bounded wait, default to "skip" on timeout. This can run
//! unattended (CI, cron), so it must never block indefinitely: a non-TTY
//! stdin resolves to the default immediately, and an interactive wait has
//! a hard deadline. Keys are read in raw mode so a single `y`/`n` answers
//! without Enter; Ctrl+C during the wait cancels the whole run.

use std::io::{IsTerminal, Write, stdin, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use owo_colors::OwoColorize;

use crate::core::{is_shutdown, request_shutdown};
use crate::log;
use crate::utils::plural_count;

/// How long the confirmation waits before resolving to the default.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll granularity: bounds shutdown-reaction latency during the wait.
const POLL_TICK: Duration = Duration::from_millis(100);

/// Resolution of a single keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Overwrite,
    Skip,
    Cancel,
}

/// Ask whether `existing` already-present images may be overwritten.
///
/// Returns `true` to overwrite. The question is phrased as "skip
/// overwriting?", so the *default* (timeout, Enter, `y`, any other key,
/// or non-interactive stdin) is to skip, and only an explicit `n` flips
/// to overwriting.
pub fn confirm_overwrite(existing: usize, timeout: Duration) -> bool {
    let prompt = format!(
        "{} Found {} existing OG image(s). Skip overwriting them? (Y/n): ",
        "[?]".yellow().bold(),
        existing
    );
    print!("{prompt}");
    stdout().flush().ok();

    if !stdin().is_terminal() {
        println!();
        log!("prompt"; "stdin is not interactive, keeping {}", plural_count(existing, "existing image"));
        return false;
    }

    let answer = wait_for_answer(timeout);
    println!();

    match answer {
        Some(Answer::Overwrite) => {
            log!("prompt"; "will overwrite existing images");
            true
        }
        Some(Answer::Cancel) => {
            request_shutdown();
            false
        }
        Some(Answer::Skip) => {
            log!("prompt"; "will skip overwriting existing images");
            false
        }
        None => {
            log!("prompt"; "no response after {} seconds, defaulting to skip overwriting", timeout.as_secs());
            false
        }
    }
}

/// Raw-mode key wait with a deadline. `None` means the deadline passed.
fn wait_for_answer(timeout: Duration) -> Option<Answer> {
    // Raw mode failing (odd terminals) falls back to the default rather
    // than risking a blocking read.
    let _raw = RawMode::enable()?;
    let deadline = Instant::now() + timeout;

    loop {
        if is_shutdown() {
            return Some(Answer::Cancel);
        }

        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        let wait = POLL_TICK.min(deadline - now);

        if !event::poll(wait).unwrap_or(false) {
            continue;
        }
        if let Ok(Event::Key(key)) = event::read()
            && key.kind == KeyEventKind::Press
            && let Some(answer) = answer_for(key.code, key.modifiers)
        {
            return Some(answer);
        }
    }
}

/// Map a keypress to a resolution; `None` keeps waiting.
fn answer_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Answer> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Answer::Cancel),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Answer::Overwrite),
        KeyCode::Char(_) | KeyCode::Enter | KeyCode::Esc => Some(Answer::Skip),
        _ => None,
    }
}

/// RAII raw-mode guard; restores the terminal on every exit path.
struct RawMode;

impl RawMode {
    fn enable() -> Option<Self> {
        terminal::enable_raw_mode().ok().map(|()| Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

// ============================================================================
// Tests
// ============================================================================
