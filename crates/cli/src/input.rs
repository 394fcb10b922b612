//! Blocking keyboard input.
//!
//! Keys are read one at a time in raw mode. Raw mode is only enabled for the duration of
//! a single read, so output written between reads behaves like normal line output.
//! Ctrl+C cancels any read with [`Error::InputCancelled`].

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;

use opkit_core::error::{Error, Result};

use crate::output::console;

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn is_cancel(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Waits for the next key press.
pub fn next_key_event() -> Result<KeyEvent> {
    let _raw_mode_guard = RawModeGuard::enable()?;

    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if is_cancel(&key) {
                debug!("Input cancelled with Ctrl+C");
                return Err(Error::InputCancelled);
            }
            return Ok(key);
        }
    }
}

/// Waits until Enter is pressed.
pub fn read_enter() -> Result<()> {
    read_keys(&[KeyCode::Enter]).map(|_| ())
}

/// Waits until Escape is pressed.
pub fn read_escape() -> Result<()> {
    read_keys(&[KeyCode::Esc]).map(|_| ())
}

/// Waits for `y` or `n` in either case; `true` for yes.
pub fn read_yes_no() -> Result<bool> {
    Ok(read_chars(&['y', 'n'], true)? == 'y')
}

/// Waits for one of `chars` and returns the entry of `chars` that matched.
pub fn read_chars(chars: &[char], ignore_case: bool) -> Result<char> {
    loop {
        if let KeyCode::Char(pressed) = next_key_event()?.code {
            if let Some(matched) = match_char(pressed, chars, ignore_case) {
                return Ok(matched);
            }
        }
    }
}

/// Finds `pressed` in `chars`.
#[must_use]
pub fn match_char(pressed: char, chars: &[char], ignore_case: bool) -> Option<char> {
    chars.iter().copied().find(|&candidate| {
        if ignore_case {
            candidate.to_lowercase().eq(pressed.to_lowercase())
        } else {
            candidate == pressed
        }
    })
}

/// Waits for one of `keys`.
pub fn read_keys(keys: &[KeyCode]) -> Result<KeyCode> {
    loop {
        let code = next_key_event()?.code;
        if keys.contains(&code) {
            return Ok(code);
        }
    }
}

/// Effect of one key on a secret input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretEdit {
    Pushed,
    Popped,
    Ignored,
    Done,
}

/// Applies `key` to `buffer`.
pub fn apply_secret_key(buffer: &mut String, key: &KeyEvent) -> SecretEdit {
    match key.code {
        KeyCode::Enter => SecretEdit::Done,
        KeyCode::Backspace => match buffer.pop() {
            Some(_) => SecretEdit::Popped,
            None => SecretEdit::Ignored,
        },
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            buffer.push(c);
            SecretEdit::Pushed
        }
        _ => SecretEdit::Ignored,
    }
}

/// Reads a line, echoing `*` for every character, until Enter.
pub fn read_line_secret() -> Result<String> {
    let mut buffer = String::new();

    loop {
        let key = next_key_event()?;
        match apply_secret_key(&mut buffer, &key) {
            SecretEdit::Pushed => console::write("*", Color::Reset)?,
            SecretEdit::Popped => console::write("\u{8} \u{8}", Color::Reset)?,
            SecretEdit::Ignored => {}
            SecretEdit::Done => {
                console::new_line()?;
                return Ok(buffer);
            }
        }
    }
}
