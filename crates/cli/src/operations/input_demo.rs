use crossterm::event::KeyCode;
use crossterm::style::Color;

use opkit_core::error::Result;
use opkit_core::operation::{Operation, OptionField};

use crate::input::{read_chars, read_enter, read_escape, read_keys, read_line_secret, read_yes_no};
use crate::menu::{select_single, MenuSettings};
use crate::output::console;

pub const MENU_ITEMS: [&str; 7] = [
    "Enter password",
    "Wait for Enter",
    "Wait for Escape",
    "Wait for y/n",
    "Wait for specific keys",
    "Wait for special keys",
    "Exit input demo",
];

/// Menu-driven tour of the keyboard input helpers.
#[derive(Debug, Default)]
pub struct InputDemo;

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{other:?}"),
    }
}

fn prompt(text: &str) -> Result<()> {
    console::new_line()?;
    console::write_line(text, Color::Grey)
}

impl Operation for InputDemo {
    fn name(&self) -> &str {
        "input"
    }

    fn help_text(&self) -> &str {
        "Method to show possibilities of input extensions."
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn run(&mut self) -> Result<i32> {
        let settings = MenuSettings::default();

        loop {
            let selected = select_single(&MENU_ITEMS, 0, &settings)?;
            console::write_formatted_line(
                "Selected item index: {0}",
                Color::DarkCyan,
                Color::Cyan,
                &[selected],
            )?;

            match selected {
                0 => {
                    console::new_line()?;
                    console::write("Enter password: ", Color::Grey)?;
                    let password = read_line_secret()?;
                    console::write_line(&format!("Password: {password}"), Color::Grey)?;
                }
                1 => {
                    prompt("Press Enter (all other keys should not respond): ")?;
                    read_enter()?;
                }
                2 => {
                    prompt("Press Escape (all other keys should not respond): ")?;
                    read_escape()?;
                }
                3 => {
                    prompt("Press 'y' or 'n' (all other keys should not respond): ")?;
                    let answer = if read_yes_no()? { "Yes" } else { "No" };
                    console::write_line(&format!("Pressed {answer}"), Color::Grey)?;
                }
                4 => {
                    prompt("Press 'f' or 'j' (all other keys should not respond): ")?;
                    let pressed = read_chars(&['f', 'j'], true)?;
                    console::write_line(&format!("Pressed '{pressed}'"), Color::Grey)?;
                }
                5 => {
                    prompt("Press 'Backspace' or 'Delete' (all other keys should not respond): ")?;
                    let pressed = read_keys(&[KeyCode::Backspace, KeyCode::Delete])?;
                    console::write_line(&format!("Pressed '{}'", key_name(pressed)), Color::Grey)?;
                }
                _ => break,
            }
            console::new_line()?;
        }

        Ok(0)
    }

    fn option_fields() -> Result<Vec<OptionField<Self>>> {
        Ok(Vec::new())
    }
}
