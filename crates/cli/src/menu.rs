use crossterm::event::KeyCode;
use crossterm::style::Color;
use log::debug;

use opkit_core::error::{Error, Result};

use crate::input::next_key_event;
use crate::output::console::{self, HiddenCursor, Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// Appearance of a selection menu.
#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub caption: String,
    pub caption_color: Color,
    pub selected_prefix: String,
    pub selected_color: Color,
    pub selected_background: Color,
    pub unselected_prefix: String,
    pub unselected_color: Color,
    pub unselected_background: Color,
    /// Printed before the chosen item once the menu closes.
    pub end_result_prompt: String,
    pub end_result_color: Color,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            caption: "Use up, down keys and select one of choices by pressing Enter: ".to_string(),
            caption_color: Color::Grey,
            selected_prefix: " > ".to_string(),
            selected_color: Color::White,
            selected_background: Color::DarkMagenta,
            unselected_prefix: "   ".to_string(),
            unselected_color: Color::Grey,
            unselected_background: Color::Black,
            end_result_prompt: "Selected: ".to_string(),
            end_result_color: Color::Grey,
        }
    }
}

impl MenuSettings {
    /// Width every item line is padded to, so a selection change overwrites the
    /// previous highlight completely.
    #[must_use]
    pub fn line_width<S: AsRef<str>>(&self, options: &[S]) -> usize {
        let longest = options
            .iter()
            .map(|option| option.as_ref().chars().count())
            .max()
            .unwrap_or_default();
        let prefix = self
            .selected_prefix
            .chars()
            .count()
            .max(self.unselected_prefix.chars().count());

        longest + prefix + 1
    }

    /// The text of one item line.
    #[must_use]
    pub fn item_line(&self, option: &str, selected: bool, width: usize) -> String {
        let prefix = if selected {
            &self.selected_prefix
        } else {
            &self.unselected_prefix
        };
        format!("{:<width$}", format!("{prefix}{option}"))
    }

    #[must_use]
    pub fn end_result_line(&self, option: &str) -> String {
        format!("{} {}", self.end_result_prompt.trim_end(), option)
    }
}

/// Moves the selection one step, wrapping at either end.
#[must_use]
pub fn next_index(current: usize, length: usize, direction: CycleDirection) -> usize {
    if length == 0 {
        return 0;
    }

    match direction {
        CycleDirection::Up => {
            if current == 0 {
                length - 1
            } else {
                current - 1
            }
        }
        CycleDirection::Down => (current + 1) % length,
    }
}

fn draw_items<S: AsRef<str>>(
    terminal: &mut Terminal,
    options: &[S],
    selected_index: usize,
    settings: &MenuSettings,
    width: usize,
) -> Result<()> {
    for (index, option) in options.iter().enumerate() {
        let selected = index == selected_index;
        let (color, background) = if selected {
            (settings.selected_color, settings.selected_background)
        } else {
            (settings.unselected_color, settings.unselected_background)
        };
        terminal.clear_line()?;
        terminal.write(
            &settings.item_line(option.as_ref(), selected, width),
            color,
            Some(background),
        )?;
        terminal.new_line()?;
    }
    Ok(())
}

/// Shows `options` as a menu and returns the index the user picked with Enter.
///
/// An out of range `start_index` starts at the first item. When the menu closes its
/// lines are replaced by the end result prompt and the chosen item.
///
/// # Errors
///
/// Returns [`Error::MenuTooShort`] for fewer than two options, and terminal or
/// cancelled-input errors.
pub fn select_single<S: AsRef<str>>(
    options: &[S],
    start_index: usize,
    settings: &MenuSettings,
) -> Result<usize> {
    if options.len() < 2 {
        return Err(Error::MenuTooShort(options.len()));
    }

    let mut selected_index = if start_index < options.len() {
        start_index
    } else {
        0
    };
    let width = settings.line_width(options);
    let item_count = u16::try_from(options.len()).unwrap_or(u16::MAX);

    let _hidden_cursor = HiddenCursor::hide()?;
    {
        let mut terminal = console::lock();
        terminal.write(&settings.caption, settings.caption_color, None)?;
        terminal.new_line()?;
        draw_items(&mut terminal, options, selected_index, settings, width)?;
    }

    loop {
        let direction = match next_key_event()?.code {
            KeyCode::Up => CycleDirection::Up,
            KeyCode::Down => CycleDirection::Down,
            KeyCode::Enter => break,
            _ => continue,
        };

        selected_index = next_index(selected_index, options.len(), direction);

        let mut terminal = console::lock();
        terminal.move_up(item_count)?;
        draw_items(&mut terminal, options, selected_index, settings, width)?;
    }

    let chosen = options[selected_index].as_ref();
    debug!("Menu item {selected_index} selected: {chosen}");

    let mut terminal = console::lock();
    terminal.move_up(item_count.saturating_add(1))?;
    terminal.clear_below()?;
    terminal.write(&settings.end_result_line(chosen), settings.end_result_color, None)?;
    terminal.new_line()?;

    Ok(selected_index)
}
