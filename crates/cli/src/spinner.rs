//! Busy indicator for lengthy work.
//!
//! A [`Spinner`] redraws the current line from a background thread: an animated frame,
//! optionally the elapsed time and a status message, or a small progress bar with the
//! frame embedded in it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossterm::style::Color;
use log::debug;

use opkit_core::error::{Error, Result};

use crate::output::console::{self, HiddenCursor};
use crate::redraw::{format_clock, format_clock_tenths, RedrawWorker};

/// Longest message shown; longer ones are cut to fit with `...`.
pub const MAX_MESSAGE_LENGTH: usize = 40;

const PROGRESS_CELLS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinnerType {
    #[default]
    Lines,
    Circles,
    Cross,
    Cubes,
    GrowingDots,
    GrowingArrow,
}

impl SpinnerType {
    #[must_use]
    pub fn frames(self) -> &'static [&'static str] {
        match self {
            Self::Lines => &["/", "-", "\\", "|"],
            Self::Circles => &[".", "o", "O", "o"],
            Self::Cross => &["+", "x"],
            Self::Cubes => &["▄", "▀"],
            Self::GrowingDots => &[".   ", "..  ", "... ", "...."],
            Self::GrowingArrow => &["=>   ", "==>  ", "===> ", "====>"],
        }
    }

    /// Growing types put the message before the frame and cannot carry a progress bar.
    #[must_use]
    pub fn is_growing(self) -> bool {
        matches!(self, Self::GrowingDots | Self::GrowingArrow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerSettings {
    pub kind: SpinnerType,
    pub delay: Duration,
    pub color: Color,
    pub show_time: bool,
}

impl Default for SpinnerSettings {
    fn default() -> Self {
        Self {
            kind: SpinnerType::Lines,
            delay: Duration::from_millis(300),
            color: Color::Grey,
            show_time: false,
        }
    }
}

/// Shortens `message` to [`MAX_MESSAGE_LENGTH`] characters.
#[must_use]
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        let kept: String = message.chars().take(MAX_MESSAGE_LENGTH - 3).collect();
        format!("{kept}...")
    } else {
        message.to_string()
    }
}

/// Formats a percentage with at most one decimal, dropping a trailing `.0`.
#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    let rounded = (percentage * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// One frame of a spinner, ready to render.
#[derive(Debug, Clone, Copy)]
pub struct SpinnerView<'a> {
    pub kind: SpinnerType,
    pub frame: usize,
    pub elapsed: Duration,
    pub show_time: bool,
    pub message: &'a str,
    /// `(current step, total steps)` when a progress bar is attached.
    pub progress: Option<(usize, usize)>,
}

impl SpinnerView<'_> {
    #[must_use]
    pub fn render(&self) -> String {
        let frames = self.kind.frames();
        let frame = frames[self.frame % frames.len()];
        let has_message = !self.message.trim().is_empty();

        if let Some((current, total)) = self.progress {
            return render_progress(frame, current, total, has_message.then_some(self.message));
        }

        let mut line = String::new();
        if self.kind.is_growing() {
            if has_message {
                line.push_str(self.message);
                line.push(' ');
            }
            if self.show_time {
                line.push_str(&format!("[{}] ", format_clock(self.elapsed)));
            }
            line.push_str(frame);
        } else {
            line.push_str(frame);
            if self.show_time {
                line.push_str(&format!(" [{}]", format_clock(self.elapsed)));
            }
            if has_message {
                line.push(' ');
                line.push_str(self.message);
            }
        }
        line
    }
}

fn render_progress(frame: &str, current: usize, total: usize, message: Option<&str>) -> String {
    let percentage = if total == 0 {
        0.0
    } else {
        current as f64 / total as f64 * 100.0
    };
    let filled = ((percentage / 10.0).round_ties_even() as usize).min(PROGRESS_CELLS);

    let mut line = format!(
        "[{}{frame}{}] {}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_CELLS - filled),
        format_percentage(percentage)
    );
    if let Some(message) = message {
        line.push_str(" : ");
        line.push_str(message);
    }
    line
}

#[derive(Debug, Default)]
struct SpinnerState {
    message: String,
    frame: usize,
    current_step: usize,
    total_steps: Option<usize>,
}

/// A busy indicator running on its own thread.
///
/// ```no_run
/// use opkit_cli::spinner::{Spinner, SpinnerSettings, SpinnerType};
///
/// let mut spinner = Spinner::new(SpinnerSettings {
///     kind: SpinnerType::Circles,
///     show_time: true,
///     ..SpinnerSettings::default()
/// });
/// spinner.start_with("Working")?;
/// // ... work ...
/// spinner.stop_with("Done", crossterm::style::Color::Green)?;
/// # Ok::<(), opkit_core::error::Error>(())
/// ```
pub struct Spinner {
    settings: SpinnerSettings,
    state: Arc<Mutex<SpinnerState>>,
    worker: Option<RedrawWorker>,
    hidden_cursor: Option<HiddenCursor>,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Spinner {
    #[must_use]
    pub fn new(settings: SpinnerSettings) -> Self {
        Self {
            settings,
            state: Arc::new(Mutex::new(SpinnerState::default())),
            worker: None,
            hidden_cursor: None,
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SpinnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    /// Draws a progress bar of `total_steps` steps around the spinner frame.
    ///
    /// Ignored while the spinner is running.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProgressOnGrowingSpinner`] for growing spinner types and
    /// [`Error::ProgressStepsTooFew`] for zero steps.
    pub fn add_progress_bar(&mut self, total_steps: usize) -> Result<()> {
        if self.is_active() {
            debug!("Ignoring progress bar added to a running spinner");
            return Ok(());
        }
        if self.settings.kind.is_growing() {
            return Err(Error::ProgressOnGrowingSpinner);
        }
        if total_steps < 1 {
            return Err(Error::ProgressStepsTooFew(1, total_steps));
        }

        self.state().total_steps = Some(total_steps);
        Ok(())
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.state().message.clone()
    }

    pub fn set_message(&self, message: &str) {
        self.state().message = truncate_message(message);
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.state().current_step
    }

    /// Sets the completed step count, clamped to the total.
    pub fn set_current_step(&self, step: usize) {
        let mut state = self.state();
        state.current_step = state.total_steps.map_or(step, |total| step.min(total));
    }

    pub fn set_progress(&self, message: &str, step: usize) {
        self.set_message(message);
        self.set_current_step(step);
    }

    /// Time since start; frozen once stopped.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.map_or(self.elapsed, |started| started.elapsed())
    }

    /// Starts drawing. Does nothing if already running.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }

        self.hidden_cursor = Some(HiddenCursor::hide()?);
        let started = Instant::now();
        self.started = Some(started);

        let state = Arc::clone(&self.state);
        let settings = self.settings;
        self.worker = Some(RedrawWorker::start(settings.delay, move || {
            let line = {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                let view = SpinnerView {
                    kind: settings.kind,
                    frame: state.frame,
                    elapsed: started.elapsed(),
                    show_time: settings.show_time,
                    message: &state.message,
                    progress: state.total_steps.map(|total| (state.current_step, total)),
                };
                let line = view.render();
                state.frame = (state.frame + 1) % settings.kind.frames().len();
                line
            };

            let mut terminal = console::lock();
            terminal.clear_line()?;
            terminal.write(&line, settings.color, None)
        }));

        debug!("Spinner started");
        Ok(())
    }

    pub fn start_with(&mut self, message: &str) -> Result<()> {
        self.set_message(message);
        self.start()
    }

    fn halt(&mut self) -> bool {
        let Some(mut worker) = self.worker.take() else {
            return false;
        };
        worker.stop();

        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
        self.hidden_cursor = None;
        self.state().message.clear();
        debug!("Spinner stopped after {:?}", self.elapsed);
        true
    }

    /// Stops and clears the spinner line.
    pub fn stop(&mut self) -> Result<()> {
        if self.halt() {
            console::clear_line()?;
        }
        Ok(())
    }

    /// Stops and replaces the spinner line with `end_message` and the elapsed time.
    pub fn stop_with(&mut self, end_message: &str, color: Color) -> Result<()> {
        if self.halt() {
            console::write_line_over(
                &format!("{end_message} [{}]", format_clock_tenths(self.elapsed)),
                color,
            )?;
        }
        Ok(())
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
