use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::style::Color;
use log::debug;

use opkit_core::error::{Error, Result};

use crate::output::console::{self, HiddenCursor};
use crate::redraw::{format_clock, RedrawWorker};

const BAR_CELLS: usize = 78;
const OVERLAY_COLUMN: usize = 33;
const REDRAW_PERIOD: Duration = Duration::from_secs(1);

/// Renders the 80 column bar with the percentage and elapsed time laid over its middle:
///
/// `[#########################| 25% (00:12) |-------------------------------------]`
#[must_use]
pub fn render_bar(current: usize, total: usize, elapsed: Duration) -> String {
    let percentage = if total == 0 {
        0.0
    } else {
        current as f64 / total as f64 * 100.0
    };
    let filled = ((BAR_CELLS as f64 * percentage / 100.0).round_ties_even() as usize).min(BAR_CELLS);

    let mut bar = format!("[{}", "#".repeat(filled));
    if filled < BAR_CELLS {
        bar.push_str(&"-".repeat(BAR_CELLS - filled));
        bar.push(']');
    } else {
        bar.push_str("] ");
    }

    let overlay = format!(
        "| {:02}% ({}) |",
        percentage.round() as u64,
        format_clock(elapsed)
    );
    let end = (OVERLAY_COLUMN + overlay.len()).min(bar.len());
    bar.replace_range(OVERLAY_COLUMN..end, &overlay);
    bar
}

/// Stepped progress drawn once a second on the current line.
pub struct ProgressBar {
    total_steps: usize,
    color: Color,
    current_step: Arc<AtomicUsize>,
    worker: Option<RedrawWorker>,
    hidden_cursor: Option<HiddenCursor>,
    started: Option<Instant>,
    elapsed: Duration,
}

impl ProgressBar {
    /// # Errors
    ///
    /// Returns [`Error::ProgressStepsTooFew`] for fewer than two steps.
    pub fn new(total_steps: usize, color: Color) -> Result<Self> {
        if total_steps < 2 {
            return Err(Error::ProgressStepsTooFew(2, total_steps));
        }

        Ok(Self {
            total_steps,
            color,
            current_step: Arc::new(AtomicUsize::new(0)),
            worker: None,
            hidden_cursor: None,
            started: None,
            elapsed: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step.load(Ordering::Relaxed)
    }

    /// Sets the completed step count, clamped to the total.
    pub fn set_current_step(&self, step: usize) {
        self.current_step
            .store(step.min(self.total_steps), Ordering::Relaxed);
    }

    /// Time since start; frozen once stopped.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.map_or(self.elapsed, |started| started.elapsed())
    }

    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        self.hidden_cursor = Some(HiddenCursor::hide()?);
        let started = Instant::now();
        self.started = Some(started);

        let current_step = Arc::clone(&self.current_step);
        let total_steps = self.total_steps;
        let color = self.color;
        self.worker = Some(RedrawWorker::start(REDRAW_PERIOD, move || {
            let line = render_bar(
                current_step.load(Ordering::Relaxed),
                total_steps,
                started.elapsed(),
            );
            let mut terminal = console::lock();
            terminal.clear_line()?;
            terminal.write(&line, color, None)
        }));

        debug!("Progress bar started for {total_steps} steps");
        Ok(())
    }

    /// Stops drawing and clears the bar.
    pub fn stop(&mut self) -> Result<()> {
        let Some(mut worker) = self.worker.take() else {
            return Ok(());
        };
        worker.stop();

        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
        self.hidden_cursor = None;
        debug!("Progress bar stopped after {:?}", self.elapsed);

        console::clear_line()
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_layout() {
        let bar = render_bar(1, 4, Duration::from_secs(12));

        assert_eq!(bar.len(), 80);
        assert!(bar.starts_with("[##"));
        assert!(bar.ends_with("-]"));
        assert_eq!(&bar[33..48], "| 25% (00:12) |");
        // 19.5 cells rounded to even
        assert_eq!(bar.matches('#').count(), 20);
    }

    #[test]
    fn test_bar_empty_and_full() {
        let empty = render_bar(0, 10, Duration::ZERO);
        assert_eq!(&empty[..2], "[-");
        assert_eq!(&empty[33..48], "| 00% (00:00) |");

        let full = render_bar(10, 10, Duration::from_secs(61));
        assert_eq!(&full[33..49], "| 100% (01:01) |");
        assert!(full.ends_with("#] "));
        assert!(!full.contains('-'));
    }

    #[test]
    fn test_needs_two_steps() {
        assert!(matches!(
            ProgressBar::new(1, Color::Grey),
            Err(Error::ProgressStepsTooFew(2, 1))
        ));
        assert!(ProgressBar::new(2, Color::Grey).is_ok());
    }

    #[test]
    fn test_current_step_is_clamped() {
        let bar = ProgressBar::new(5, Color::Grey).unwrap();
        bar.set_current_step(3);
        assert_eq!(bar.current_step(), 3);
        bar.set_current_step(12);
        assert_eq!(bar.current_step(), 5);
        assert_eq!(bar.elapsed(), Duration::ZERO);
    }
}
