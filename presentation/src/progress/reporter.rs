//! Progress reporting for run execution
//!
//! Both reporters write to stderr so that stdout carries only the final
//! output (which may be JSON).

use colored::Colorize;
use converge_application::RunObserver;
use converge_domain::RunEvent;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with one progress bar per round
pub struct ProgressReporter {
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn start_round(&self, round: usize) {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}", round));
        pb.set_message("Deciding...");

        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish();
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            f(pb);
        }
    }

    /// Finish the current round's bar, if any.
    pub fn finish(&self) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunObserver for ProgressReporter {
    fn on_event(&self, event: &RunEvent) {
        match event {
            RunEvent::RoundStarted { round } => self.start_round(*round),
            RunEvent::ActionDispatched { action_name, .. } => self.with_bar(|pb| {
                pb.inc_length(1);
                pb.set_message(format!("{}...", action_name));
            }),
            RunEvent::ActionResolved {
                action_name,
                success,
                ..
            } => self.with_bar(|pb| {
                let status = if *success {
                    format!("{} {}", "v".green(), action_name)
                } else {
                    format!("{} {}", "x".red(), action_name)
                };
                pb.set_message(status);
                pb.inc(1);
            }),
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    fn line(event: &RunEvent) -> Option<String> {
        match event {
            RunEvent::RoundStarted { round } => {
                Some(format!("{} {}", "->".cyan(), format!("Round {}", round).bold()))
            }
            RunEvent::ActionDispatched { .. } => None,
            RunEvent::ActionResolved {
                request_id,
                action_name,
                success,
                summary,
                ..
            } => {
                let mark = if *success { "v".green() } else { "x".red() };
                Some(format!(
                    "  {} {} [{}] {}",
                    mark,
                    action_name,
                    request_id,
                    summary.dimmed()
                ))
            }
        }
    }
}

impl RunObserver for SimpleProgress {
    fn on_event(&self, event: &RunEvent) {
        if let Some(line) = Self::line(event) {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge_domain::{ActionOutcome, ActionRequestId};

    #[test]
    fn test_simple_progress_lines() {
        colored::control::set_override(false);

        assert_eq!(
            SimpleProgress::line(&RunEvent::RoundStarted { round: 2 }).as_deref(),
            Some("-> Round 2")
        );

        let dispatched = RunEvent::ActionDispatched {
            round: 2,
            request_id: ActionRequestId::new("c1"),
            action_name: "read_file".to_string(),
        };
        assert!(SimpleProgress::line(&dispatched).is_none());

        let resolved = RunEvent::resolved(
            2,
            ActionRequestId::new("c1"),
            "read_file",
            &ActionOutcome::failure("gone", "not_found"),
        );
        assert_eq!(
            SimpleProgress::line(&resolved).as_deref(),
            Some("  x read_file [c1] [not_found] gone")
        );
    }

    #[test]
    fn test_reporter_tracks_round_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_event(&RunEvent::RoundStarted { round: 1 });
        reporter.on_event(&RunEvent::ActionDispatched {
            round: 1,
            request_id: ActionRequestId::new("c1"),
            action_name: "glob_search".to_string(),
        });
        reporter.on_event(&RunEvent::resolved(
            1,
            ActionRequestId::new("c1"),
            "glob_search",
            &ActionOutcome::success("ok"),
        ));

        let (pos, len) = {
            let slot = reporter.round_bar.lock().unwrap();
            let pb = slot.as_ref().unwrap();
            (pb.position(), pb.length())
        };
        assert_eq!((pos, len), (1, Some(1)));

        reporter.finish();
        assert!(reporter.round_bar.lock().unwrap().is_none());
    }
}
