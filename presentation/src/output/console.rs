//! Console output formatter for run results

use colored::Colorize;
use converge_application::RunOutput;
use converge_domain::{ActionOutcome, OutputFormat, Turn};

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format `output` in the requested format.
    ///
    /// `seed_len` is the length of the transcript the run started from; the
    /// full format only prints the turns appended after it.
    pub fn render(output: &RunOutput, format: OutputFormat, seed_len: usize) -> String {
        match format {
            OutputFormat::Full => Self::format(output, seed_len),
            OutputFormat::Summary => Self::format_summary(output),
            OutputFormat::Json => Self::format_json(output),
        }
    }

    /// Format every turn added by the run, followed by the summary
    pub fn format(output: &RunOutput, seed_len: usize) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Run Transcript"));
        text.push('\n');

        for turn in output.transcript.since(seed_len) {
            text.push_str(&Self::format_turn(turn));
        }

        text.push_str(&Self::section_header("Result"));
        text.push_str(&Self::summary_body(output));
        text.push_str(&Self::footer());

        text
    }

    /// Format as JSON
    pub fn format_json(output: &RunOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    /// Stop reason, rounds and pending actions only
    pub fn format_summary(output: &RunOutput) -> String {
        Self::summary_body(output)
    }

    fn summary_body(output: &RunOutput) -> String {
        let mut text = String::new();

        let status = if output.done {
            "done".green().bold()
        } else {
            "not done".yellow().bold()
        };
        text.push_str(&format!("{} {}\n", "Status:".cyan().bold(), status));
        text.push_str(&format!(
            "{} {}\n",
            "Stopped:".cyan().bold(),
            output.stop_reason
        ));
        text.push_str(&format!("{} {}\n", "Rounds:".cyan().bold(), output.rounds));

        if !output.pending_actions.is_empty() {
            text.push_str(&format!("\n{}\n", "Pending actions:".yellow().bold()));
            for request in &output.pending_actions {
                text.push_str(&format!("  * [{}] {}\n", request.id, request.describe()));
            }
        }

        text
    }

    fn format_turn(turn: &Turn) -> String {
        match turn {
            Turn::Human { content, .. } => {
                format!("\n{}\n{}\n", "── human ──".blue().bold(), content)
            }
            Turn::System { content, .. } => {
                format!("\n{}\n{}\n", "── system ──".dimmed(), Self::indent(content, "  "))
            }
            Turn::Assistant { .. } => {
                format!("\n{}\n{}\n", "── assistant ──".yellow().bold(), turn.text())
            }
            Turn::ActionResult {
                request_id,
                action_name,
                outcome,
                ..
            } => {
                let label = format!("── {} [{}] ──", action_name, request_id);
                let label = match outcome {
                    ActionOutcome::Success { .. } => label.green().bold(),
                    ActionOutcome::Failure { .. } => label.red().bold(),
                };
                format!("\n{}\n{}\n", label, Self::indent(&outcome.render(), "  "))
            }
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge_application::StopReason;
    use converge_domain::{ActionRequest, Transcript};
    use serde_json::json;

    fn sample_output() -> RunOutput {
        colored::control::set_override(false);

        let mut transcript = Transcript::new();
        transcript.push(Turn::human("list sources", 1));
        transcript.push(Turn::assistant(
            "looking",
            vec![ActionRequest::new("c1", "glob_search", json!({"pattern": "*.rs"}))],
            2,
        ));
        transcript.push(Turn::action_result(
            "c1",
            "glob_search",
            ActionOutcome::success(json!(["main.rs"])),
            3,
        ));
        transcript.push(Turn::action_result(
            "c2",
            "read_file",
            ActionOutcome::failure("missing.rs: gone", "not_found"),
            4,
        ));

        RunOutput {
            done: false,
            transcript,
            pending_actions: vec![ActionRequest::new(
                "c2",
                "read_file",
                json!({"path": "missing.rs"}),
            )],
            stop_reason: StopReason::RoundBudgetExhausted,
            rounds: 2,
        }
    }

    #[test]
    fn test_full_skips_seed_turns() {
        let output = sample_output();
        let text = ConsoleFormatter::format(&output, 1);

        assert!(!text.contains("list sources"));
        assert!(text.contains("── assistant ──"));
        assert!(text.contains(r#"glob_search({"pattern":"*.rs"})"#));
        assert!(text.contains("── glob_search [c1] ──"));
        assert!(text.contains("[not_found] missing.rs: gone"));
        assert!(text.contains("round budget exhausted"));
    }

    #[test]
    fn test_summary_lists_pending() {
        let output = sample_output();
        let text = ConsoleFormatter::render(&output, OutputFormat::Summary, 1);

        assert!(text.contains("Status: not done"));
        assert!(text.contains("Rounds: 2"));
        assert!(text.contains("Pending actions:"));
        assert!(text.contains("[c2] read_file("));
        assert!(!text.contains("── assistant ──"));
    }

    #[test]
    fn test_json_round_trips_key_fields() {
        let output = sample_output();
        let text = ConsoleFormatter::render(&output, OutputFormat::Json, 0);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["done"], json!(false));
        assert_eq!(value["rounds"], json!(2));
        assert_eq!(value["stop_reason"]["kind"], json!("round_budget_exhausted"));
        assert_eq!(value["transcript"].as_array().unwrap().len(), 4);
        assert_eq!(value["pending_actions"][0]["id"], json!("c2"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
