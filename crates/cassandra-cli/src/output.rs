//! Output formatting for the CLI.

use cassandra_core::{VerificationReport, Verdict};
use cassandra_runtime::{CheckResult, CheckStatus};
use colored::{Color, Colorize};

const RULE_WIDTH: usize = 70;

const BANNER: &str = r#"
  ____    _    ____ ____    _    _   _ ____  ____      _
 / ___|  / \  / ___/ ___|  / \  | \ | |  _ \|  _ \    / \
| |     / _ \ \___ \___ \ / _ \ |  \| | | | | |_) |  / _ \
| |___ / ___ \ ___) |__) / ___ \| |\  | |_| |  _ <  / ___ \
 \____/_/   \_\____/____/_/   \_\_| \_|____/|_| \_\/_/   \_\

        Autonomous OSINT Verification Engine
"#;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
    json: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool, json: bool) -> Self {
        Self {
            color_enabled,
            json,
        }
    }

    /// Banner and short introduction for interactive mode.
    pub fn banner(&self) -> String {
        let mut out = self.paint(BANNER, Color::Cyan, true);
        out.push('\n');
        out.push_str(&format!(
            "{} uses a multi-agent adversarial system:\n",
            self.paint("The CASSANDRA Engine", Color::White, true)
        ));
        for (name, color, role) in [
            ("Journalist", Color::Blue, "researches and builds a hypothesis"),
            ("Editor", Color::Yellow, "skeptically audits for contradictions"),
            ("Archivist", Color::Cyan, "archives findings to the Truth Graph"),
        ] {
            out.push_str(&format!("  {} - {}\n", self.paint(name, color, false), role));
        }
        out.push('\n');
        out.push_str(&self.paint(
            "Enter a claim, rumor, or news headline to verify.",
            Color::Green,
            false,
        ));
        out.push('\n');
        out.push_str(&self.paint("Press Ctrl+C to exit.", Color::Yellow, false));
        out
    }

    /// Render a verification report.
    pub fn report(&self, report: &VerificationReport) -> serde_json::Result<String> {
        if self.json {
            return serde_json::to_string_pretty(report);
        }

        let mut out = String::new();
        out.push_str(&self.rule(Color::Green));
        out.push_str(&format!("  {}\n", self.paint("VERIFICATION COMPLETE", Color::Green, true)));
        out.push_str(&self.rule(Color::Green));
        out.push('\n');

        out.push_str(&format!("{} {}\n", self.label("CLAIM:"), report.claim));
        out.push_str(&format!("{} {}\n", self.label("HYPOTHESIS:"), report.hypothesis));
        out.push_str(&format!("{} {}\n", self.label("AUDIT EVIDENCE:"), report.evidence));
        out.push('\n');

        let verdict_color = match report.verdict {
            Verdict::Debunked => Color::Red,
            Verdict::Verified => Color::Green,
        };
        out.push_str(&format!(
            "{} {}\n",
            self.label("FINAL VERDICT:"),
            self.paint(report.verdict.as_str(), verdict_color, true)
        ));
        out.push_str(&format!("{} {}%\n", self.label("CONFIDENCE:"), report.confidence));

        let kill_color = if report.kill_score > 50 { Color::Red } else { Color::Green };
        out.push_str(&format!(
            "{} {}\n",
            self.label("KILL SCORE:"),
            self.paint(&format!("{}/100", report.kill_score), kill_color, false)
        ));
        out.push_str(&format!("{} {}\n", self.label("STATUS:"), report.status));

        if !report.sources.is_empty() {
            let heading = format!("SOURCES ({}):", report.sources.len());
            out.push_str(&format!("\n{}\n", self.label(&heading)));
            for (i, source) in report.sources.iter().enumerate() {
                out.push_str(&format!("  [{}] {}\n", i + 1, source));
            }
        }

        out.push('\n');
        out.push_str(&self.rule(Color::Cyan));
        Ok(out)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.paint(message, Color::Green, false)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.paint(&format!("[!] {}", message), Color::Yellow, false)
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.paint(&format!("[ERROR] {}", message), Color::Red, false)
    }

    /// One line per connection check.
    pub fn check(&self, result: &CheckResult) -> String {
        let (tag, detail, color) = match &result.status {
            CheckStatus::Passed(detail) => ("[OK]", detail, Color::Green),
            CheckStatus::Failed(detail) => ("[FAIL]", detail, Color::Red),
            CheckStatus::Skipped(detail) => ("[SKIP]", detail, Color::Yellow),
        };
        format!(
            "{} {}: {}",
            self.paint(tag, color, true),
            self.label(result.target.as_str()),
            detail
        )
    }

    /// Closing message for interactive mode.
    pub fn farewell(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let text = format!(
            "{}\n  Thank you for using CASSANDRA!\n  Stay skeptical.\n{}",
            rule, rule
        );
        self.paint(&text, Color::Cyan, false)
    }

    fn rule(&self, color: Color) -> String {
        format!("{}\n", self.paint(&"=".repeat(RULE_WIDTH), color, true))
    }

    fn label(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text if color is enabled.
    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        let styled = text.color(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cassandra_core::{ClaimVerificationState, StateUpdate, Status};

    fn report(contradiction: bool, kill_score: u8) -> VerificationReport {
        let state = ClaimVerificationState::new("The moon landing was staged")
            .unwrap()
            .merged(StateUpdate::researched(
                "Claim is false",
                vec!["https://nasa.example".into(), "https://archive.example".into()],
                85,
            ))
            .merged(StateUpdate::audited(contradiction, "Telemetry is public", kill_score))
            .merged(StateUpdate::status(Status::SkippedDb));
        VerificationReport::from_state(&state)
    }

    #[test]
    fn test_plain_report() {
        let formatter = Formatter::new(false, false);
        let output = formatter.report(&report(true, 90)).unwrap();

        assert!(output.contains("FINAL VERDICT: DEBUNKED"));
        assert!(output.contains("CONFIDENCE: 85%"));
        assert!(output.contains("KILL SCORE: 90/100"));
        assert!(output.contains("STATUS: skipped_db"));
        assert!(output.contains("SOURCES (2):"));
        assert!(output.contains("  [1] https://nasa.example"));
        assert!(output.contains("  [2] https://archive.example"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_report_without_sources() {
        let formatter = Formatter::new(false, false);
        let mut r = report(false, 10);
        r.sources.clear();
        let output = formatter.report(&r).unwrap();
        assert!(output.contains("FINAL VERDICT: VERIFIED"));
        assert!(!output.contains("SOURCES"));
    }

    #[test]
    fn test_json_report() {
        let formatter = Formatter::new(true, true);
        let output = formatter.report(&report(false, 10)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["verdict"], "VERIFIED");
        assert_eq!(value["status"], "skipped_db");
        assert_eq!(value["confidence"], 85);
        assert_eq!(value["sources"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_colored_report() {
        colored::control::set_override(true);
        let formatter = Formatter::new(true, false);
        let output = formatter.report(&report(true, 90)).unwrap();
        assert!(output.contains('\u{1b}'));
        assert!(output.contains("DEBUNKED"));
    }

    #[test]
    fn test_check_lines() {
        use cassandra_runtime::CheckTarget;

        let formatter = Formatter::new(false, false);
        let line = |target, status| formatter.check(&CheckResult { target, status });

        assert_eq!(
            line(CheckTarget::Model, CheckStatus::Passed("gemini answered".into())),
            "[OK] model: gemini answered"
        );
        assert_eq!(
            line(CheckTarget::Graph, CheckStatus::Failed("Authentication failed".into())),
            "[FAIL] graph: Authentication failed"
        );
        assert_eq!(
            line(CheckTarget::Graph, CheckStatus::Skipped("not configured".into())),
            "[SKIP] graph: not configured"
        );
    }

    #[test]
    fn test_messages_without_color() {
        let formatter = Formatter::new(false, false);
        assert_eq!(formatter.warning("No claim entered."), "[!] No claim entered.");
        assert_eq!(formatter.error("boom"), "[ERROR] boom");
        assert!(formatter.farewell().contains("Thank you for using CASSANDRA!"));
        assert!(formatter.banner().contains("Ctrl+C"));
    }
}
