//! Step-by-step run reporting
//!
//! Every external command and persistent-config write is recorded as an
//! explicit step outcome instead of being printed and forgotten. Step
//! failures never abort the run; the report is summarized at the end
//! and can be emitted as JSON.

use serde::Serialize;

/// Outcome of a single configuration step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Step completed
    Success,
    /// Step planned but not executed (dry run)
    Skipped,
    /// External command exited non-zero or could not be spawned
    CommandError { code: Option<i32>, stderr: String },
    /// Persistent config file could not be rendered or written
    WriteError { message: String },
}

/// A single recorded step: the command line or file path, and how it went
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub action: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Step {
    fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            Outcome::CommandError { .. } | Outcome::WriteError { .. }
        )
    }
}

/// Accumulated report for a whole run
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub steps: Vec<Step>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: impl Into<String>, outcome: Outcome) {
        self.steps.push(Step {
            action: action.into(),
            outcome,
        });
    }

    /// Number of failed steps (command or write errors)
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.is_failure()).count()
    }

    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        let failed = self.failures();
        if failed == 0 {
            println!("{} step(s) completed.", self.steps.len());
            return;
        }
        println!("{} of {} step(s) failed:", failed, self.steps.len());
        for step in self.steps.iter().filter(|s| s.is_failure()) {
            match &step.outcome {
                Outcome::CommandError { code, stderr } => match code {
                    Some(code) => println!("  {} (exit {}): {}", step.action, code, stderr),
                    None => println!("  {}: {}", step.action, stderr),
                },
                Outcome::WriteError { message } => println!("  {}: {}", step.action, message),
                Outcome::Success | Outcome::Skipped => {}
            }
        }
    }

    /// Serialize the report to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
