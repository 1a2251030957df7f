//! Step traces: the human-readable side channel of every calculus pass.
//!
//! A `StepLog` is created fresh by each top-level entry point and threaded through
//! the recursion as `&mut StepLog`, so a trace never leaks between calls and two
//! threads working on independent trees never share one.
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Text fragments marking a step as a soft failure of the engine that emitted it.
pub const FALLBACK_MARKERS: [&str; 3] = ["not integrated", "not differentiated", "not implemented"];

/// One trace entry: the rule that fired and the expression it fired on.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub description: String,
    pub expression: String,
}

impl Step {
    pub fn new(description: impl Into<String>, expression: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            expression: expression.into(),
        }
    }

    /// true if the step reports an unsupported construct, so the result it belongs to
    /// is symbolically incomplete
    pub fn is_fallback(&self) -> bool {
        FALLBACK_MARKERS.iter().any(|marker| {
            self.description.contains(marker) || self.expression.contains(marker)
        })
    }
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Rule")]
    description: String,
    #[tabled(rename = "Expression")]
    expression: String,
}

/// Append-only accumulator of steps, owned by a single invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    pub fn new() -> Self {
        StepLog { steps: Vec::new() }
    }

    pub fn record(&mut self, description: impl Into<String>, expression: impl Into<String>) {
        self.steps.push(Step::new(description, expression));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn has_fallback(&self) -> bool {
        self.steps.iter().any(Step::is_fallback)
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Numbered table of the trace for terminal output.
    pub fn to_table(&self) -> String {
        steps_table(&self.steps)
    }
}

/// Renders any slice of steps the way `StepLog::to_table` does.
pub fn steps_table(steps: &[Step]) -> String {
    let rows: Vec<StepRow> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| StepRow {
            index: i + 1,
            description: step.description.clone(),
            expression: step.expression.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern_rounded());
    table.to_string()
}
