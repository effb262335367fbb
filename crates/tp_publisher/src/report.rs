use std::fmt;

use tp_core::Result;

/// One stage of a publish attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadRecord,
    Generate,
    OpenEditor,
    Title,
    Body,
    Category,
    Tags,
    Save,
}

impl Step {
    /// Fatal steps end the attempt when they fail; the others are best-effort.
    pub fn is_fatal(self) -> bool {
        !matches!(self, Step::Category | Step::Tags)
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::LoadRecord => "load record",
            Step::Generate => "generate article",
            Step::OpenEditor => "open editor",
            Step::Title => "title",
            Step::Body => "body",
            Step::Category => "category",
            Step::Tags => "tags",
            Step::Save => "save",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of every step that ran during one publish attempt.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    outcomes: Vec<StepOutcome>,
}

impl PublishReport {
    /// Records the outcome of `step` and hands back its value on success.
    pub fn record<T>(&mut self, step: Step, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.outcomes.push(StepOutcome { step, error: None });
                Some(value)
            }
            Err(e) => {
                self.outcomes.push(StepOutcome {
                    step,
                    error: Some(e.to_string()),
                });
                None
            }
        }
    }

    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// True once the save was confirmed and no fatal step failed.
    pub fn succeeded(&self) -> bool {
        let saved = self.outcome(Step::Save).is_some_and(StepOutcome::is_ok);
        saved && !self.failures().any(|o| o.step.is_fatal())
    }
}
