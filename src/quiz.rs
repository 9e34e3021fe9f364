use std::fmt;

/// One position in the fixed funnel sequence. `None` is the pre-start
/// sentinel, `Finished` is terminal and never carries a prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuizStep {
    #[default]
    None,
    Role,
    Experience,
    Capital,
    IncomeSources,
    SpareMoney,
    ExpenseTracking,
    BudgetLeak,
    Reserve,
    Goal,
    Finished,
}

impl QuizStep {
    /// Every step that may carry a prompt, in funnel order.
    pub const QUESTIONS: [QuizStep; 9] = [
        QuizStep::Role,
        QuizStep::Experience,
        QuizStep::Capital,
        QuizStep::IncomeSources,
        QuizStep::SpareMoney,
        QuizStep::ExpenseTracking,
        QuizStep::BudgetLeak,
        QuizStep::Reserve,
        QuizStep::Goal,
    ];

    pub fn is_question(self) -> bool {
        !matches!(self, QuizStep::None | QuizStep::Finished)
    }

    /// Stable form stored in the answers table.
    pub fn as_str(self) -> &'static str {
        match self {
            QuizStep::None => "none",
            QuizStep::Role => "role",
            QuizStep::Experience => "experience",
            QuizStep::Capital => "capital",
            QuizStep::IncomeSources => "income_sources",
            QuizStep::SpareMoney => "spare_money",
            QuizStep::ExpenseTracking => "expense_tracking",
            QuizStep::BudgetLeak => "budget_leak",
            QuizStep::Reserve => "reserve",
            QuizStep::Goal => "goal",
            QuizStep::Finished => "finished",
        }
    }
}

impl fmt::Display for QuizStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt and accepted options for one step.
#[derive(Debug, Clone)]
pub struct StepPrompt {
    pub step: QuizStep,
    pub prompt: String,
    pub options: Vec<String>,
}

impl StepPrompt {
    pub fn new(step: QuizStep, prompt: impl Into<String>, options: &[&str]) -> Self {
        Self {
            step,
            prompt: prompt.into(),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("quiz definition has no steps")]
    Empty,
    #[error("step {found} is out of order, expected {expected}")]
    OutOfOrder { expected: QuizStep, found: QuizStep },
    #[error("step {0} has an empty option set")]
    NoOptions(QuizStep),
}

/// Ordered table of step descriptors. Contiguity against the declared
/// question order is checked once at construction, so `next` and
/// `prompt` never have to care about holes.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    steps: Vec<StepPrompt>,
}

impl QuizDefinition {
    pub fn new(steps: Vec<StepPrompt>) -> Result<Self, DefinitionError> {
        if steps.is_empty() {
            return Err(DefinitionError::Empty);
        }
        for (i, descriptor) in steps.iter().enumerate() {
            let expected = *QuizStep::QUESTIONS
                .get(i)
                .ok_or(DefinitionError::OutOfOrder {
                    expected: QuizStep::Finished,
                    found: descriptor.step,
                })?;
            if descriptor.step != expected {
                return Err(DefinitionError::OutOfOrder {
                    expected,
                    found: descriptor.step,
                });
            }
            if descriptor.options.is_empty() {
                return Err(DefinitionError::NoOptions(descriptor.step));
            }
        }
        Ok(Self { steps })
    }

    pub fn first(&self) -> QuizStep {
        self.steps[0].step
    }

    /// The step after `step` in table order, or `Finished` past the last.
    pub fn next(&self, step: QuizStep) -> QuizStep {
        match self.steps.iter().position(|s| s.step == step) {
            Some(i) if i + 1 < self.steps.len() => self.steps[i + 1].step,
            _ => QuizStep::Finished,
        }
    }

    pub fn contains(&self, step: QuizStep) -> bool {
        self.steps.iter().any(|s| s.step == step)
    }

    pub fn prompt(&self, step: QuizStep) -> Option<&StepPrompt> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepPrompt] {
        &self.steps
    }

    /// Case-insensitive exact match of trimmed input against the step's
    /// option set. Returns the canonical option text on a hit.
    pub fn match_option(&self, step: QuizStep, input: &str) -> Option<&str> {
        let input = input.trim().to_lowercase();
        self.prompt(step)?
            .options
            .iter()
            .find(|o| o.trim().to_lowercase() == input)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_steps() -> QuizDefinition {
        QuizDefinition::new(vec![
            StepPrompt::new(QuizStep::Role, "Your role?", &["Founder", "Employee"]),
            StepPrompt::new(QuizStep::Experience, "Experience?", &["Beginner", "3+ years"]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_definition() {
        assert!(matches!(
            QuizDefinition::new(vec![]),
            Err(DefinitionError::Empty)
        ));
    }

    #[test]
    fn rejects_steps_out_of_declared_order() {
        let err = QuizDefinition::new(vec![StepPrompt::new(
            QuizStep::Capital,
            "Capital?",
            &["< 1M"],
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::OutOfOrder {
                expected: QuizStep::Role,
                found: QuizStep::Capital,
            }
        ));
    }

    #[test]
    fn rejects_step_without_options() {
        let err = QuizDefinition::new(vec![StepPrompt::new(QuizStep::Role, "Role?", &[])])
            .unwrap_err();
        assert!(matches!(err, DefinitionError::NoOptions(QuizStep::Role)));
    }

    #[test]
    fn next_walks_the_table_and_ends_at_finished() {
        let quiz = two_steps();
        assert_eq!(quiz.first(), QuizStep::Role);
        assert_eq!(quiz.next(QuizStep::Role), QuizStep::Experience);
        assert_eq!(quiz.next(QuizStep::Experience), QuizStep::Finished);
    }

    #[test]
    fn match_option_ignores_case_and_whitespace() {
        let quiz = two_steps();
        assert_eq!(quiz.match_option(QuizStep::Role, "founder"), Some("Founder"));
        assert_eq!(
            quiz.match_option(QuizStep::Role, "  EMPLOYEE  "),
            Some("Employee")
        );
        assert_eq!(quiz.match_option(QuizStep::Role, "CEO"), None);
        assert_eq!(quiz.match_option(QuizStep::Role, "Found"), None);
    }

    #[test]
    fn match_option_on_non_question_steps_is_none() {
        let quiz = two_steps();
        assert_eq!(quiz.match_option(QuizStep::None, "Founder"), None);
        assert_eq!(quiz.match_option(QuizStep::Finished, "Founder"), None);
    }
}
