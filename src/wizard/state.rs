//! Registration wizard state machine.
//!
//! One `Session` per chat. The transition function is `Session::apply`:
//! pure over the session fields, no I/O, so every path is unit-testable.
//! In-flight child data travels inside the step variants; a `ChildRecord`
//! exists only once all three of its fields have been collected.

use chrono::Utc;

use crate::store::model::{ChildRecord, RegistrationEntry};
use crate::wizard::{prompts, validate};

/// Which field the wizard is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    AskParentName,
    AskParentPhone,
    AskChildCount,
    AskChildName,
    AskChildAge { name: String },
    AskChildNeeds { name: String, age: u8 },
    /// All fields collected; the entry awaits persistence. Any further
    /// reply re-emits the entry so a failed store write can be retried.
    ReadyToSubmit,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AskParentName => "ask_parent_name",
            Self::AskParentPhone => "ask_parent_phone",
            Self::AskChildCount => "ask_child_count",
            Self::AskChildName => "ask_child_name",
            Self::AskChildAge { .. } => "ask_child_age",
            Self::AskChildNeeds { .. } => "ask_child_needs",
            Self::ReadyToSubmit => "ready_to_submit",
        };
        write!(f, "{s}")
    }
}

/// Outcome of feeding one reply to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Input accepted; send the next prompt.
    Next { prompt: String },
    /// Input rejected; same step, send the error prompt.
    Invalid { prompt: String },
    /// Every field collected; persist the finalized entry.
    Complete(RegistrationEntry),
}

/// In-progress registration conversation for one chat.
#[derive(Debug, Clone)]
pub struct Session {
    step: WizardStep,
    parent_name: Option<String>,
    parent_phone: Option<String>,
    child_count: Option<u32>,
    /// 1-based index of the child currently being collected.
    current_child: u32,
    children: Vec<ChildRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            step: WizardStep::AskParentName,
            parent_name: None,
            parent_phone: None,
            child_count: None,
            current_child: 0,
            children: Vec::new(),
        }
    }

    /// The prompt sent when the session is created.
    pub fn first_prompt() -> &'static str {
        prompts::PARENT_NAME
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Feed one user reply. The cancel signal is handled by the dispatcher
    /// before this is called.
    pub fn apply(&mut self, input: &str) -> StepResult {
        let step = self.step.clone();
        match step {
            WizardStep::AskParentName => {
                if !validate::is_valid_name(input) {
                    return StepResult::Invalid {
                        prompt: prompts::PARENT_NAME_INVALID.into(),
                    };
                }
                self.parent_name = Some(input.trim().to_string());
                self.step = WizardStep::AskParentPhone;
                StepResult::Next {
                    prompt: prompts::PARENT_PHONE.into(),
                }
            }

            WizardStep::AskParentPhone => {
                if !validate::is_valid_phone(input) {
                    return StepResult::Invalid {
                        prompt: prompts::PARENT_PHONE_INVALID.into(),
                    };
                }
                self.parent_phone = Some(input.trim().to_string());
                self.step = WizardStep::AskChildCount;
                StepResult::Next {
                    prompt: prompts::CHILD_COUNT.into(),
                }
            }

            WizardStep::AskChildCount => match validate::parse_child_count(input) {
                Some(count) => {
                    self.child_count = Some(count);
                    self.current_child = 1;
                    self.step = WizardStep::AskChildName;
                    StepResult::Next {
                        prompt: prompts::child_name(1),
                    }
                }
                None => StepResult::Invalid {
                    prompt: prompts::CHILD_COUNT_INVALID.into(),
                },
            },

            WizardStep::AskChildName => {
                if !validate::is_valid_name(input) {
                    return StepResult::Invalid {
                        prompt: prompts::CHILD_NAME_INVALID.into(),
                    };
                }
                self.step = WizardStep::AskChildAge {
                    name: input.trim().to_string(),
                };
                StepResult::Next {
                    prompt: prompts::CHILD_AGE.into(),
                }
            }

            WizardStep::AskChildAge { name } => match validate::parse_age(input) {
                Some(age) => {
                    self.step = WizardStep::AskChildNeeds { name, age };
                    StepResult::Next {
                        prompt: prompts::CHILD_NEEDS.into(),
                    }
                }
                None => StepResult::Invalid {
                    prompt: prompts::CHILD_AGE_INVALID.into(),
                },
            },

            WizardStep::AskChildNeeds { name, age } => {
                let Some(needs) = validate::normalize_needs(input) else {
                    return StepResult::Invalid {
                        prompt: prompts::CHILD_NEEDS_INVALID.into(),
                    };
                };
                self.children.push(ChildRecord { name, age, needs });

                // child_count is always set once the sub-cycle has started.
                let target = self.child_count.unwrap_or(self.current_child);
                if self.current_child < target {
                    self.current_child += 1;
                    self.step = WizardStep::AskChildName;
                    StepResult::Next {
                        prompt: prompts::child_name(self.current_child),
                    }
                } else {
                    self.step = WizardStep::ReadyToSubmit;
                    StepResult::Complete(self.build_entry())
                }
            }

            WizardStep::ReadyToSubmit => StepResult::Complete(self.build_entry()),
        }
    }

    /// Assemble the immutable registration entry from the collected fields.
    fn build_entry(&self) -> RegistrationEntry {
        RegistrationEntry {
            parent_name: self.parent_name.clone().unwrap_or_default(),
            parent_phone: self.parent_phone.clone().unwrap_or_default(),
            child_count: self.child_count.unwrap_or(self.children.len() as u32),
            children: self.children.clone(),
            registered_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_next(result: StepResult, expected_prompt: &str) {
        match result {
            StepResult::Next { prompt } => assert_eq!(prompt, expected_prompt),
            other => panic!("expected Next({expected_prompt:?}), got {other:?}"),
        }
    }

    fn assert_invalid(result: StepResult, expected_prompt: &str) {
        match result {
            StepResult::Invalid { prompt } => assert_eq!(prompt, expected_prompt),
            other => panic!("expected Invalid({expected_prompt:?}), got {other:?}"),
        }
    }

    /// Drive a fresh session up to (but not including) the needs answer of
    /// the last child.
    fn run_to_last_needs(count: u32) -> Session {
        let mut session = Session::new();
        session.apply("Гаврилюк Оля");
        session.apply("0681234567");
        session.apply(&count.to_string());
        for i in 1..=count {
            session.apply(&format!("Іваненко Петро-{}", "о".repeat(i as usize)));
            session.apply("10");
            if i < count {
                session.apply("Ні");
            }
        }
        session
    }

    #[test]
    fn happy_path_two_children() {
        let mut session = Session::new();
        assert_eq!(Session::first_prompt(), prompts::PARENT_NAME);

        assert_next(session.apply("Гаврилюк Оля"), prompts::PARENT_PHONE);
        assert_next(session.apply("0681234567"), prompts::CHILD_COUNT);
        assert_next(session.apply("2"), &prompts::child_name(1));
        assert_next(session.apply("Іваненко Петро"), prompts::CHILD_AGE);
        assert_next(session.apply("10"), prompts::CHILD_NEEDS);
        assert_next(session.apply("Ні"), &prompts::child_name(2));
        assert_next(session.apply("Коваль Іван"), prompts::CHILD_AGE);
        assert_next(session.apply("7"), prompts::CHILD_NEEDS);

        let StepResult::Complete(entry) = session.apply("Астма") else {
            panic!("expected completion");
        };
        assert_eq!(entry.parent_name, "Гаврилюк Оля");
        assert_eq!(entry.parent_phone, "0681234567");
        assert_eq!(entry.child_count, 2);
        assert_eq!(entry.children.len(), 2);
        assert_eq!(entry.children[0].name, "Іваненко Петро");
        assert_eq!(entry.children[0].age, 10);
        assert_eq!(entry.children[0].needs, "Ні");
        assert_eq!(entry.children[1].name, "Коваль Іван");
        assert_eq!(entry.children[1].age, 7);
        assert_eq!(entry.children[1].needs, "Астма");
    }

    #[test]
    fn invalid_input_keeps_the_step() {
        let mut session = Session::new();

        assert_invalid(session.apply("оля"), prompts::PARENT_NAME_INVALID);
        assert_eq!(session.step(), &WizardStep::AskParentName);
        // Unbounded retries: still rejecting, still in place.
        assert_invalid(session.apply("Оля"), prompts::PARENT_NAME_INVALID);
        assert_next(session.apply("Гаврилюк Оля"), prompts::PARENT_PHONE);

        assert_invalid(session.apply("123456"), prompts::PARENT_PHONE_INVALID);
        assert_eq!(session.step(), &WizardStep::AskParentPhone);
        assert_next(session.apply("+380681234567"), prompts::CHILD_COUNT);

        assert_invalid(session.apply("0"), prompts::CHILD_COUNT_INVALID);
        assert_invalid(session.apply("багато"), prompts::CHILD_COUNT_INVALID);
        assert_next(session.apply("1"), &prompts::child_name(1));

        assert_invalid(session.apply("Петрик"), prompts::CHILD_NAME_INVALID);
        assert_next(session.apply("Іваненко Петро"), prompts::CHILD_AGE);

        assert_invalid(session.apply("4"), prompts::CHILD_AGE_INVALID);
        assert_invalid(session.apply("17"), prompts::CHILD_AGE_INVALID);
        assert_next(session.apply("5"), prompts::CHILD_NEEDS);

        assert_invalid(session.apply(&"б".repeat(101)), prompts::CHILD_NEEDS_INVALID);
        assert!(matches!(session.apply("Ні"), StepResult::Complete(_)));
    }

    #[test]
    fn single_child_completes_after_one_cycle() {
        let mut session = run_to_last_needs(1);
        let StepResult::Complete(entry) = session.apply("Ні") else {
            panic!("expected completion");
        };
        assert_eq!(entry.child_count, 1);
        assert_eq!(entry.children.len(), 1);
    }

    #[test]
    fn five_children_cycle_five_times() {
        let mut session = run_to_last_needs(5);
        let StepResult::Complete(entry) = session.apply("Ні") else {
            panic!("expected completion");
        };
        assert_eq!(entry.child_count, 5);
        assert_eq!(entry.children.len(), 5);
        // Input order preserved.
        for (i, child) in entry.children.iter().enumerate() {
            assert!(child.name.starts_with("Іваненко"), "child {i}");
        }
    }

    #[test]
    fn ready_to_submit_re_emits_the_entry() {
        let mut session = run_to_last_needs(1);
        let StepResult::Complete(first) = session.apply("Ні") else {
            panic!("expected completion");
        };
        assert_eq!(session.step(), &WizardStep::ReadyToSubmit);

        // A storage failure keeps the session; any reply retries.
        let StepResult::Complete(second) = session.apply("повторити") else {
            panic!("expected re-emitted completion");
        };
        assert_eq!(second.children, first.children);
        assert_eq!(second.child_count, first.child_count);
    }

    #[test]
    fn values_are_trimmed() {
        let mut session = Session::new();
        session.apply("  Гаврилюк Оля  ");
        session.apply(" 0681234567 ");
        session.apply("1");
        session.apply("  Іваненко Петро ");
        session.apply(" 10 ");
        let StepResult::Complete(entry) = session.apply("  Астма  ") else {
            panic!("expected completion");
        };
        assert_eq!(entry.parent_name, "Гаврилюк Оля");
        assert_eq!(entry.parent_phone, "0681234567");
        assert_eq!(entry.children[0].name, "Іваненко Петро");
        assert_eq!(entry.children[0].needs, "Астма");
    }

    #[test]
    fn step_display_names() {
        assert_eq!(WizardStep::AskParentName.to_string(), "ask_parent_name");
        assert_eq!(
            WizardStep::AskChildNeeds {
                name: "Іваненко Петро".into(),
                age: 10
            }
            .to_string(),
            "ask_child_needs"
        );
    }
}
