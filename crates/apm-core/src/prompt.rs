//! Confirmation collaborator.
//!
//! Every write to the user's tree is preceded by a question. A negative or
//! unparsable answer means "no write".

#[cfg(any(test, feature = "test-util"))]
use std::collections::VecDeque;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

pub trait Prompter: Send + Sync {
    /// Ask a yes/no question. Returns `true` only on an affirmative answer.
    fn confirm(&self, question: &str) -> bool;
}

/// Interpret a line typed by the user. Only `y` and `yes` are affirmative.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Answers every question with yes (`--yes`).
#[derive(Debug, Clone, Copy)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("auto-confirming: {question}");
        true
    }
}

/// Replays a fixed list of answers and records the questions asked.
///
/// Once the answers run out every further question is declined.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut a| a.pop_front())
            .unwrap_or(false)
    }
}
