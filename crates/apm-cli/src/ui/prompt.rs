//! Interactive yes/no confirmation on stdin.

use std::io::{self, BufRead, Write};

use apm_core::Prompter;
use apm_core::prompt::is_affirmative;

/// Asks on stdout and reads one line from stdin. EOF or a read error is a no.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> bool {
        print!("{question} (y/N) ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}
