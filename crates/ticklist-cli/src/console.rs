use std::io::{self, BufRead, Write};

use ticklist_core::{
    confirm::{ConfirmRequest, Confirmer},
    notify::{Notice, NoticeLevel, Notifier},
};
use tracing::warn;

/// Prints notices as single lines: successes and info to stdout, errors to stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Info => println!("• {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

/// Asks on the terminal before destructive commands, unless told to assume yes.
pub struct StdinConfirmer {
    assume_yes: bool,
}

impl StdinConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmer for StdinConfirmer {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", request.prompt());
        if let Err(err) = io::stderr().flush() {
            warn!("failed to flush prompt: {err}");
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => parse_answer(&line),
            Err(err) => {
                warn!("failed to read confirmation: {err}");
                false
            }
        }
    }
}

/// Anything other than an explicit yes counts as no.
fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(parse_answer("y\n"));
        assert!(parse_answer(" YES "));
        assert!(!parse_answer("\n"));
        assert!(!parse_answer("nope"));
    }

    #[test]
    fn assume_yes_skips_prompt() {
        let mut confirmer = StdinConfirmer::new(true);
        assert!(confirmer.confirm(&ConfirmRequest::ClearAll { count: 1 }));
    }
}
