//! Terminal confirmation.

use std::io::{self, BufRead, Write};

use muxly_session::prompt::{is_yes, Confirm};
use tracing::warn;

/// Asks on stderr and reads the answer from stdin. Defaults to no.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{question} [y/N] ").and_then(|_| stderr.flush()).is_err() {
            return false;
        }

        let mut reply = String::new();
        match io::stdin().lock().read_line(&mut reply) {
            Ok(_) => is_yes(&reply),
            Err(e) => {
                warn!("Could not read answer: {}", e);
                false
            }
        }
    }
}
