//! Yes/no confirmation seam for destructive steps.

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Ask `question`; `true` means go ahead.
    fn confirm(&self, question: &str) -> bool;
}

/// Always gives the same answer. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}

/// Whether a typed reply means yes. Anything but `y`/`yes` is no.
pub fn is_yes(reply: &str) -> bool {
    matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        for reply in ["y", "Y", "yes", " YES\n"] {
            assert!(is_yes(reply), "{reply:?}");
        }
        for reply in ["", "n", "no", "yep", "\n"] {
            assert!(!is_yes(reply), "{reply:?}");
        }
    }

    #[test]
    fn test_fixed_answer() {
        assert!(Answer(true).confirm("Kill the tmux server?"));
        assert!(!Answer(false).confirm("Kill the tmux server?"));
    }
}
