//! Consent decisions for `only if okay "permission" { ... }`.
//!
//! The evaluator asks a [`ConsentPolicy`] the first time a permission is
//! requested in a scope chain and caches the answer in the environment.

use std::io::{self, BufRead, Stderr, StdinLock, Write};

/// Decides whether a permission is granted.
pub trait ConsentPolicy {
    fn decide(&mut self, permission: &str) -> bool;
}

/// Grants every permission. The evaluator's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGrant;

impl ConsentPolicy for AutoGrant {
    fn decide(&mut self, _permission: &str) -> bool {
        true
    }
}

/// Refuses every permission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl ConsentPolicy for DenyAll {
    fn decide(&mut self, _permission: &str) -> bool {
        false
    }
}

impl<F> ConsentPolicy for F
where
    F: FnMut(&str) -> bool,
{
    fn decide(&mut self, permission: &str) -> bool {
        self(permission)
    }
}

/// Asks a person: writes `Permission requested: '<perm>'. Allow? [y/N]: `
/// and reads one line of input.
///
/// Only `y` or `yes` (any case) grants. An empty line, end of input or a
/// read error refuses.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompt<StdinLock<'static>, Stderr> {
    /// Read answers from stdin and ask on stderr, keeping stdout for the
    /// program's own output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsentPolicy for Prompt<R, W> {
    fn decide(&mut self, permission: &str) -> bool {
        let asked = write!(
            self.output,
            "Permission requested: '{permission}'. Allow? [y/N]: "
        )
        .and_then(|()| self.output.flush());
        if let Err(err) = asked {
            tracing::debug!(error = %err, "could not write consent prompt");
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::debug!(error = %err, "could not read consent answer");
                false
            }
        }
    }
}

/// Whether a typed answer grants consent.
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_yes() {
        for answer in ["y", "Y", "yes", "YES\n", "  y  \r\n"] {
            assert!(is_yes(answer), "{answer:?} should grant");
        }
        for answer in ["", "\n", "n", "N", "no", "yep", "maybe", "y y"] {
            assert!(!is_yes(answer), "{answer:?} should refuse");
        }
    }

    #[test]
    fn test_prompt_asks_and_reads_one_line_per_question() {
        let mut shown = Vec::new();
        {
            let mut prompt = Prompt::new(Cursor::new("y\nno\n"), &mut shown);
            assert!(prompt.decide("camera"));
            assert!(!prompt.decide("microphone"));
            // input exhausted
            assert!(!prompt.decide("location"));
        }
        let shown = String::from_utf8(shown).unwrap();
        assert_eq!(
            shown,
            "Permission requested: 'camera'. Allow? [y/N]: \
             Permission requested: 'microphone'. Allow? [y/N]: \
             Permission requested: 'location'. Allow? [y/N]: "
        );
    }

    #[test]
    fn test_fixed_policies() {
        assert!(AutoGrant.decide("anything"));
        assert!(!DenyAll.decide("anything"));
        let mut only_camera = |perm: &str| perm == "camera";
        assert!(ConsentPolicy::decide(&mut only_camera, "camera"));
        assert!(!ConsentPolicy::decide(&mut only_camera, "gps"));
    }
}
