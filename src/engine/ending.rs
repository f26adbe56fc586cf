#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Latch for a session's terminal state. Only the first `conclude` sticks.
#[derive(Debug, Default)]
pub struct Ending {
    outcome: Option<Outcome>,
}

impl Ending {
    /// Returns true if this call ended the session.
    pub fn conclude(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn clear(&mut self) {
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_conclusion_wins() {
        let mut ending = Ending::default();
        assert!(!ending.is_over());
        assert!(ending.conclude(Outcome::Defeat));
        assert!(!ending.conclude(Outcome::Victory));
        assert_eq!(ending.outcome(), Some(Outcome::Defeat));
        ending.clear();
        assert_eq!(ending.outcome(), None);
    }
}
