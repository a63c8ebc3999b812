use super::Team;

/// Turn bookkeeping for a two-sided game.
///
/// The engine owns the only mutable copy; validators never consult it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    /// 1-based turn counter, incremented every time a side finishes acting.
    pub number: u32,

    /// Side whose pieces may act right now.
    pub current: Team,

    /// Set once a game-over condition was observed.
    pub finished: bool,
}

impl TurnState {
    /// Creates a turn state with `first` to move.
    pub fn new(first: Team) -> Self {
        Self {
            number: 1,
            current: first,
            finished: false,
        }
    }

    /// Hands the turn to the other side.
    pub fn advance(&mut self) {
        self.number += 1;
        self.current = self.current.opponent();
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(Team::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_alternates_sides() {
        let mut turn = TurnState::default();
        assert_eq!(turn.current, Team::White);

        turn.advance();
        assert_eq!(turn.number, 2);
        assert_eq!(turn.current, Team::Black);

        turn.advance();
        assert_eq!(turn.number, 3);
        assert_eq!(turn.current, Team::White);
    }
}
