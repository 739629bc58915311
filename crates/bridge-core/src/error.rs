use crate::model::bid::{Bid, Call};
use crate::model::card::Card;
use crate::model::phase::Phase;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use crate::model::trick::TrickError;
use thiserror::Error;

/// Every way the engine can reject an operation. A rejected call never
/// mutates state, so the caller may re-prompt with a different move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("expected {expected} to act next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{call} is not a legal call: {reason}")]
    IllegalBid {
        call: Call,
        reason: IllegalBidReason,
    },
    #[error("{seat} does not hold {card}")]
    CardNotInHand { seat: Seat, card: Card },
    #[error("{seat} must follow {led} and cannot play {card}")]
    RevokeViolation { seat: Seat, card: Card, led: Suit },
    #[error("invariant violated: {0}")]
    InvariantViolation(#[from] Invariant),
    #[error("cannot {operation} while the deal is in the {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalBidReason {
    #[error("bid must outrank {current}")]
    NotHigher { current: Bid },
    #[error("level {0} is outside 1..=7")]
    LevelOutOfRange(u8),
    #[error("there is no opposing bid to double")]
    NothingToDouble,
    #[error("the last bid belongs to the caller's side")]
    OwnSideBid,
    #[error("the last bid belongs to the opponents")]
    OpponentsBid,
    #[error("the bid is already doubled")]
    AlreadyDoubled,
    #[error("only a bid doubled by the opponents can be redoubled")]
    NotDoubled,
    #[error("the bid is already redoubled")]
    AlreadyRedoubled,
}

/// Structural corruption of the deal: bad decks, bad hands, or an event log
/// that no longer agrees with the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Invariant {
    #[error("deck holds {0} cards instead of 52")]
    DeckSize(usize),
    #[error("{0} appears more than once")]
    DuplicateCard(Card),
    #[error("{seat} holds {len} cards instead of 13")]
    HandSize { seat: Seat, len: usize },
    #[error("replay diverged at event {index}: {detail}")]
    ReplayDiverged { index: usize, detail: String },
    #[error("trick bookkeeping out of step: {0}")]
    Trick(#[from] TrickError),
}

#[cfg(test)]
mod tests {
    use super::{EngineError, IllegalBidReason, Invariant};
    use crate::model::bid::{Bid, Call, Strain};
    use crate::model::seat::Seat;
    use crate::model::trick::TrickError;

    #[test]
    fn messages_name_the_offender() {
        let err = EngineError::OutOfTurn {
            expected: Seat::North,
            actual: Seat::West,
        };
        assert_eq!(err.to_string(), "expected North to act next but got West");

        let one_club = Bid::new(1, Strain::Clubs).unwrap();
        let err = EngineError::IllegalBid {
            call: Call::Bid(one_club),
            reason: IllegalBidReason::NotHigher {
                current: Bid::new(1, Strain::NoTrump).unwrap(),
            },
        };
        assert_eq!(err.to_string(), "1C is not a legal call: bid must outrank 1NT");
    }

    #[test]
    fn invariants_convert_into_engine_errors() {
        let err: EngineError = Invariant::DeckSize(51).into();
        assert!(matches!(err, EngineError::InvariantViolation(Invariant::DeckSize(51))));
    }

    #[test]
    fn trick_errors_surface_as_invariant_violations() {
        let err: EngineError = Invariant::from(TrickError::OutOfTurn {
            expected: Seat::East,
            actual: Seat::South,
        })
        .into();
        assert_eq!(
            err.to_string(),
            "invariant violated: trick bookkeeping out of step: \
             expected East to play next but got South"
        );
        assert!(matches!(
            err,
            EngineError::InvariantViolation(Invariant::Trick(TrickError::OutOfTurn { .. }))
        ));
    }
}
