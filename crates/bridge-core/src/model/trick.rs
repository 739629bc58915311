use crate::model::card::Card;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn { expected: Seat, actual: Seat },
    #[error("{0} has already played this trick")]
    AlreadyPlayed(Seat),
}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn card_of(&self, seat: Seat) -> Option<Card> {
        self.plays
            .iter()
            .find(|play| play.seat == seat)
            .map(|play| play.card)
    }

    /// Seat due to play next, or `None` once all four have played.
    pub fn next_seat(&self) -> Option<Seat> {
        if self.is_complete() {
            None
        } else {
            Some(self.expected_seat())
        }
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// Best play so far: the highest trump if any was played, else the
    /// highest card of the led suit.
    pub fn winning_play(&self, trump: Option<Suit>) -> Option<Play> {
        let lead_suit = self.lead_suit()?;
        let trumps = trump.filter(|suit| self.plays.iter().any(|play| play.card.suit == *suit));
        let winning_suit = trumps.unwrap_or(lead_suit);
        self.plays
            .iter()
            .filter(|play| play.card.suit == winning_suit)
            .max_by_key(|play| play.card.rank)
            .copied()
    }

    pub fn winner(&self, trump: Option<Suit>) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        self.winning_play(trump).map(|play| play.seat)
    }

    fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.next())
            .unwrap_or(self.leader)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    fn trick(leader: Seat, cards: [&str; 4]) -> Trick {
        let mut trick = Trick::new(leader);
        let mut seat = leader;
        for text in cards {
            trick.play(seat, text.parse::<Card>().unwrap()).unwrap();
            seat = seat.next();
        }
        trick
    }

    #[test]
    fn plays_follow_turn_order() {
        let mut trick = Trick::new(Seat::North);
        assert!(trick.play(Seat::North, "2C".parse().unwrap()).is_ok());
        assert!(matches!(
            trick.play(Seat::South, "3C".parse().unwrap()),
            Err(TrickError::OutOfTurn { .. })
        ));
        assert!(matches!(
            trick.play(Seat::North, "4C".parse().unwrap()),
            Err(TrickError::AlreadyPlayed(Seat::North))
        ));
        assert_eq!(trick.next_seat(), Some(Seat::East));
    }

    #[test]
    fn errors_name_the_seats_involved() {
        let err = TrickError::OutOfTurn {
            expected: Seat::North,
            actual: Seat::East,
        };
        assert_eq!(err.to_string(), "expected North to play next but got East");
        assert_eq!(
            TrickError::AlreadyPlayed(Seat::West).to_string(),
            "West has already played this trick"
        );
    }

    #[test]
    fn winner_is_highest_card_of_lead_suit_without_trumps() {
        let trick = trick(Seat::North, ["10C", "QC", "4C", "AS"]);
        assert_eq!(trick.winner(None), Some(Seat::East));
        assert_eq!(trick.winner(Some(Suit::Hearts)), Some(Seat::East));
    }

    #[test]
    fn lowest_trump_beats_led_ace() {
        let trick = trick(Seat::West, ["AD", "KD", "2S", "QD"]);
        assert_eq!(trick.winner(Some(Suit::Spades)), Some(Seat::East));
        assert_eq!(trick.winner(None), Some(Seat::West));
    }

    #[test]
    fn highest_trump_wins_overruff() {
        let trick = trick(Seat::East, ["AH", "3C", "QH", "5C"]);
        assert_eq!(trick.winner(Some(Suit::Clubs)), Some(Seat::North));
    }

    #[test]
    fn incomplete_trick_has_no_winner() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, "AS".parse().unwrap()).unwrap();
        assert_eq!(trick.winner(None), None);
        assert_eq!(trick.winning_play(None).map(|p| p.seat), Some(Seat::North));
    }

    #[test]
    fn complete_trick_rejects_fifth_card() {
        let mut trick = trick(Seat::North, ["2C", "3C", "4C", "5C"]);
        assert_eq!(trick.next_seat(), None);
        assert_eq!(
            trick.play(Seat::North, "6C".parse().unwrap()),
            Err(TrickError::TrickComplete)
        );
        assert_eq!(trick.card_of(Seat::South), Some("4C".parse().unwrap()));
    }
}
