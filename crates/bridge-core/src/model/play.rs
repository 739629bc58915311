use crate::error::{EngineError, Invariant};
use crate::model::phase::Phase;
use crate::model::card::Card;
use crate::model::contract::Contract;
use crate::model::deck::validate_hands;
use crate::model::hand::Hand;
use crate::model::seat::{Partnership, Seat};
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};
use std::vec::Vec;
use tracing::{Level, event};

pub const TRICKS_PER_DEAL: usize = 13;

/// Card play for one contract, from the opening lead to the thirteenth trick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayState {
    contract: Contract,
    hands: [Hand; 4],
    current_trick: Trick,
    trick_history: Vec<Trick>,
    tally: TrickTally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPhase {
    AwaitingLead(Seat),
    AwaitingFollow(Seat),
    DealComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrickTally {
    pub north_south: u8,
    pub east_west: u8,
}

impl TrickTally {
    pub const fn for_side(&self, side: Partnership) -> u8 {
        match side {
            Partnership::NorthSouth => self.north_south,
            Partnership::EastWest => self.east_west,
        }
    }

    pub const fn total(&self) -> u8 {
        self.north_south + self.east_west
    }

    fn credit(&mut self, side: Partnership) {
        match side {
            Partnership::NorthSouth => self.north_south += 1,
            Partnership::EastWest => self.east_west += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played { next: Seat },
    TrickComplete { winner: Seat, trick_number: u8 },
    DealComplete { winner: Seat, tally: TrickTally },
}

impl PlayState {
    pub fn new(hands: [Hand; 4], contract: Contract) -> Result<Self, Invariant> {
        validate_hands(&hands)?;
        Ok(Self {
            contract,
            hands,
            current_trick: Trick::new(contract.opening_leader()),
            trick_history: Vec::with_capacity(TRICKS_PER_DEAL),
            tally: TrickTally::default(),
        })
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn dummy(&self) -> Seat {
        self.contract.dummy()
    }

    /// Seat that chooses the card for `seat`: declarer plays dummy's cards.
    pub fn controller(&self, seat: Seat) -> Seat {
        if seat == self.contract.dummy() {
            self.contract.declarer
        } else {
            seat
        }
    }

    /// Dummy is exposed once the opening lead has been made.
    pub fn is_dummy_visible(&self) -> bool {
        !(self.trick_history.is_empty() && self.current_trick.is_empty())
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_completed(&self) -> usize {
        self.trick_history.len()
    }

    pub fn tally(&self) -> TrickTally {
        self.tally
    }

    pub fn declarer_tricks(&self) -> u8 {
        self.tally.for_side(self.contract.declaring_side())
    }

    pub fn cards_played(&self) -> usize {
        self.trick_history.len() * 4 + self.current_trick.plays().len()
    }

    pub fn is_complete(&self) -> bool {
        self.trick_history.len() == TRICKS_PER_DEAL
    }

    pub fn phase(&self) -> PlayPhase {
        if self.is_complete() {
            return PlayPhase::DealComplete;
        }
        match self.current_trick.next_seat() {
            Some(seat) if self.current_trick.is_empty() => PlayPhase::AwaitingLead(seat),
            Some(seat) => PlayPhase::AwaitingFollow(seat),
            None => PlayPhase::DealComplete,
        }
    }

    pub fn next_seat(&self) -> Option<Seat> {
        match self.phase() {
            PlayPhase::AwaitingLead(seat) | PlayPhase::AwaitingFollow(seat) => Some(seat),
            PlayPhase::DealComplete => None,
        }
    }

    /// Validates a play without applying it.
    pub fn check(&self, seat: Seat, card: Card) -> Result<(), EngineError> {
        let Some(expected) = self.next_seat() else {
            return Err(EngineError::WrongPhase {
                operation: "play a card",
                phase: Phase::Complete,
            });
        };
        if seat != expected {
            return Err(EngineError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(EngineError::CardNotInHand { seat, card });
        }

        if let Some(led) = self.current_trick.lead_suit() {
            if card.suit != led && hand.has_suit(led) {
                return Err(EngineError::RevokeViolation { seat, card, led });
            }
        }
        Ok(())
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, EngineError> {
        self.check(seat, card)?;

        self.current_trick.play(seat, card).map_err(Invariant::from)?;
        self.hands[seat.index()].remove(card);

        if !self.current_trick.is_complete() {
            let next = seat.next();
            return Ok(PlayOutcome::Played { next });
        }

        let trump = self.contract.trump();
        let winner = self
            .current_trick
            .winner(trump)
            .unwrap_or_else(|| self.current_trick.leader());
        self.tally.credit(winner.partnership());
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        self.trick_history.push(finished);
        let trick_number = self.trick_history.len() as u8;

        event!(
            target: "bridge_core::play",
            Level::DEBUG,
            trick = trick_number,
            winner = %winner,
            north_south = self.tally.north_south,
            east_west = self.tally.east_west,
            "trick won"
        );

        if self.is_complete() {
            Ok(PlayOutcome::DealComplete {
                winner,
                tally: self.tally,
            })
        } else {
            Ok(PlayOutcome::TrickComplete {
                winner,
                trick_number,
            })
        }
    }

    /// Cards `seat` may play right now; empty when it is not their turn.
    pub fn legal_cards(&self, seat: Seat) -> Vec<Card> {
        if self.next_seat() != Some(seat) {
            return Vec::new();
        }
        let hand = &self.hands[seat.index()];
        match self.current_trick.lead_suit() {
            Some(led) if hand.has_suit(led) => hand.cards_in(led).collect(),
            _ => hand.cards().to_vec(),
        }
    }
}
