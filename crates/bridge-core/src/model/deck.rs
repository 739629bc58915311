use crate::error::Invariant;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const SIZE: usize = 52;

    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Wraps an externally ordered pack. Validation happens in [`Deck::deal`].
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deals the pack round-robin into four 13-card hands indexed by seat,
    /// North first.
    pub fn deal(&self) -> Result<[Hand; 4], Invariant> {
        if self.cards.len() != Self::SIZE {
            return Err(Invariant::DeckSize(self.cards.len()));
        }
        ensure_unique(self.cards.iter().copied())?;

        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        for (index, card) in self.cards.iter().enumerate() {
            hands[index % 4].add(*card);
        }
        Ok(hands)
    }
}

pub(crate) fn ensure_unique(cards: impl IntoIterator<Item = Card>) -> Result<(), Invariant> {
    let mut seen = HashSet::with_capacity(Deck::SIZE);
    for card in cards {
        if !seen.insert(card) {
            return Err(Invariant::DuplicateCard(card));
        }
    }
    Ok(())
}

/// Checks that four hands form a legal fresh deal: 13 cards each, no card
/// held twice.
pub fn validate_hands(hands: &[Hand; 4]) -> Result<(), Invariant> {
    for seat in Seat::LOOP {
        let len = hands[seat.index()].len();
        if len != Hand::FULL {
            return Err(Invariant::HandSize { seat, len });
        }
    }
    ensure_unique(hands.iter().flat_map(|hand| hand.iter().copied()))
}
