//! Static hand evaluation used by bidding policies and by displays that want
//! to annotate a hand (points, shape, stoppers).

use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Suit lengths indexed by [`Suit::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shape {
    lengths: [u8; 4],
}

impl Shape {
    pub fn of(hand: &Hand) -> Self {
        Self::from_cards(hand.cards())
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        let mut lengths = [0u8; 4];
        for card in cards {
            lengths[card.suit.index()] += 1;
        }
        Self { lengths }
    }

    pub const fn length(&self, suit: Suit) -> u8 {
        self.lengths[suit.index()]
    }

    /// Lengths sorted longest first, e.g. `[5, 3, 3, 2]`.
    pub fn pattern(&self) -> [u8; 4] {
        let mut sorted = self.lengths;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted
    }

    /// 4-3-3-3, 4-4-3-2 and 5-3-3-2 count as balanced.
    pub fn is_balanced(&self) -> bool {
        matches!(self.pattern(), [4, 3, 3, 3] | [4, 4, 3, 2] | [5, 3, 3, 2])
    }

    /// Void 3, singleton 2, doubleton 1.
    pub fn distribution_points(&self) -> u8 {
        self.lengths
            .iter()
            .map(|len| match len {
                0 => 3,
                1 => 2,
                2 => 1,
                _ => 0,
            })
            .sum()
    }

    /// Longer five-card-or-better major, spades on equal length.
    pub fn longest_major(&self) -> Option<Suit> {
        let spades = self.length(Suit::Spades);
        let hearts = self.length(Suit::Hearts);
        if spades >= 5 && spades >= hearts {
            Some(Suit::Spades)
        } else if hearts >= 5 {
            Some(Suit::Hearts)
        } else {
            None
        }
    }

    /// Longer minor, diamonds on equal length.
    pub fn better_minor(&self) -> Suit {
        if self.length(Suit::Diamonds) >= self.length(Suit::Clubs) {
            Suit::Diamonds
        } else {
            Suit::Clubs
        }
    }

    pub fn longest_suit(&self) -> Suit {
        Suit::ALL
            .iter()
            .rev()
            .copied()
            .max_by_key(|suit| self.length(*suit))
            .unwrap_or(Suit::Spades)
    }
}

pub fn high_card_points(hand: &Hand) -> u8 {
    hand.high_card_points()
}

/// A stopper is the ace, Kx, Qxx or Jxxx in `suit`.
pub fn has_stopper(hand: &Hand, suit: Suit) -> bool {
    let length = hand.suit_length(suit);
    let holds = |rank: Rank| hand.contains(Card::new(rank, suit));
    holds(Rank::Ace)
        || (holds(Rank::King) && length >= 2)
        || (holds(Rank::Queen) && length >= 3)
        || (holds(Rank::Jack) && length >= 4)
}

/// Summary of a hand as bidding logic consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub hcp: u8,
    pub shape: Shape,
    pub balanced: bool,
    pub distribution: u8,
}

impl Evaluation {
    pub fn of(hand: &Hand) -> Self {
        let shape = Shape::of(hand);
        Self {
            hcp: hand.high_card_points(),
            shape,
            balanced: shape.is_balanced(),
            distribution: shape.distribution_points(),
        }
    }

    pub const fn total_points(&self) -> u8 {
        self.hcp + self.distribution
    }
}

#[cfg(test)]
mod tests {
    use super::{Evaluation, Shape, has_stopper};
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::suit::Suit;

    fn hand(cards: &str) -> Hand {
        Hand::with_cards(
            cards
                .split_whitespace()
                .map(|text| text.parse::<Card>().unwrap())
                .collect(),
        )
    }

    #[test]
    fn evaluates_a_balanced_notrump_opener() {
        // 18 HCP, 4-3-3-3
        let h = hand("AS KS 5S 2S AH QH 3H KD 7D 4D QC 8C 6C");
        let eval = Evaluation::of(&h);
        assert_eq!(eval.hcp, 18);
        assert!(eval.balanced);
        assert_eq!(eval.shape.pattern(), [4, 3, 3, 3]);
        assert_eq!(eval.distribution, 0);
    }

    #[test]
    fn shapes_outside_the_balanced_set() {
        let h = hand("AS KS QS JS 10S 9S AH KH QH 2D 3D 4D 5D");
        let shape = Shape::of(&h);
        assert!(!shape.is_balanced());
        assert_eq!(shape.length(Suit::Clubs), 0);
        assert_eq!(shape.distribution_points(), 3);
        assert_eq!(shape.longest_major(), Some(Suit::Spades));
        assert_eq!(shape.longest_suit(), Suit::Spades);
        assert_eq!(shape.better_minor(), Suit::Diamonds);
    }

    #[test]
    fn five_three_three_two_is_balanced() {
        let h = hand("AS KS 5S 4S 2S AH QH 3H KD 7D 4D 8C 6C");
        assert!(Shape::of(&h).is_balanced());
        let h = hand("AS KS 5S 4S 2S 9S QH 3H KD 7D 4D 8C 6C");
        assert!(!Shape::of(&h).is_balanced());
    }

    #[test]
    fn hearts_preferred_only_when_longer() {
        let h = hand("AS KS 5S 4S 2S AH QH 3H 8H 7H 4D 8C 6C");
        assert_eq!(Shape::of(&h).longest_major(), Some(Suit::Spades));
        let h = hand("AS KS 5S 4S AH QH 3H 8H 7H 4D 5D 8C 6C");
        assert_eq!(Shape::of(&h).longest_major(), Some(Suit::Hearts));
    }

    #[test]
    fn stoppers() {
        let h = hand("AS 2H KH 3D 4D QD 5C 6C 7C JC 8S 9S 10S");
        assert!(has_stopper(&h, Suit::Spades));
        assert!(has_stopper(&h, Suit::Hearts));
        assert!(has_stopper(&h, Suit::Diamonds));
        assert!(has_stopper(&h, Suit::Clubs));
        let h = hand("KS QH JH 3D 4D 5D 6D 7D 8D 9D 10D JD QD");
        assert!(!has_stopper(&h, Suit::Spades));
        assert!(!has_stopper(&h, Suit::Hearts));
        assert!(!has_stopper(&h, Suit::Clubs));
    }
}
