use super::card_sort_key;
use bridge_core::model::card::Card;
use bridge_core::model::hand::Hand;
use bridge_core::model::seat::Seat;
use bridge_core::model::suit::Suit;
use bridge_core::model::trick::Trick;

/// What the planner sees when a card is due from `seat`.
#[derive(Debug, Clone, Copy)]
pub struct PlayView<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub trick: &'a Trick,
    pub trump: Option<Suit>,
    /// True when `seat` belongs to the declaring side.
    pub declaring: bool,
}

pub struct PlayPlanner;

impl PlayPlanner {
    /// Chooses one of `legal`, or `None` when nothing is legal.
    pub fn choose(view: &PlayView<'_>, legal: &[Card]) -> Option<Card> {
        if legal.is_empty() {
            return None;
        }
        if view.trick.is_empty() {
            return Some(choose_lead(view, legal));
        }
        Some(choose_follow(view, legal))
    }

    /// Lowest legal card, preferring not to waste trumps.
    pub fn lowest(legal: &[Card], trump: Option<Suit>) -> Option<Card> {
        legal
            .iter()
            .copied()
            .filter(|card| Some(card.suit) != trump)
            .min_by_key(|card| card_sort_key(*card))
            .or_else(|| legal.iter().copied().min_by_key(|card| card_sort_key(*card)))
    }
}

fn choose_lead(view: &PlayView<'_>, legal: &[Card]) -> Card {
    let mut suits: Vec<Vec<Card>> = Suit::ALL
        .iter()
        .map(|suit| {
            let mut cards: Vec<Card> = legal.iter().copied().filter(|c| c.suit == *suit).collect();
            cards.sort_by(|a, b| b.rank.cmp(&a.rank));
            cards
        })
        .filter(|cards| !cards.is_empty())
        .collect();

    // Defenders keep their trumps for ruffing.
    if !view.declaring && suits.len() > 1 {
        suits.retain(|cards| Some(cards[0].suit) != view.trump);
    }

    for cards in &suits {
        if let Some(top) = top_of_sequence(cards) {
            return top;
        }
    }

    let longest = suits
        .iter()
        .max_by_key(|cards| (cards.len(), cards[0].suit.index()))
        .cloned()
        .unwrap_or_else(|| legal.to_vec());
    if longest.len() >= 4 {
        longest[3]
    } else {
        longest[longest.len() - 1]
    }
}

/// Top card of a suit headed by two touching honours (AK, KQ, QJ).
fn top_of_sequence(cards_high_first: &[Card]) -> Option<Card> {
    let [first, second, ..] = cards_high_first else {
        return None;
    };
    let touching = first.rank.value() == second.rank.value() + 1;
    (touching && first.rank.value() >= 12).then_some(*first)
}

fn choose_follow(view: &PlayView<'_>, legal: &[Card]) -> Card {
    let lowest = PlayPlanner::lowest(legal, view.trump).unwrap_or(legal[0]);
    let Some(winning) = view.trick.winning_play(view.trump) else {
        return lowest;
    };
    if winning.seat.is_partner_of(view.seat) {
        return lowest;
    }

    legal
        .iter()
        .copied()
        .filter(|card| wins_trick(view, *card))
        .min_by_key(|card| {
            let is_trump = Some(card.suit) == view.trump;
            (is_trump, card.rank.value())
        })
        .unwrap_or(lowest)
}

fn wins_trick(view: &PlayView<'_>, card: Card) -> bool {
    let mut trial = view.trick.clone();
    trial.play(view.seat, card).is_ok()
        && trial
            .winning_play(view.trump)
            .is_some_and(|play| play.seat == view.seat)
}

#[cfg(test)]
mod tests {
    use super::{PlayPlanner, PlayView};
    use bridge_core::model::card::Card;
    use bridge_core::model::hand::Hand;
    use bridge_core::model::seat::Seat;
    use bridge_core::model::suit::Suit;
    use bridge_core::model::trick::Trick;

    fn cards(text: &str) -> Vec<Card> {
        text.split_whitespace()
            .map(|card| card.parse().unwrap())
            .collect()
    }

    fn trick(leader: Seat, played: &str) -> Trick {
        let mut trick = Trick::new(leader);
        let mut seat = leader;
        for card in cards(played) {
            trick.play(seat, card).unwrap();
            seat = seat.next();
        }
        trick
    }

    fn choose(seat: Seat, trick: &Trick, legal: &str, trump: Option<Suit>) -> Card {
        let legal = cards(legal);
        let hand = Hand::with_cards(legal.clone());
        let view = PlayView {
            seat,
            hand: &hand,
            trick,
            trump,
            declaring: false,
        };
        PlayPlanner::choose(&view, &legal).unwrap()
    }

    #[test]
    fn leads_top_of_a_sequence() {
        let empty = Trick::new(Seat::East);
        let card = choose(Seat::East, &empty, "KS QS 4S 9H 7H 6H 5H 2D", None);
        assert_eq!(card, "KS".parse().unwrap());
    }

    #[test]
    fn leads_fourth_best_from_longest_suit() {
        let empty = Trick::new(Seat::East);
        let card = choose(Seat::East, &empty, "KS 8S 4S JH 9H 7H 6H 3H 2D", None);
        assert_eq!(card, "6H".parse().unwrap());
    }

    #[test]
    fn defenders_avoid_leading_trumps() {
        let empty = Trick::new(Seat::East);
        let card = choose(Seat::East, &empty, "9S 8S 7S 6S 5S 4D 2D", Some(Suit::Spades));
        assert_eq!(card, "2D".parse().unwrap());
    }

    #[test]
    fn wins_as_cheaply_as_possible() {
        let t = trick(Seat::North, "10H");
        let card = choose(Seat::East, &t, "AH QH 2H", None);
        assert_eq!(card, "QH".parse().unwrap());
    }

    #[test]
    fn plays_low_when_partner_is_winning() {
        let t = trick(Seat::North, "AH 10H");
        let card = choose(Seat::South, &t, "KH 3H", None);
        assert_eq!(card, "3H".parse().unwrap());
    }

    #[test]
    fn ruffs_when_void_and_discards_otherwise() {
        let t = trick(Seat::North, "AD");
        let card = choose(Seat::East, &t, "5S 2S 9C 3C", Some(Suit::Spades));
        assert_eq!(card, "2S".parse().unwrap());
        let card = choose(Seat::East, &t, "5S 2S 9C 3C", None);
        assert_eq!(card, "2S".parse().unwrap());
        let card = choose(Seat::East, &t, "5H 9C 3C", Some(Suit::Spades));
        assert_eq!(card, "3C".parse().unwrap());
    }

    #[test]
    fn nothing_legal_means_no_choice() {
        let empty = Trick::new(Seat::East);
        let hand = Hand::new();
        let view = PlayView {
            seat: Seat::East,
            hand: &hand,
            trick: &empty,
            trump: None,
            declaring: true,
        };
        assert_eq!(PlayPlanner::choose(&view, &[]), None);
    }
}
