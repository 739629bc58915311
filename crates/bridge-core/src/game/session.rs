use crate::error::{EngineError, Invariant};
use crate::game::event::{DealId, EventObserver, GameEvent};
use crate::model::auction::{Auction, AuctionEntry, AuctionResult};
use crate::model::bid::Call;
use crate::model::card::Card;
use crate::model::contract::Contract;
use crate::model::deck::{Deck, validate_hands};
use crate::model::hand::Hand;
pub use crate::model::phase::Phase;
use crate::model::play::{PlayOutcome, PlayState, TRICKS_PER_DEAL, TrickTally};
use crate::model::score::{self, DealScore, ScoreBoard, Vulnerability};
use crate::model::seat::Seat;
use crate::model::trick::Trick;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{Level, event};

/// Read-only picture of the session handed to drivers and seat actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateView {
    Idle,
    Auction {
        deal_id: DealId,
        dealer: Seat,
        vulnerability: Vulnerability,
        to_act: Seat,
        calls: Vec<AuctionEntry>,
        legal_calls: Vec<Call>,
    },
    Play {
        deal_id: DealId,
        vulnerability: Vulnerability,
        contract: Contract,
        to_act: Seat,
        /// Seat that chooses the card: declarer when dummy is to play.
        controller: Seat,
        /// Dummy's remaining cards once the opening lead is on the table.
        dummy: Option<Hand>,
        current_trick: Trick,
        tally: TrickTally,
        legal_cards: Vec<Card>,
    },
    Complete {
        deal_id: DealId,
        result: AuctionResult,
        score: Option<DealScore>,
    },
}

impl StateView {
    pub fn phase(&self) -> Phase {
        match self {
            StateView::Idle => Phase::Idle,
            StateView::Auction { .. } => Phase::Auction,
            StateView::Play { .. } => Phase::Play,
            StateView::Complete { .. } => Phase::Complete,
        }
    }

    pub fn seat_to_act(&self) -> Option<Seat> {
        match self {
            StateView::Auction { to_act, .. } | StateView::Play { to_act, .. } => Some(*to_act),
            StateView::Idle | StateView::Complete { .. } => None,
        }
    }

    pub fn legal_calls(&self) -> &[Call] {
        match self {
            StateView::Auction { legal_calls, .. } => legal_calls,
            _ => &[],
        }
    }

    pub fn legal_cards(&self) -> &[Card] {
        match self {
            StateView::Play { legal_cards, .. } => legal_cards,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct CurrentDeal {
    id: DealId,
    dealer: Seat,
    vulnerability: Vulnerability,
    hands: [Hand; 4],
    auction: Auction,
    play: Option<PlayState>,
    score: Option<DealScore>,
}

impl CurrentDeal {
    fn phase(&self) -> Phase {
        match (self.auction.result(), &self.play) {
            (None, _) => Phase::Auction,
            (Some(AuctionResult::Contract(_)), Some(play)) if !play.is_complete() => Phase::Play,
            _ => Phase::Complete,
        }
    }

    fn is_mid_trick(&self) -> bool {
        self.play
            .as_ref()
            .is_some_and(|play| !play.is_complete() && !play.current_trick().is_empty())
    }
}

/// Drives deals from shuffle to score and records every step in an ordered
/// event log that [`GameSession::replay`] can re-drive.
pub struct GameSession {
    seed: u64,
    rng: StdRng,
    next_id: DealId,
    deal: Option<CurrentDeal>,
    events: Vec<GameEvent>,
    observers: Vec<Box<dyn EventObserver>>,
    scores: ScoreBoard,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("seed", &self.seed)
            .field("next_id", &self.next_id)
            .field("deal", &self.deal)
            .field("events", &self.events.len())
            .field("observers", &self.observers.len())
            .field("scores", &self.scores)
            .finish()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            next_id: DealId(1),
            deal: None,
            events: Vec::new(),
            observers: Vec::new(),
            scores: ScoreBoard::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: EventObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn phase(&self) -> Phase {
        self.deal.as_ref().map_or(Phase::Idle, CurrentDeal::phase)
    }

    pub fn deal_id(&self) -> Option<DealId> {
        self.deal.as_ref().map(|deal| deal.id)
    }

    pub fn dealer(&self) -> Option<Seat> {
        self.deal.as_ref().map(|deal| deal.dealer)
    }

    pub fn vulnerability(&self) -> Option<Vulnerability> {
        self.deal.as_ref().map(|deal| deal.vulnerability)
    }

    pub fn auction(&self) -> Option<&Auction> {
        self.deal.as_ref().map(|deal| &deal.auction)
    }

    pub fn play_state(&self) -> Option<&PlayState> {
        self.deal.as_ref().and_then(|deal| deal.play.as_ref())
    }

    pub fn contract(&self) -> Option<Contract> {
        self.play_state().map(|play| *play.contract())
    }

    /// Score of the current deal once its last trick is won.
    pub fn deal_score(&self) -> Option<DealScore> {
        self.deal.as_ref().and_then(|deal| deal.score)
    }

    /// Cards `seat` was dealt for the current deal.
    pub fn dealt_hand(&self, seat: Seat) -> Option<&Hand> {
        self.deal.as_ref().map(|deal| &deal.hands[seat.index()])
    }

    /// Cards `seat` still holds.
    pub fn hand(&self, seat: Seat) -> Option<&Hand> {
        match self.play_state() {
            Some(play) => Some(play.hand(seat)),
            None => self.dealt_hand(seat),
        }
    }

    /// Seat whose decision is awaited, if any. During play this is the seat
    /// whose card is due, which may be dummy.
    pub fn seat_to_act(&self) -> Option<Seat> {
        let deal = self.deal.as_ref()?;
        match deal.phase() {
            Phase::Auction => deal.auction.next_seat(),
            Phase::Play => deal.play.as_ref().and_then(PlayState::next_seat),
            Phase::Idle | Phase::Complete => None,
        }
    }

    /// Shuffles a fresh pack from the session RNG and opens the auction.
    pub fn new_deal(
        &mut self,
        dealer: Seat,
        vulnerability: Vulnerability,
    ) -> Result<DealId, EngineError> {
        self.ensure_can_start_deal()?;
        let hands = Deck::shuffled(&mut self.rng).deal()?;
        self.start_deal(self.next_id, dealer, vulnerability, hands, true)
    }

    /// Opens a deal with prearranged hands, indexed by [`Seat::index`].
    pub fn deal_hands(
        &mut self,
        dealer: Seat,
        vulnerability: Vulnerability,
        hands: [Hand; 4],
    ) -> Result<DealId, EngineError> {
        self.ensure_can_start_deal()?;
        self.start_deal(self.next_id, dealer, vulnerability, hands, false)
    }

    pub fn submit_bid(
        &mut self,
        seat: Seat,
        call: Call,
    ) -> Result<Option<AuctionResult>, EngineError> {
        let phase = self.phase();
        let Some(deal) = self.deal.as_mut().filter(|_| phase == Phase::Auction) else {
            return Err(EngineError::WrongPhase {
                operation: "submit a bid",
                phase,
            });
        };

        let closed = deal.auction.submit(seat, call)?;
        let mut pending = vec![GameEvent::BidMade { seat, call }];
        if let Some(result) = closed {
            pending.push(GameEvent::AuctionClosed { result });
            match result {
                AuctionResult::Contract(contract) => {
                    deal.play = Some(PlayState::new(deal.hands.clone(), contract)?);
                }
                AuctionResult::PassedOut => self.scores.record_passed_out(),
            }
        }

        for event in pending {
            self.emit(event);
        }
        Ok(closed)
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, EngineError> {
        let phase = self.phase();
        let Some(deal) = self.deal.as_mut().filter(|_| phase == Phase::Play) else {
            return Err(EngineError::WrongPhase {
                operation: "play a card",
                phase,
            });
        };
        let Some(play) = deal.play.as_mut() else {
            return Err(EngineError::WrongPhase {
                operation: "play a card",
                phase,
            });
        };

        let outcome = play.play_card(seat, card)?;
        let mut pending = vec![GameEvent::CardPlayed { seat, card }];
        match outcome {
            PlayOutcome::Played { .. } => {}
            PlayOutcome::TrickComplete {
                winner,
                trick_number,
            } => pending.push(GameEvent::TrickWon {
                winner,
                trick_number,
                tally: play.tally(),
            }),
            PlayOutcome::DealComplete { winner, tally } => {
                pending.push(GameEvent::TrickWon {
                    winner,
                    trick_number: TRICKS_PER_DEAL as u8,
                    tally,
                });
                let contract = *play.contract();
                let vulnerable = deal
                    .vulnerability
                    .is_vulnerable(contract.declaring_side());
                let result = score::score(&contract, play.declarer_tricks(), vulnerable);
                deal.score = Some(result);
                self.scores.record(&result);

                event!(
                    target: "bridge_core::session",
                    Level::DEBUG,
                    deal = deal.id.get(),
                    contract = %contract,
                    tricks = play.declarer_tricks(),
                    points = result.points,
                    "deal scored"
                );
                pending.push(GameEvent::DealScored { score: result });
            }
        }

        for event in pending {
            self.emit(event);
        }
        Ok(outcome)
    }

    pub fn current_state(&self) -> StateView {
        let Some(deal) = self.deal.as_ref() else {
            return StateView::Idle;
        };
        match (deal.auction.next_seat(), deal.play.as_ref()) {
            (Some(to_act), _) => StateView::Auction {
                deal_id: deal.id,
                dealer: deal.dealer,
                vulnerability: deal.vulnerability,
                to_act,
                calls: deal.auction.calls().to_vec(),
                legal_calls: deal.auction.legal_calls(),
            },
            (None, Some(play)) if !play.is_complete() => {
                let to_act = play.next_seat().unwrap_or(play.contract().opening_leader());
                StateView::Play {
                    deal_id: deal.id,
                    vulnerability: deal.vulnerability,
                    contract: *play.contract(),
                    to_act,
                    controller: play.controller(to_act),
                    dummy: play
                        .is_dummy_visible()
                        .then(|| play.hand(play.dummy()).clone()),
                    current_trick: play.current_trick().clone(),
                    tally: play.tally(),
                    legal_cards: play.legal_cards(to_act),
                }
            }
            _ => StateView::Complete {
                deal_id: deal.id,
                result: deal.auction.result().unwrap_or(AuctionResult::PassedOut),
                score: deal.score,
            },
        }
    }

    /// Rebuilds a session by re-driving the decisions recorded in `events`.
    /// Every derived entry (auction close, trick winners, scores) must match
    /// what the engine recomputes. The rebuilt session is seeded with 0, so
    /// later shuffles differ from the recorded session's.
    pub fn replay(events: &[GameEvent]) -> Result<GameSession, EngineError> {
        Self::replay_from(GameSession::with_seed(0), false, events)
    }

    /// Like [`GameSession::replay`], but shuffled deals are drawn again from
    /// `seed` and must reproduce the recorded hands. The rebuilt session's RNG
    /// then sits where the recorded one stopped, so it keeps dealing the same
    /// boards.
    pub fn replay_with_seed(seed: u64, events: &[GameEvent]) -> Result<GameSession, EngineError> {
        Self::replay_from(GameSession::with_seed(seed), true, events)
    }

    fn replay_from(
        mut session: GameSession,
        reshuffle: bool,
        events: &[GameEvent],
    ) -> Result<GameSession, EngineError> {
        for (index, event) in events.iter().enumerate() {
            if !event.is_input() {
                match session.events.get(index) {
                    Some(derived) if derived == event => continue,
                    Some(derived) => {
                        return Err(diverged(
                            index,
                            format!("log records {event:?} but the engine derived {derived:?}"),
                        ));
                    }
                    None => {
                        return Err(diverged(
                            index,
                            format!("log records {} the engine did not derive", event.kind()),
                        ));
                    }
                }
            }

            if session.events.len() != index {
                let missing = session.events[index].kind();
                return Err(diverged(
                    index,
                    format!("log is missing a {missing} entry before {}", event.kind()),
                ));
            }
            if let GameEvent::Dealt { deal_id, .. } = event
                && *deal_id != session.next_id
            {
                return Err(diverged(
                    index,
                    format!("expected {} but the log holds {deal_id}", session.next_id),
                ));
            }
            session
                .apply_input(event, reshuffle)
                .map_err(|err| diverged(index, err.to_string()))?;
            if let Some(dealt) = session.events.get(index)
                && dealt != event
            {
                return Err(diverged(
                    index,
                    format!("the seed deals {dealt:?} where the log holds {event:?}"),
                ));
            }
        }

        if let Some(extra) = session.events.get(events.len()) {
            return Err(diverged(
                events.len(),
                format!("log ends before the derived {} entry", extra.kind()),
            ));
        }
        Ok(session)
    }

    fn apply_input(&mut self, event: &GameEvent, reshuffle: bool) -> Result<(), EngineError> {
        match event {
            GameEvent::Dealt {
                dealer,
                vulnerability,
                shuffled: true,
                ..
            } if reshuffle => {
                self.new_deal(*dealer, *vulnerability)?;
            }
            GameEvent::Dealt {
                dealer,
                vulnerability,
                hands,
                shuffled,
                ..
            } => {
                self.ensure_can_start_deal()?;
                self.start_deal(self.next_id, *dealer, *vulnerability, hands.clone(), *shuffled)?;
            }
            GameEvent::BidMade { seat, call } => {
                self.submit_bid(*seat, *call)?;
            }
            GameEvent::CardPlayed { seat, card } => {
                self.play_card(*seat, *card)?;
            }
            GameEvent::AuctionClosed { .. }
            | GameEvent::TrickWon { .. }
            | GameEvent::DealScored { .. } => {}
        }
        Ok(())
    }

    fn ensure_can_start_deal(&self) -> Result<(), EngineError> {
        match self.deal.as_ref() {
            Some(deal) if deal.is_mid_trick() => Err(EngineError::WrongPhase {
                operation: "start a new deal",
                phase: Phase::Play,
            }),
            _ => Ok(()),
        }
    }

    fn start_deal(
        &mut self,
        id: DealId,
        dealer: Seat,
        vulnerability: Vulnerability,
        hands: [Hand; 4],
        shuffled: bool,
    ) -> Result<DealId, EngineError> {
        validate_hands(&hands)?;
        if let Some(abandoned) = self.deal.as_ref().filter(|deal| deal.phase() != Phase::Complete) {
            event!(
                target: "bridge_core::session",
                Level::WARN,
                deal = abandoned.id.get(),
                phase = %abandoned.phase(),
                "abandoning unfinished deal"
            );
        }

        self.deal = Some(CurrentDeal {
            id,
            dealer,
            vulnerability,
            hands: hands.clone(),
            auction: Auction::new(dealer),
            play: None,
            score: None,
        });
        self.next_id = id.next();

        event!(
            target: "bridge_core::session",
            Level::DEBUG,
            deal = id.get(),
            dealer = %dealer,
            vulnerability = %vulnerability,
            "deal started"
        );
        self.emit(GameEvent::Dealt {
            deal_id: id,
            dealer,
            vulnerability,
            hands,
            shuffled,
        });
        Ok(id)
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        self.events.push(event);
    }
}

fn diverged(index: usize, detail: String) -> EngineError {
    Invariant::ReplayDiverged { index, detail }.into()
}

#[cfg(test)]
mod tests {
    use super::{GameSession, Phase, StateView};
    use crate::error::{EngineError, Invariant};
    use crate::game::event::{DealId, GameEvent};
    use crate::model::auction::AuctionResult;
    use crate::model::bid::Call;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::score::Vulnerability;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn call(text: &str) -> Call {
        text.parse().unwrap()
    }

    /// N spades, E hearts, S diamonds, W clubs.
    fn suited_hands() -> [Hand; 4] {
        [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs].map(|suit| {
            Hand::with_cards(
                Deck::standard()
                    .cards()
                    .iter()
                    .copied()
                    .filter(|card| card.suit == suit)
                    .collect(),
            )
        })
    }

    /// North declares 1NT; East leads hearts, and every trick is won by the
    /// seat on lead since nobody can follow.
    fn play_out(session: &mut GameSession) {
        while let Some(seat) = session.seat_to_act() {
            let state = session.current_state();
            let card = state.legal_cards()[0];
            session.play_card(seat, card).unwrap();
        }
    }

    fn bid_one_notrump_by_north(session: &mut GameSession) {
        session.submit_bid(Seat::North, call("1NT")).unwrap();
        session.submit_bid(Seat::East, call("P")).unwrap();
        session.submit_bid(Seat::South, call("P")).unwrap();
        let closed = session.submit_bid(Seat::West, call("P")).unwrap();
        assert!(matches!(closed, Some(AuctionResult::Contract(_))));
    }

    #[test]
    fn fresh_session_is_idle() {
        let session = GameSession::with_seed(3);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.current_state(), StateView::Idle);
        assert!(session.events().is_empty());
    }

    #[test]
    fn bidding_before_a_deal_is_a_phase_error() {
        let mut session = GameSession::with_seed(3);
        let err = session.submit_bid(Seat::North, Call::Pass).unwrap_err();
        assert_eq!(
            err,
            EngineError::WrongPhase {
                operation: "submit a bid",
                phase: Phase::Idle
            }
        );
    }

    #[test]
    fn new_deal_emits_dealt_and_opens_auction() {
        let mut session = GameSession::with_seed(11);
        let id = session.new_deal(Seat::East, Vulnerability::Both).unwrap();
        assert_eq!(id, DealId(1));
        assert_eq!(session.phase(), Phase::Auction);
        assert_eq!(session.seat_to_act(), Some(Seat::East));
        assert!(matches!(
            session.events(),
            [GameEvent::Dealt { dealer: Seat::East, .. }]
        ));
        let state = session.current_state();
        assert_eq!(state.legal_calls().len(), 36);
    }

    #[test]
    fn same_seed_deals_same_cards() {
        let mut a = GameSession::with_seed(77);
        let mut b = GameSession::with_seed(77);
        a.new_deal(Seat::North, Vulnerability::None).unwrap();
        b.new_deal(Seat::North, Vulnerability::None).unwrap();
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn rejected_moves_leave_the_log_untouched() {
        let mut session = GameSession::with_seed(5);
        session.new_deal(Seat::North, Vulnerability::None).unwrap();
        let before = session.events().len();
        let err = session.submit_bid(Seat::South, Call::Pass).unwrap_err();
        assert!(matches!(err, EngineError::OutOfTurn { .. }));
        let err = session.submit_bid(Seat::North, Call::Double).unwrap_err();
        assert!(matches!(err, EngineError::IllegalBid { .. }));
        assert_eq!(session.events().len(), before);
        assert_eq!(session.seat_to_act(), Some(Seat::North));
    }

    #[test]
    fn passed_out_deal_completes_without_score() {
        let mut session = GameSession::with_seed(9);
        session.new_deal(Seat::West, Vulnerability::None).unwrap();
        for seat in [Seat::West, Seat::North, Seat::East] {
            assert_eq!(session.submit_bid(seat, Call::Pass).unwrap(), None);
        }
        let closed = session.submit_bid(Seat::South, Call::Pass).unwrap();
        assert_eq!(closed, Some(AuctionResult::PassedOut));
        assert_eq!(session.phase(), Phase::Complete);
        assert!(matches!(
            session.current_state(),
            StateView::Complete {
                result: AuctionResult::PassedOut,
                score: None,
                ..
            }
        ));
        assert_eq!(session.scores().deals(), 1);
        let err = session.play_card(Seat::North, "AS".parse().unwrap()).unwrap_err();
        assert_eq!(
            err,
            EngineError::WrongPhase {
                operation: "play a card",
                phase: Phase::Complete
            }
        );
    }

    #[test]
    fn full_deal_scores_and_logs_every_step() {
        let mut session = GameSession::with_seed(1);
        session
            .deal_hands(Seat::North, Vulnerability::None, suited_hands())
            .unwrap();
        bid_one_notrump_by_north(&mut session);
        assert_eq!(session.phase(), Phase::Play);
        assert_eq!(session.seat_to_act(), Some(Seat::East));

        play_out(&mut session);
        assert_eq!(session.phase(), Phase::Complete);

        // East leads hearts and keeps the lead for all thirteen tricks.
        let score = session.deal_score().unwrap();
        assert_eq!(score.result, -7);
        assert_eq!(score.points, -350);
        assert_eq!(session.scores().total(crate::model::seat::Partnership::EastWest), 350);

        let events = session.events();
        let count = |kind: &str| events.iter().filter(|e| e.kind() == kind).count();
        assert_eq!(count("dealt"), 1);
        assert_eq!(count("bid_made"), 4);
        assert_eq!(count("auction_closed"), 1);
        assert_eq!(count("card_played"), 52);
        assert_eq!(count("trick_won"), 13);
        assert_eq!(count("deal_scored"), 1);
        assert!(matches!(events.last(), Some(GameEvent::DealScored { .. })));
    }

    #[test]
    fn dummy_is_exposed_after_the_opening_lead() {
        let mut session = GameSession::with_seed(1);
        session
            .deal_hands(Seat::North, Vulnerability::None, suited_hands())
            .unwrap();
        bid_one_notrump_by_north(&mut session);
        let StateView::Play { dummy, controller, .. } = session.current_state() else {
            panic!("expected play state");
        };
        assert!(dummy.is_none());
        assert_eq!(controller, Seat::East);

        session.play_card(Seat::East, "2H".parse().unwrap()).unwrap();
        let StateView::Play {
            dummy,
            to_act,
            controller,
            ..
        } = session.current_state()
        else {
            panic!("expected play state");
        };
        assert_eq!(dummy.map(|hand| hand.len()), Some(13));
        assert_eq!(to_act, Seat::South);
        assert_eq!(controller, Seat::North);
    }

    #[test]
    fn cannot_abandon_a_deal_mid_trick() {
        let mut session = GameSession::with_seed(1);
        session
            .deal_hands(Seat::North, Vulnerability::None, suited_hands())
            .unwrap();
        bid_one_notrump_by_north(&mut session);
        session.play_card(Seat::East, "2H".parse().unwrap()).unwrap();
        let err = session.new_deal(Seat::East, Vulnerability::None).unwrap_err();
        assert_eq!(
            err,
            EngineError::WrongPhase {
                operation: "start a new deal",
                phase: Phase::Play
            }
        );
    }

    #[test]
    fn observers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = GameSession::with_seed(21);
        session.subscribe(move |event: &GameEvent| sink.borrow_mut().push(event.kind()));
        session.new_deal(Seat::North, Vulnerability::None).unwrap();
        for seat in Seat::North.rotation() {
            session.submit_bid(seat, Call::Pass).unwrap();
        }
        assert_eq!(
            *seen.borrow(),
            vec![
                "dealt",
                "bid_made",
                "bid_made",
                "bid_made",
                "bid_made",
                "auction_closed"
            ]
        );
    }

    #[test]
    fn replay_reproduces_the_session() {
        let mut session = GameSession::with_seed(1);
        session
            .deal_hands(Seat::North, Vulnerability::NorthSouth, suited_hands())
            .unwrap();
        bid_one_notrump_by_north(&mut session);
        play_out(&mut session);

        let replayed = GameSession::replay(session.events()).unwrap();
        assert_eq!(replayed.events(), session.events());
        assert_eq!(replayed.deal_score(), session.deal_score());
        assert_eq!(replayed.scores(), session.scores());
    }

    #[test]
    fn replay_rejects_tampered_trick_winner() {
        let mut session = GameSession::with_seed(1);
        session
            .deal_hands(Seat::North, Vulnerability::None, suited_hands())
            .unwrap();
        bid_one_notrump_by_north(&mut session);
        play_out(&mut session);

        let mut log = session.events().to_vec();
        let (index, tampered) = log
            .iter_mut()
            .enumerate()
            .find_map(|(index, event)| match event {
                GameEvent::TrickWon { winner, .. } => Some((index, winner)),
                _ => None,
            })
            .unwrap();
        *tampered = Seat::South;

        let err = GameSession::replay(&log).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvariantViolation(Invariant::ReplayDiverged { index: i, .. })
                if i == index
        ));
    }

    #[test]
    fn replay_rejects_log_missing_derived_entries() {
        let mut session = GameSession::with_seed(4);
        session.new_deal(Seat::North, Vulnerability::None).unwrap();
        for seat in Seat::North.rotation() {
            session.submit_bid(seat, Call::Pass).unwrap();
        }
        let mut log = session.events().to_vec();
        log.pop();
        let err = GameSession::replay(&log).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvariantViolation(Invariant::ReplayDiverged { index: 5, .. })
        ));
    }

    #[test]
    fn seeded_replay_skips_the_rng_for_preset_deals() {
        let mut session = GameSession::with_seed(31);
        session
            .deal_hands(Seat::North, Vulnerability::None, suited_hands())
            .unwrap();
        session.new_deal(Seat::East, Vulnerability::Both).unwrap();

        let mut restored = GameSession::replay_with_seed(31, session.events()).unwrap();
        assert_eq!(restored.seed(), 31);
        assert_eq!(restored.events(), session.events());
        assert!(matches!(
            restored.events()[0],
            GameEvent::Dealt { shuffled: false, .. }
        ));

        session.new_deal(Seat::South, Vulnerability::None).unwrap();
        restored.new_deal(Seat::South, Vulnerability::None).unwrap();
        assert_eq!(restored.dealt_hand(Seat::South), session.dealt_hand(Seat::South));
    }

    #[test]
    fn unseeded_replay_accepts_any_recorded_shuffle() {
        let mut session = GameSession::with_seed(77);
        session.new_deal(Seat::North, Vulnerability::None).unwrap();
        let restored = GameSession::replay(session.events()).unwrap();
        assert_eq!(restored.seed(), 0);
        assert_eq!(restored.events(), session.events());
    }
}
