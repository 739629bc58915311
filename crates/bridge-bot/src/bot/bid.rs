use super::{BidContext, BotDifficulty, call, cheapest_bid};
use bridge_core::eval::has_stopper;
use bridge_core::model::bid::{Bid, Call, Strain};
use bridge_core::model::suit::Suit;

/// A chosen call and the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidDecision {
    pub call: Call,
    pub reason: &'static str,
}

impl BidDecision {
    const fn new(call: Call, reason: &'static str) -> Self {
        Self { call, reason }
    }

    const fn pass(reason: &'static str) -> Self {
        Self::new(Call::Pass, reason)
    }

    fn bid(level: u8, strain: Strain, reason: &'static str) -> Option<Self> {
        call(level, strain).map(|call| Self::new(call, reason))
    }
}

/// Natural five-card-major bidding: openings, responses, opener's rebid and
/// simple competition.
pub struct BidPlanner;

impl BidPlanner {
    /// Picks a call from `legal`. Anything the rules suggest that is not in
    /// `legal` degrades to a pass.
    pub fn choose(ctx: &BidContext<'_>, legal: &[Call]) -> BidDecision {
        let decision = Self::candidate(ctx);
        if legal.contains(&decision.call) {
            decision
        } else {
            BidDecision::pass("candidate not legal")
        }
    }

    fn candidate(ctx: &BidContext<'_>) -> BidDecision {
        let opener = ctx.opener();
        let Some(opener) = opener else {
            return opening(ctx);
        };
        if ctx.difficulty == BotDifficulty::Easy {
            return BidDecision::pass("easy bots only open");
        }

        let opponents_bid = ctx.opponent_bid().is_some();
        if opener == ctx.seat {
            if opponents_bid {
                return BidDecision::pass("opener stays quiet over interference");
            }
            return opener_rebid(ctx);
        }
        if opener == ctx.seat.partner() && !opponents_bid {
            if ctx.has_bid() {
                return BidDecision::pass("responder already described the hand");
            }
            return response(ctx);
        }
        competitive(ctx)
    }
}

fn opening(ctx: &BidContext<'_>) -> BidDecision {
    let hcp = ctx.eval.hcp;
    let shape = ctx.eval.shape;
    let balanced = ctx.eval.balanced;

    if hcp < 12 {
        return BidDecision::pass("fewer than 12 HCP");
    }
    if balanced && (15..=17).contains(&hcp) {
        return BidDecision::bid(1, Strain::NoTrump, "balanced 15-17")
            .unwrap_or(BidDecision::pass("no bid"));
    }
    if balanced && (20..=21).contains(&hcp) {
        return BidDecision::bid(2, Strain::NoTrump, "balanced 20-21")
            .unwrap_or(BidDecision::pass("no bid"));
    }
    if shape.length(Suit::Spades) >= 5 {
        return BidDecision::bid(1, Strain::Spades, "five-card spade suit")
            .unwrap_or(BidDecision::pass("no bid"));
    }
    if shape.length(Suit::Hearts) >= 5 {
        return BidDecision::bid(1, Strain::Hearts, "five-card heart suit")
            .unwrap_or(BidDecision::pass("no bid"));
    }
    let minor = shape.better_minor();
    BidDecision::bid(1, Strain::from(minor), "better minor").unwrap_or(BidDecision::pass("no bid"))
}

fn response(ctx: &BidContext<'_>) -> BidDecision {
    let hcp = ctx.eval.hcp;
    let shape = ctx.eval.shape;
    let balanced = ctx.eval.balanced;
    let Some(partner) = ctx.first_bid_by(ctx.seat.partner()) else {
        return BidDecision::pass("partner has not bid");
    };

    let longest = shape.length(shape.longest_suit());
    if hcp < 6 && longest < 6 {
        return BidDecision::pass("weak hand");
    }

    let pick = |level: u8, strain: Strain, reason: &'static str| {
        BidDecision::bid(level, strain, reason).unwrap_or(BidDecision::pass("no bid"))
    };

    match (partner.level, partner.strain) {
        (1, Strain::NoTrump) => {
            if hcp >= 8 && balanced {
                return if hcp <= 9 {
                    pick(2, Strain::NoTrump, "invitational over 1NT")
                } else {
                    pick(3, Strain::NoTrump, "game values over 1NT")
                };
            }
            if hcp >= 8 {
                if let Some(major) = shape.longest_major() {
                    return pick(2, Strain::from(major), "five-card major over 1NT");
                }
            }
            BidDecision::pass("nothing to show over 1NT")
        }
        (2, Strain::NoTrump) => {
            if hcp >= 4 {
                pick(3, Strain::NoTrump, "game over 2NT")
            } else {
                BidDecision::pass("too weak over 2NT")
            }
        }
        (1, strain) => respond_to_suit(ctx, strain, hcp, balanced),
        _ => BidDecision::pass("no agreed response"),
    }
}

fn respond_to_suit(ctx: &BidContext<'_>, opened: Strain, hcp: u8, balanced: bool) -> BidDecision {
    let shape = ctx.eval.shape;
    let pick = |level: u8, strain: Strain, reason: &'static str| {
        BidDecision::bid(level, strain, reason).unwrap_or(BidDecision::pass("no bid"))
    };

    if opened.is_minor() && hcp >= 6 {
        if shape.length(Suit::Hearts) >= 4 {
            return pick(1, Strain::Hearts, "four hearts at the one level");
        }
        if shape.length(Suit::Spades) >= 4 {
            return pick(1, Strain::Spades, "four spades at the one level");
        }
    }
    if opened == Strain::Hearts && hcp >= 6 && shape.length(Suit::Spades) >= 4 {
        if shape.length(Suit::Hearts) < 3 {
            return pick(1, Strain::Spades, "four spades at the one level");
        }
    }

    if let Some(suit) = opened.trump() {
        let support = shape.length(suit);
        if opened.is_major() && support >= 3 {
            match hcp {
                6..=10 => return pick(2, opened, "simple raise"),
                11..=12 => return pick(3, opened, "invitational raise"),
                13.. => return pick(4, opened, "game raise"),
                _ => {}
            }
        }
        if opened.is_minor() && support >= 5 && hcp >= 10 {
            return pick(3, opened, "strong minor raise");
        }
    }

    if balanced {
        match hcp {
            6..=10 => return pick(1, Strain::NoTrump, "balanced 6-10"),
            11..=12 => return pick(2, Strain::NoTrump, "balanced 11-12"),
            13..=15 => return pick(3, Strain::NoTrump, "balanced 13-15"),
            _ => {}
        }
    }

    if hcp >= 10 {
        let current = Bid::new(1, opened);
        for suit in [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs] {
            let strain = Strain::from(suit);
            if strain == opened || shape.length(suit) < 4 {
                continue;
            }
            if let Some(bid) = cheapest_bid(strain, current) {
                if bid.level <= 2 {
                    return BidDecision::new(Call::Bid(bid), "new suit");
                }
            }
        }
    }
    BidDecision::pass("no suitable response")
}

fn opener_rebid(ctx: &BidContext<'_>) -> BidDecision {
    let (Some(opening), Some(partner)) = (
        ctx.first_bid_by(ctx.seat),
        ctx.last_bid_by(ctx.seat.partner()),
    ) else {
        return BidDecision::pass("partner passed");
    };
    if ctx.last_bid_by(ctx.seat) != Some(opening) {
        return BidDecision::pass("opener already rebid");
    }

    let hcp = ctx.eval.hcp;
    let points = ctx.eval.total_points();
    let shape = ctx.eval.shape;
    let pick = |level: u8, strain: Strain, reason: &'static str| {
        BidDecision::bid(level, strain, reason).unwrap_or(BidDecision::pass("no bid"))
    };

    if partner.strain == opening.strain && opening.strain.is_major() {
        return match (partner.level, points) {
            (2, 19..) => pick(4, opening.strain, "game after a simple raise"),
            (2, 16..=18) => pick(3, opening.strain, "invite after a simple raise"),
            (3, 14..) => pick(4, opening.strain, "accept the invitation"),
            _ => BidDecision::pass("minimum opener"),
        };
    }

    if partner.strain == Strain::NoTrump {
        return match (partner.level, hcp) {
            (1, 18..) => pick(3, Strain::NoTrump, "game opposite 6-10"),
            (2, 14..) => pick(3, Strain::NoTrump, "accept the invitation"),
            _ => BidDecision::pass("settle in notrump"),
        };
    }

    if partner.level >= 3 || opening.strain == Strain::NoTrump {
        return BidDecision::pass("partner placed the contract");
    }

    if let Some(suit) = partner.strain.trump() {
        if shape.length(suit) >= 4 {
            if let Some(bid) = cheapest_bid(partner.strain, Some(partner)) {
                return BidDecision::new(Call::Bid(bid), "raise partner's suit");
            }
        }
    }
    if let Some(suit) = opening.strain.trump() {
        if shape.length(suit) >= 6 {
            if let Some(bid) = cheapest_bid(opening.strain, Some(partner)) {
                return BidDecision::new(Call::Bid(bid), "rebid a six-card suit");
            }
        }
    }
    if ctx.eval.balanced && partner.level == 1 {
        return pick(1, Strain::NoTrump, "balanced minimum");
    }
    if let Some(bid) = cheapest_bid(opening.strain, Some(partner)) {
        if bid.level <= 2 {
            return BidDecision::new(Call::Bid(bid), "rebid the opening suit");
        }
    }
    BidDecision::pass("no convenient rebid")
}

fn competitive(ctx: &BidContext<'_>) -> BidDecision {
    let hcp = ctx.eval.hcp;
    let shape = ctx.eval.shape;
    let Some(opponent) = ctx.opponent_bid() else {
        return BidDecision::pass("uncontested");
    };
    let current = ctx.last_bid().map(|(_, bid)| bid);

    if !ctx.has_bid() && ctx.partner_bid().is_none() {
        if hcp >= 13 {
            let short = opponent
                .strain
                .trump()
                .is_some_and(|suit| shape.length(suit) <= 2);
            if short {
                return BidDecision::new(Call::Double, "takeout double");
            }
        }
        if (8..=16).contains(&hcp) && opponent.level == 1 {
            for suit in [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs] {
                if shape.length(suit) < 5 || Strain::from(suit) == opponent.strain {
                    continue;
                }
                if let Some(bid) = cheapest_bid(Strain::from(suit), current) {
                    if bid.level <= 2 {
                        return BidDecision::new(Call::Bid(bid), "five-card overcall");
                    }
                }
            }
        }
        if (15..=18).contains(&hcp)
            && opponent.level == 1
            && ctx.eval.balanced
            && opponent
                .strain
                .trump()
                .is_some_and(|suit| has_stopper(ctx.hand, suit))
        {
            return BidDecision::bid(1, Strain::NoTrump, "notrump overcall")
                .unwrap_or(BidDecision::pass("no bid"));
        }
        return BidDecision::pass("no action over the opponents");
    }

    if let Some(partner) = ctx.partner_bid()
        && !ctx.has_bid()
        && let Some(suit) = partner.strain.trump()
        && shape.length(suit) >= 3
        && (6..=10).contains(&hcp)
        && let Some(bid) = cheapest_bid(partner.strain, current)
        && bid.level <= partner.level + 1
    {
        return BidDecision::new(Call::Bid(bid), "competitive raise");
    }
    BidDecision::pass("no suitable competitive bid")
}
