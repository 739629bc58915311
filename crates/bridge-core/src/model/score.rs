use crate::model::bid::Strain;
use crate::model::contract::{Contract, Doubling};
use crate::model::seat::Partnership;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Vulnerability {
    #[default]
    None,
    NorthSouth,
    EastWest,
    Both,
}

impl Vulnerability {
    /// Board-number cycle used by duplicate and rubber sets alike: board 1
    /// is none vulnerable, board 2 North-South, board 3 East-West, board 4
    /// both, then the pattern shifts by one every four boards.
    pub const fn for_board(board: u32) -> Self {
        const CYCLE: [Vulnerability; 16] = [
            Vulnerability::None,
            Vulnerability::NorthSouth,
            Vulnerability::EastWest,
            Vulnerability::Both,
            Vulnerability::NorthSouth,
            Vulnerability::EastWest,
            Vulnerability::Both,
            Vulnerability::None,
            Vulnerability::EastWest,
            Vulnerability::Both,
            Vulnerability::None,
            Vulnerability::NorthSouth,
            Vulnerability::Both,
            Vulnerability::None,
            Vulnerability::NorthSouth,
            Vulnerability::EastWest,
        ];
        let index = (board.saturating_sub(1) % 16) as usize;
        CYCLE[index]
    }

    pub const fn is_vulnerable(self, side: Partnership) -> bool {
        match self {
            Vulnerability::None => false,
            Vulnerability::Both => true,
            Vulnerability::NorthSouth => matches!(side, Partnership::NorthSouth),
            Vulnerability::EastWest => matches!(side, Partnership::EastWest),
        }
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Vulnerability::None => "None",
            Vulnerability::NorthSouth => "N-S",
            Vulnerability::EastWest => "E-W",
            Vulnerability::Both => "Both",
        };
        f.write_str(label)
    }
}

/// Components of a deal's score, all from the declaring side's viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub trick_points: i32,
    pub overtrick_points: i32,
    pub game_bonus: i32,
    pub slam_bonus: i32,
    pub insult_bonus: i32,
    pub undertrick_penalty: i32,
}

impl ScoreBreakdown {
    pub const fn total(&self) -> i32 {
        self.trick_points
            + self.overtrick_points
            + self.game_bonus
            + self.slam_bonus
            + self.insult_bonus
            - self.undertrick_penalty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealScore {
    pub declaring_side: Partnership,
    /// Positive when the contract made, negative when it failed.
    pub points: i32,
    /// Overtricks when non-negative, undertricks when negative.
    pub result: i8,
    pub breakdown: ScoreBreakdown,
}

impl DealScore {
    pub const fn made(&self) -> bool {
        self.result >= 0
    }

    /// Score from `side`'s point of view.
    pub const fn for_side(&self, side: Partnership) -> i32 {
        if side.index() == self.declaring_side.index() {
            self.points
        } else {
            -self.points
        }
    }
}

/// Contract points for `tricks` bid tricks in `strain`, before doubling.
const fn base_trick_points(strain: Strain, tricks: i32) -> i32 {
    if tricks <= 0 {
        return 0;
    }
    match strain {
        Strain::Clubs | Strain::Diamonds => 20 * tricks,
        Strain::Hearts | Strain::Spades => 30 * tricks,
        Strain::NoTrump => 40 + 30 * (tricks - 1),
    }
}

const fn undoubled_overtrick_value(strain: Strain) -> i32 {
    match strain {
        Strain::Clubs | Strain::Diamonds => 20,
        Strain::Hearts | Strain::Spades | Strain::NoTrump => 30,
    }
}

/// Doubled undertrick penalty: 100/200/200/300+ non-vulnerable,
/// 200/300+ vulnerable.
const fn doubled_undertricks(undertricks: i32, vulnerable: bool) -> i32 {
    let mut total = 0;
    let mut n = 1;
    while n <= undertricks {
        total += match (vulnerable, n) {
            (false, 1) => 100,
            (false, 2 | 3) => 200,
            (false, _) => 300,
            (true, 1) => 200,
            (true, _) => 300,
        };
        n += 1;
    }
    total
}

/// Standard contract-bridge score for `contract` when the declaring side
/// takes `declarer_tricks` tricks.
pub fn score(contract: &Contract, declarer_tricks: u8, vulnerable: bool) -> DealScore {
    let level = i32::from(contract.level());
    let strain = contract.strain();
    let required = level + 6;
    let taken = i32::from(declarer_tricks.min(13));
    let mut breakdown = ScoreBreakdown::default();

    if taken >= required {
        let overtricks = taken - required;
        breakdown.trick_points = base_trick_points(strain, level) * contract.doubling.multiplier();
        breakdown.game_bonus = if breakdown.trick_points >= 100 {
            if vulnerable { 500 } else { 300 }
        } else {
            50
        };
        breakdown.slam_bonus = match (level, vulnerable) {
            (6, false) => 500,
            (6, true) => 750,
            (7, false) => 1000,
            (7, true) => 1500,
            _ => 0,
        };
        breakdown.insult_bonus = match contract.doubling {
            Doubling::Undoubled => 0,
            Doubling::Doubled => 50,
            Doubling::Redoubled => 100,
        };
        let per_overtrick = match contract.doubling {
            Doubling::Undoubled => undoubled_overtrick_value(strain),
            Doubling::Doubled => {
                if vulnerable {
                    200
                } else {
                    100
                }
            }
            Doubling::Redoubled => {
                if vulnerable {
                    400
                } else {
                    200
                }
            }
        };
        breakdown.overtrick_points = overtricks * per_overtrick;
        DealScore {
            declaring_side: contract.declaring_side(),
            points: breakdown.total(),
            result: overtricks as i8,
            breakdown,
        }
    } else {
        let undertricks = required - taken;
        breakdown.undertrick_penalty = match contract.doubling {
            Doubling::Undoubled => undertricks * if vulnerable { 100 } else { 50 },
            Doubling::Doubled => doubled_undertricks(undertricks, vulnerable),
            Doubling::Redoubled => 2 * doubled_undertricks(undertricks, vulnerable),
        };
        DealScore {
            declaring_side: contract.declaring_side(),
            points: breakdown.total(),
            result: -(undertricks as i8),
            breakdown,
        }
    }
}

/// Running per-partnership totals across the deals of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [i64; 2],
    deals: u32,
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            totals: [0; 2],
            deals: 0,
        }
    }

    /// Credits a scored deal to whichever side earned the points.
    pub fn record(&mut self, deal: &DealScore) {
        let side = if deal.points >= 0 {
            deal.declaring_side
        } else {
            deal.declaring_side.opponents()
        };
        self.totals[side.index()] += i64::from(deal.points.abs());
        self.deals += 1;
    }

    /// Passed-out deals count as played but score nothing.
    pub fn record_passed_out(&mut self) {
        self.deals += 1;
    }

    pub fn total(&self, side: Partnership) -> i64 {
        self.totals[side.index()]
    }

    pub fn deals(&self) -> u32 {
        self.deals
    }

    pub fn leader(&self) -> Option<Partnership> {
        let [ns, ew] = self.totals;
        match ns.cmp(&ew) {
            core::cmp::Ordering::Greater => Some(Partnership::NorthSouth),
            core::cmp::Ordering::Less => Some(Partnership::EastWest),
            core::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScoreBoard, Vulnerability, score};
    use crate::model::bid::{Bid, Strain};
    use crate::model::contract::{Contract, Doubling};
    use crate::model::seat::{Partnership, Seat};

    fn contract(level: u8, strain: Strain, doubling: Doubling) -> Contract {
        Contract::new(Seat::South, Bid::new(level, strain).unwrap(), doubling)
    }

    #[test]
    fn four_spades_doubled_just_made() {
        let c = contract(4, Strain::Spades, Doubling::Doubled);
        assert_eq!(score(&c, 10, false).points, 590);
        assert_eq!(score(&c, 10, true).points, 790);
    }

    #[test]
    fn published_table_samples() {
        let cases = [
            // (level, strain, doubling, tricks, vulnerable, expected)
            (1, Strain::NoTrump, Doubling::Undoubled, 7, false, 90),
            (3, Strain::NoTrump, Doubling::Undoubled, 9, false, 400),
            (3, Strain::NoTrump, Doubling::Undoubled, 10, true, 630),
            (2, Strain::Hearts, Doubling::Undoubled, 9, false, 140),
            (4, Strain::Hearts, Doubling::Undoubled, 10, true, 620),
            (5, Strain::Clubs, Doubling::Undoubled, 11, false, 400),
            (2, Strain::Diamonds, Doubling::Doubled, 8, false, 180),
            (2, Strain::Spades, Doubling::Doubled, 9, true, 870),
            (1, Strain::NoTrump, Doubling::Redoubled, 7, false, 560),
            (6, Strain::Spades, Doubling::Undoubled, 12, false, 980),
            (6, Strain::NoTrump, Doubling::Undoubled, 12, true, 1440),
            (7, Strain::NoTrump, Doubling::Undoubled, 13, false, 1520),
            (7, Strain::Clubs, Doubling::Undoubled, 13, true, 2140),
            (3, Strain::Clubs, Doubling::Undoubled, 8, false, -50),
            (4, Strain::Spades, Doubling::Undoubled, 7, true, -300),
            (3, Strain::NoTrump, Doubling::Doubled, 6, false, -500),
            (3, Strain::NoTrump, Doubling::Doubled, 5, false, -800),
            (4, Strain::Hearts, Doubling::Doubled, 7, true, -800),
            (4, Strain::Hearts, Doubling::Redoubled, 8, false, -600),
            (7, Strain::NoTrump, Doubling::Redoubled, 13, true, 2980),
        ];
        for (level, strain, doubling, tricks, vulnerable, expected) in cases {
            let c = contract(level, strain, doubling);
            assert_eq!(
                score(&c, tricks, vulnerable).points,
                expected,
                "{c} taking {tricks}, vulnerable={vulnerable}"
            );
        }
    }

    #[test]
    fn breakdown_separates_components() {
        let c = contract(4, Strain::Spades, Doubling::Doubled);
        let result = score(&c, 11, false);
        assert_eq!(result.breakdown.trick_points, 240);
        assert_eq!(result.breakdown.game_bonus, 300);
        assert_eq!(result.breakdown.insult_bonus, 50);
        assert_eq!(result.breakdown.overtrick_points, 100);
        assert_eq!(result.result, 1);
        assert!(result.made());
    }

    #[test]
    fn failed_contract_counts_for_defenders() {
        let c = contract(3, Strain::NoTrump, Doubling::Undoubled);
        let result = score(&c, 7, true);
        assert_eq!(result.points, -200);
        assert_eq!(result.result, -2);
        assert_eq!(result.for_side(Partnership::EastWest), 200);
        assert_eq!(result.for_side(Partnership::NorthSouth), -200);
    }

    #[test]
    fn vulnerability_lookup() {
        assert!(!Vulnerability::None.is_vulnerable(Partnership::NorthSouth));
        assert!(Vulnerability::Both.is_vulnerable(Partnership::EastWest));
        assert!(Vulnerability::NorthSouth.is_vulnerable(Partnership::NorthSouth));
        assert!(!Vulnerability::NorthSouth.is_vulnerable(Partnership::EastWest));
        assert_eq!(Vulnerability::for_board(1), Vulnerability::None);
        assert_eq!(Vulnerability::for_board(4), Vulnerability::Both);
        assert_eq!(Vulnerability::for_board(5), Vulnerability::NorthSouth);
        assert_eq!(Vulnerability::for_board(17), Vulnerability::None);
    }

    #[test]
    fn scoreboard_accumulates_by_side() {
        let mut board = ScoreBoard::new();
        board.record(&score(&contract(4, Strain::Hearts, Doubling::Undoubled), 10, false));
        board.record(&score(&contract(3, Strain::NoTrump, Doubling::Undoubled), 8, false));
        board.record_passed_out();
        assert_eq!(board.total(Partnership::NorthSouth), 420);
        assert_eq!(board.total(Partnership::EastWest), 50);
        assert_eq!(board.deals(), 3);
        assert_eq!(board.leader(), Some(Partnership::NorthSouth));
    }
}
