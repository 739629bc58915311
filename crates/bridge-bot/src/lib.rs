pub mod actor;
pub mod bot;
pub mod policy;
pub mod table;

pub use actor::{SeatActor, SeatKind, SeatingPlan};
pub use bot::{BidContext, BidDecision, BidPlanner, BotDifficulty, PlayPlanner, PlayView};
pub use policy::{Policy, PolicyContext, RuleBasedPolicy, ScriptedInput};
pub use table::{DealSummary, Step, Table, TableError};
