pub mod auction;
pub mod bid;
pub mod card;
pub mod contract;
pub mod deck;
pub mod hand;
pub mod phase;
pub mod play;
pub mod rank;
pub mod score;
pub mod seat;
pub mod suit;
pub mod trick;
