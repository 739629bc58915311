pub mod event;
pub mod serialization;
pub mod session;
