// File: ./src/model/mod.rs
pub mod adapter;
pub mod event;
pub mod roster;

pub use event::{RawEvent, RawStart, TransformedEvent};
pub use roster::{Category, Roster, RosterEntry};
