//! Participant module - the corporations playing the game.

mod entity;

pub use entity::Participant;
