//! Fire Circle protocol state: rounds, the participant roster, and the
//! convergence policy that decides when deliberation may halt early.

pub mod convergence;
pub mod result;
pub mod roster;
pub mod round;
