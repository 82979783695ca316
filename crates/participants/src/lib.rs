//! Participants domain module (supply-chain actors identified by role).
//!
//! Pure domain types only (no IO, no HTTP, no storage). The registry owns the
//! collection; this crate defines what one record looks like and how it is
//! projected to callers.

pub mod participant;

pub use participant::{Participant, ParticipantView, Role};
