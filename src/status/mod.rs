//! Per-provider delivery-status normalization
//!
//! Each provider reports delivery state in its own code space. Every module
//! here exposes a total `from_code` lookup -- unrecognized codes collapse to
//! that provider's `Unknown` member, never an error -- plus a human-readable
//! `title`. Twilio is the one vendor with string codes, so it additionally
//! carries a stable numeric mapping used for persistence.

pub mod amootsms;
pub mod farazsms;
pub mod smsir;
pub mod twilio;
