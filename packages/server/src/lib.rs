//! Parlor chat server library.
//!
//! A line-based TCP chat server that groups users into named rooms, fans
//! messages out to room members and moves files over dedicated transfer
//! connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
