//! Domain model for the reservation availability engine.
//!
//! # Responsibility
//! - Define canonical data structures used by availability, admission and
//!   pricing logic.
//! - Keep night-range boundary semantics in one place (`DateSpan`).
//!
//! # Invariants
//! - Every reservation is identified by a stable `ReservationId`.
//! - Cancellation is a status transition, not a row delete; cancelled rows
//!   stay stored for audit and never occupy nights.

pub mod accommodation;
pub mod date_span;
pub mod reservation;
