//! Engine use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the three exposed operations: availability
//!   calendar, price quote, booking admission.
//! - Keep the HTTP layer decoupled from storage details.

pub mod availability_service;
pub mod booking_service;
pub mod quote_service;
