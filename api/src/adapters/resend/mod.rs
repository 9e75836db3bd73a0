//! Resend adapter
//!
//! Delivers outgoing email through the Resend HTTP API.

mod client;

pub use client::ResendMailer;
