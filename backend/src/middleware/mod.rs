//! Request middleware.
//!
//! Currently only request tracing; session handling is provided by
//! `actix-session` and configured in the server module.

pub mod trace;

pub use trace::Trace;
