//! # Session Gate
//!
//! Navigation guards for the console. Four variants share one algorithm and
//! differ only in the flag they short-circuit on and where they redirect.
//!
//! ## Flow
//!
//! 1. [`SessionGate::can_activate`] answers from session state alone. If the
//!    relevant flag is already set it returns [`Activation::Allow`];
//!    otherwise it records the attempted URL, starts a new navigation
//!    generation and returns [`Activation::Pending`].
//! 2. [`SessionGate::resolve`] exchanges credentials, loads the current
//!    user, writes it into the session and returns a [`GateDecision`].
//! 3. Callers that simply want the answer use [`SessionGate::authorize`].
//!
//! Decisions carry a [`Notice`](crate::views::Notice) instead of showing
//! anything; rendering is the frontend's job.
//!
//! ## Failure handling
//!
//! - HTTP 401 while loading the identity clears the stored token and
//!   redirects to login.
//! - Any other failure is logged and yields [`GateDecision::Stay`].
//! - A resolution overtaken by a newer navigation yields
//!   [`GateDecision::Superseded`] and leaves the session untouched.

mod session_gate;
mod types;

pub use session_gate::SessionGate;
pub use types::{Activation, GateDecision, GateVariant, NavigationAttempt};
