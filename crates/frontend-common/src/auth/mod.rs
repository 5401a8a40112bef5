//! Per-navigation authorization gate

mod gate;

pub use gate::{visible_view, AuthGate, AuthGateProps, GateDecision, GateView};
