//! Alert rate limiting

mod gate;

pub use gate::AlertGate;
