//! Time subsystem.
//!
//! Rate limiting for the live-capture edge, decoupled from any runtime so it
//! can be driven from tests with synthetic instants.

mod cadence;

pub use cadence::CaptureCadence;
