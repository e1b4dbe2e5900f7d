//! Infrastructure adapters for the outbound ports.

pub mod clock;
pub mod local_store;
pub mod testing;

pub use clock::{SystemClock, SystemRandom};
pub use local_store::JsonFileStore;
