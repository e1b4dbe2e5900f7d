//! Port traits (hexagonal boundaries) for the client.

pub mod outbound;
