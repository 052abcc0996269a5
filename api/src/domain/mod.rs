//! Domain layer
//!
//! Producers and the farms, harvests and crops they own, with the invariants
//! that hold regardless of storage.
//! - `entities`: the producer aggregate and its validation rules
//! - `ports`: the repository trait adapters implement

pub mod entities;
pub mod ports;
