//! Helpers shared by the unit tests.

pub mod socket_guard;
