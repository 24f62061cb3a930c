//! Transports for the reward server

pub mod stdio;
