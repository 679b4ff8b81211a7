//! Step definitions for auto-close behaviour scenarios.

pub mod world;

mod given;
mod when;
mod then;
