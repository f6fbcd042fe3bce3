//! Types shared between the client core, storage, audio and front ends.

pub mod domain;
pub mod error;
pub mod grid;
pub mod protocol;
