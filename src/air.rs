//! Air Command Logic
//!
//! Building air commands from device codes and sending them over the
//! transmitter line.

pub mod assembler;
pub mod transmit;
