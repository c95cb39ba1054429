//! Implementation of chess moves and the board transitions they produce.

pub mod board;
pub mod core;
pub mod factory;
pub mod moves;
