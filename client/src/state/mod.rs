//! Client-side session state.

pub mod board;
