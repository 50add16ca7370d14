//! Native client for the vision board REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` speaks HTTP to the server; `state` holds the optimistic board session
//! that drives the `canvas` engine and writes changes back when a gesture,
//! edit, or upload settles.

pub mod net;
pub mod state;
