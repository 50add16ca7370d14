//! Networking for the vision board REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps the four item routes plus the health probe behind the
//! [`api::BoardBackend`] trait so sessions can run against a fake in tests.

pub mod api;
