//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request parsing and status mapping.

pub mod blob;
pub mod image;
pub mod vision_board;
