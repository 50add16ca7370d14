//! Interaction model for the vision board.
//!
//! Nothing in this crate touches the network or a UI toolkit. It owns the
//! board's local state and turns pointer and editor input into board
//! mutations, returning [`engine::Action`]s for the host session to persist.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: drag, resize, editor, and bulk style |
//! | [`doc`] | Board item types, sparse patches, z-order counter, item store |
//! | [`editor`] | Caption/style drafts and bulk caption styles |
//! | [`color`] | Structured RGB/RGBA colors and the CSS forms they persist as |
//! | [`upload`] | Image validation, data-URL encoding, new-item placement |
//! | [`geom`] | Points, rectangles, and board bounds |
//! | [`input`] | Mouse buttons and the gesture state machine |
//! | [`hit`] | Hit-testing items and their control affordances |
//! | [`consts`] | Shared sizes and default styles |

pub mod color;
pub mod consts;
pub mod doc;
pub mod editor;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod upload;
