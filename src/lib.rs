//! Photo sorting core: an unsorted catalog, numbered categories, grid
//! selection and geometry, and an export that names every categorized photo
//! `{number:04}` or `{number:04}-{position:02}`.
//!
//! The desktop shell in `main.rs` drives a [`session::Session`] from its
//! update loop and hands background work owned snapshots.

pub mod archive;
pub mod catalog;
pub mod categories;
pub mod error;
pub mod export;
pub mod grid;
pub mod photo;
pub mod selection;
pub mod session;
pub mod settings;
pub mod thumbnail;
