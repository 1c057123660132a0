//! Concurrent resolution of a collection
//!
//! Each [`item::Item`] pairs a source descriptor with a package descriptor.
//! [`process::Pipeline`] builds both resolvers up front, resolves items
//! concurrently under a bounded number of slots, and returns one
//! [`item::ResolutionResult`] per item in input order.
//!
//! # Modules
//!
//! - [`item`]: Items, outcomes and per-side errors
//! - [`process`]: The bounded, cancellable pipeline

pub mod item;
pub mod process;
