//! Version model and resolution layer
//!
//! This module provides the EVR version model and the resolvers that find the
//! latest upstream version of a project and the version a distribution ships.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Sources   │────▶│     EVR     │◀────│  Packages   │
//! │ (upstream)  │     │  (compare)  │     │(downstream) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │                   │
//!        ▼                   ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │     │   Checker   │     │  Repodata   │
//! │   (HTTP)    │     │  (status)   │     │ (yum/dnf)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`evr`]: Epoch:version-release parsing, comparison and latest selection
//! - [`checker`]: Packaged versus upstream status
//! - [`descriptor`]: Declarative source and package descriptors
//! - [`fetch`]: Fetcher trait and the HTTP implementation
//! - [`source`]: Source resolver trait
//! - [`sources`]: Concrete sources (generic, PyPI, GitHub, Bitbucket, yum)
//! - [`package`]: Package resolver trait
//! - [`packages`]: Concrete packages (AUR, Arch, yum)
//! - [`repodata`]: Yum/dnf repository metadata reader
//! - [`error`]: Resolution error type

pub mod checker;
pub mod descriptor;
pub mod error;
pub mod evr;
pub mod fetch;
pub mod package;
pub mod packages;
pub mod repodata;
pub mod source;
pub mod sources;
