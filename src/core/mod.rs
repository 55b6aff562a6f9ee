//! Core modules of the structure validator.
//!
//! Everything algorithmic lives here: the component schema registry, the
//! frontmatter store, discovery and indexing, the per-file validator, the
//! repair passes, and the drift detectors.

pub mod autofix;
pub mod discover;
pub mod error;
pub mod frontmatter;
pub mod governance;
pub mod report;
pub mod revlinks;
pub mod spec;
pub mod sysdrift;
pub mod validate;
