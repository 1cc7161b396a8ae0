//! Clip Splicer - Disc Specification Importer
//!
//! Turns a hierarchical JSON specification of a multi-disc audio production
//! (discs → tracks → ordered component tokens) into a linear timeline of
//! placed media segments inside a host editing environment, tracking which
//! referenced source files exist.
//!
//! # Architecture
//!
//! The placement core is host-agnostic:
//! - [`component`]: token grammar (pause / repeat / performed clip)
//! - [`engine`]: document-order walk, cursor threading, item placement
//! - [`registry`], [`availability`], [`report`]: run-scoped bookkeeping
//!
//! Host services sit behind the traits in [`host`]; [`session`] provides the
//! in-memory implementation used by the CLI and the test suite.

pub mod availability;
pub mod cli;
pub mod component;
pub mod engine;
pub mod error;
pub mod host;
pub mod registry;
pub mod report;
pub mod session;
pub mod spec;

pub use error::{Result, SplicerError};
