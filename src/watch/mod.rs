// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Probing once per session whether kernel notifications are available.
//! - The native backend (`notify`, one registration per directory) and the
//!   polling backend (modification-time sweeps over the catalog).
//! - [`EventStream`], which hides both behind one pull-based sequence of
//!   changed source files.
//!
//! It does **not** compile anything; it only turns filesystem changes into
//! paths.

pub mod native;
pub mod polling;
pub mod probe;
pub mod stream;

pub use native::{NativeNotifier, WatchHandle};
pub use polling::{ModificationClock, PollingNotifier};
pub use probe::{probe, BackendKind};
pub use stream::{ChangeBackend, EventStream};
