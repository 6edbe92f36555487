//! # dfs-inotify
//!
//! Change-notification events for a distributed file system namespace.
//!
//! [`model::Event`] is a closed set of seven mutation kinds (create, close,
//! append, rename, metadata update, unlink, truncate). Events are immutable
//! values with no identity of their own; ordering belongs to whatever
//! delivers them.
//!
//! Around the model sit the pieces a stream consumer needs:
//! - [`codec`]: one JSON record per event, with corrupt records and
//!   unrecognized kinds kept apart
//! - [`journal`]: NDJSON event logs and their segments
//! - [`handler`]: exhaustive dispatch to an [`handler::EventHandler`]
//! - [`reporter`], [`validate`], [`replay`]: consumers built on it

pub mod cli;
pub mod codec;
pub mod engine;
pub mod error;
pub mod exit_codes;
pub mod handler;
pub mod journal;
pub mod model;
pub mod perms;
pub mod replay;
pub mod reporter;
pub mod validate;

pub use codec::Decoded;
pub use error::EventError;
pub use model::{Event, EventKind};
