//!
//! Authentication of federated server-to-server requests
//!
//! Incoming inbox deliveries carry a cavage HTTP signature. This crate
//! turns a raw request head and body into either a trusted actor URI or
//! a rejection, without leaking to the peer which check failed.
//!

#[macro_use]
extern crate tracing;

pub mod canonicalize;
pub mod pipeline;
pub mod resolver;

pub use self::canonicalize::{Canonicalize, JsonCanonicalizer};
pub use self::pipeline::{AuthPipeline, Outcome, RejectionReason};
pub use self::resolver::{ActorKey, HttpActorResolver, ResolveActor, ResolveError};
