//! Readable, writable and observable values behind one contract.
//!
//! A [`Property`] exposes up to three capabilities: reading, writing and observing a value.
//! How the value is backed (a device, a remote API, plain memory) is up to whoever builds
//! the property; callers only ever see the contract. Properties can be re-typed or
//! re-scaled with [`Property::map`] and any [`Mapper`](common::Mapper).
//!
//! Every operation takes an optional [`CancellationToken`]. An operation started with an
//! already cancelled token fails with [`Error::Cancelled`] without doing anything, and one
//! that gets cancelled while suspended stops promptly.

use core::{fmt, future::Future};
use std::sync::Arc;

pub use knob_common as common;
use knob_common::{ConfigError, KnobString, MapError};
pub use tokio_util::sync::CancellationToken;

pub mod action;
pub mod debounce;
pub mod entity;
pub mod log;
pub mod observer;
pub mod property;

pub use self::{
    action::Action,
    debounce::debounce,
    entity::{ActionMap, Entity, EntityBuilder, EventMap, NamedMap, PropertyMap},
    observer::{Event, Observer},
    property::{Property, apply_mapper},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("property is not {0}")]
    Unsupported(Capability),
    #[error("operation was cancelled")]
    Cancelled,
    #[error("mapping error: {0}")]
    Map(#[from] MapError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
    #[error("duplicate {kind} key: {key}")]
    DuplicateKey { kind: &'static str, key: KnobString },
}

impl Error {
    /// Wraps a failure of whatever backs a property or action.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Backend(Arc::from(error.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Write,
    Observe,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Read => "readable",
            Capability::Write => "writable",
            Capability::Observe => "observable",
        })
    }
}

/// Runs `fut` unless `signal` is, or becomes, cancelled first.
pub(crate) async fn cancellable<T>(
    signal: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    if signal.is_cancelled() {
        return Err(Error::Cancelled);
    }

    tokio::select! {
        biased;
        () = signal.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}
