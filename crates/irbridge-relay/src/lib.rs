//! Code fan-in, command lookup and resilient delivery.
//!
//! Reader threads push codes onto a [`CodeBus`]. A single [`Dispatcher`]
//! takes them off, looks each one up in the [`CommandMap`] and hands the
//! command to a [`ResilientSender`], which keeps one lazily opened connection
//! to the media player and reconnects once when it drops.

pub mod bus;
pub mod command_map;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod sender;

pub use bus::{
    pump, spawn_source, BusClosed, CodeBus, CodeConsumer, CodeEvent, CodeProducer, SourceEnd,
    SourceKind,
};
pub use command_map::CommandMap;
pub use dispatch::{Dispatch, DispatchStats, Dispatcher};
pub use endpoint::Endpoint;
#[cfg(unix)]
pub use endpoint::UdsEndpoint;
pub use error::{RelayError, Result};
pub use sender::{ResilientSender, RetryPolicy};
