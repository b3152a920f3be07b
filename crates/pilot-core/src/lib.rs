//! Configuration lifecycle for pilot runs
//!
//! Ties the option schema from `pilot-meta` to a run: the [`ConfigContext`]
//! state machine applies defaults, configuration files and overrides, anchors
//! path values to the working area and persists a [`Snapshot`] when the run
//! freezes. [`SettingsProxy`] offers the same late-bound field access for
//! typed settings blocks.

pub mod context;
pub mod error;
pub mod identity;
pub mod logging;
pub mod proxy;
pub mod snapshot;

pub use context::{
    ConfigContext, ConfigurationState, ConfigureRequest, ContextOptions, Provenance,
};
pub use error::{Error, LifecycleError, ProxyError, ReadinessError, Result};
pub use identity::RunIdentity;
pub use logging::{
    LogRecord, LogSink, MemorySink, SinkFactory, TracingSink, Verbosity, tracing_sink_factory,
};
pub use proxy::{MainSettings, Settings, SettingsProxy};
pub use snapshot::{Snapshot, SnapshotReceipt};
