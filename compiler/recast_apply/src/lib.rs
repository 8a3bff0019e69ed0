//! recast apply - writing fixes back to source files
//!
//! A [`Diff`] is everything a run wants changed in one file: the edits of
//! every accepted fix plus the import lines they need. The [`DiffApplier`]
//! reads each file through a [`FileSource`], applies its diff and writes the
//! result through a [`FileDestination`], running files in parallel on a
//! bounded thread pool.
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup, then enable with
//! `RUST_LOG=recast_apply=info` (progress) or `RUST_LOG=recast_patterns=debug`
//! (why candidate matches were rejected).

mod applier;
mod diff;
mod error;
mod files;

pub use applier::{ApplierConfig, ApplyReport, DiffApplier};
pub use diff::Diff;
pub use error::ApplyError;
pub use files::{FileDestination, FileSource, FsFiles, MemoryFiles, SourceFile};

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Variable consulted before `RUST_LOG` for the log filter.
pub const LOG_ENV: &str = "RECAST_LOG";

static SUBSCRIBER: Once = Once::new();

/// Install a stderr subscriber filtered by `RECAST_LOG`, or `RUST_LOG` when
/// that is unset. Without either variable nothing is installed.
///
/// Only the first call has any effect.
pub fn init_tracing() {
    SUBSCRIBER.call_once(|| {
        let Some(filter) = [LOG_ENV, EnvFilter::DEFAULT_ENV]
            .into_iter()
            .find_map(|var| EnvFilter::try_from_env(var).ok())
        else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}
