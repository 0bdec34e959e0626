#![doc(test(attr(deny(warnings))))]

//! Budget Pacer offers the stored-document model, hash-route codec, and
//! budget pacing calculations behind a single-document personal budget
//! tracker.

pub mod config;
pub mod date;
pub mod document;
pub mod errors;
pub mod pacing;
pub mod screen;
pub mod session;
pub mod storage;
pub mod time;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("budget_pacer=info".parse().unwrap());

        fmt().with_env_filter(filter).init();

        tracing::info!("Budget Pacer tracing initialized.");
    });
}
