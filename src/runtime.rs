//! Process-wide runtime: logging and the worker pool
//!
//! A [`Runtime`] is created once at the top of a driver and dropped before
//! the process exits. Work that should run on the configured pool goes
//! through [`Runtime::install`]; parallel SpMV kernels pick the pool up from
//! there.

use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::RuntimeError;

/// Settings for [`Runtime::initialize`]
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Worker threads, defaults to the number of logical CPUs
    pub threads: usize,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            log_level: "info".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// Scoped runtime guard
pub struct Runtime {
    pool: rayon::ThreadPool,
}

impl Runtime {
    /// Installs the log subscriber (once per process) and builds the pool
    pub fn initialize(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        init_logging(&config.log_level)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("sparsetune-{}", i))
            .build()?;

        info!(threads = pool.current_num_threads(), "runtime initialized");
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `op` inside the worker pool
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        debug!(threads = self.pool.current_num_threads(), "runtime finalized");
    }
}

fn init_logging(level: &str) -> Result<(), RuntimeError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| RuntimeError::LogFilter(e.to_string()))?,
    };

    // Fails only when another subscriber won the race, which then stays active
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
    Ok(())
}
