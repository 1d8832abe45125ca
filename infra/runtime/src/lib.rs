//! # Runtime
//!
//! Runtime profile for the client shell, built on [Tokio](https://tokio.rs).
//!
//! The shell drives everything from a single cooperative event loop: instance
//! activation, quit requests and application state changes are all delivered on
//! the thread that owns the presentation host. Blocking work still gets its own
//! small pool, configured through [`RuntimeConfig`].
//!
//! ## Example
//!
//! ```rust,ignore
//! #[aegis_runtime::main(event_loop)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use aegis_derive::main;
pub use anyhow::Result;

use anyhow::anyhow;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// The default stack size for blocking threads (2 `MiB`).
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
/// How long an idle blocking thread stays alive.
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(30);
/// Upper bound of the blocking pool; the shell only blocks on file I/O.
const DEFAULT_MAX_BLOCKING_THREADS: usize = 8;

const DEFAULT_THREAD_NAME: &str = "aegis-event-loop";

fn validate_stack_size(stack_size: usize) -> usize {
    stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE)
}

fn normalize_config(config: &RuntimeConfig) -> RuntimeConfig {
    let thread_name = if config.thread_name.trim().is_empty() {
        DEFAULT_THREAD_NAME.to_owned()
    } else {
        config.thread_name.clone()
    };

    RuntimeConfig {
        max_blocking_threads: config.max_blocking_threads.clamp(1, 512),
        stack_size: validate_stack_size(config.stack_size),
        thread_name,
        thread_keep_alive: config.thread_keep_alive,
    }
}

/// Configuration of the event-loop runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_blocking_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::event_loop()
    }
}

impl RuntimeConfig {
    /// Single cooperative event loop on the calling thread.
    #[must_use = "Use this configuration for the shell event loop"]
    pub fn event_loop() -> Self {
        Self {
            max_blocking_threads: DEFAULT_MAX_BLOCKING_THREADS,
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }

    #[must_use = "Customize the size of the blocking pool"]
    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.clamp(1, 512);
        self
    }

    #[must_use = "Customize the stack size for blocking threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = validate_stack_size(size);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.thread_name = if name.trim().is_empty() { DEFAULT_THREAD_NAME.to_owned() } else { name };
        self
    }

    #[must_use = "Customize how long idle threads stay alive"]
    pub const fn with_thread_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.thread_keep_alive = keep_alive;
        self
    }
}

/// Creates a current-thread Tokio runtime from `config`.
///
/// All drivers (I/O, time, signal) are enabled. Out-of-range values are
/// clamped before the runtime is built.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the OS refuses to create the runtime, typically
/// because of thread or file-descriptor limits.
///
/// # Examples
///
/// ```rust,ignore
/// use aegis_runtime::{build_runtime_with_config, RuntimeConfig};
///
/// let runtime = build_runtime_with_config(&RuntimeConfig::event_loop())?;
/// runtime.block_on(async { /* drive the shell */ });
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = normalize_config(config);
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_current_thread()
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

/// Builds the shell event-loop runtime.
pub fn build_event_loop() -> Result<Runtime> {
    build_runtime_with_config(&RuntimeConfig::event_loop())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_pool_validation() {
        let config = RuntimeConfig::event_loop().with_max_blocking_threads(0);
        assert_eq!(config.max_blocking_threads, 1);

        let config = RuntimeConfig::event_loop().with_max_blocking_threads(2000);
        assert_eq!(config.max_blocking_threads, 512);
    }

    #[test]
    fn test_stack_size_validation() {
        let config = RuntimeConfig::default().with_stack_size(100);
        assert_eq!(config.stack_size, MIN_STACK_SIZE);

        let config = RuntimeConfig::default().with_stack_size(100 * 1024 * 1024);
        assert_eq!(config.stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn test_blank_thread_name_falls_back() {
        let config = RuntimeConfig::event_loop().with_thread_name("   ");
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_event_loop_runs_on_calling_thread() {
        let runtime = build_event_loop().expect("event loop runtime");
        let caller = std::thread::current().id();

        let observed = runtime.block_on(async { std::thread::current().id() });
        assert_eq!(observed, caller);
    }

    #[test]
    fn test_event_loop_has_timers_and_blocking_pool() {
        let runtime = build_event_loop().expect("event loop runtime");
        let answer = runtime.block_on(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            tokio::task::spawn_blocking(|| 42).await
        });
        assert_eq!(answer.expect("blocking task"), 42);
    }
}
