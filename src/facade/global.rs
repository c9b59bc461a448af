//! # Process-wide default dispatcher.
//!
//! A single [`Dispatcher<Payload>`] shared by the whole process, for code that
//! wants ambient `listen` / `announce` / `signal` without passing a handle around.
//!
//! ## Contract
//! - Constructed **at most once**: explicitly with [`init`], or lazily with the
//!   default config on first use of any function in this module.
//! - Never replaced and never shut down by this module; it lives until the process exits.
//! - Runs on its own dedicated runtime thread (`tagbus-default`), so it keeps
//!   working across `#[tokio::main]` / `#[tokio::test]` runtimes that come and go.
//! - Fully isolated from every `Dispatcher::new` instance.
//!
//! Prefer explicit instances (and the [`Notifier`](crate::Notifier) trait) in
//! library code; the default exists for convenience at the application edge.
//!
//! ## Example
//! ```rust
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut hello = tagbus::listen("example.hello").await;
//!     tagbus::signal("example.hello").await;
//!     assert_eq!(hello.recv().await.unwrap().tag(), "example.hello");
//! }
//! ```

use std::sync::{Mutex, OnceLock, PoisonError};

use tokio::runtime::{Builder, Runtime};

use crate::core::{Dispatcher, DispatcherConfig};
use crate::error::DispatchError;
use crate::events::{Event, Payload, Subscription};

static DEFAULT: OnceLock<Dispatcher<Payload>> = OnceLock::new();
static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static INIT: Mutex<()> = Mutex::new(());

/// Constructs the default dispatcher with `cfg`.
///
/// Call it early (e.g. at the top of `main`) to customize the default; without
/// it, first use initializes with [`DispatcherConfig::default`].
///
/// # Errors
/// - [`DispatchError::AlreadyInitialized`] if the default already exists
///   (explicitly or through an earlier lazy use)
/// - [`DispatchError::Runtime`] if the dedicated runtime thread cannot start
pub fn init(cfg: DispatcherConfig) -> Result<&'static Dispatcher<Payload>, DispatchError> {
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if DEFAULT.get().is_some() {
        return Err(DispatchError::AlreadyInitialized);
    }
    start(cfg)
}

/// Returns the default dispatcher, initializing it if needed.
///
/// # Errors
/// [`DispatchError::Runtime`] if lazy initialization cannot start the runtime thread.
pub fn try_default() -> Result<&'static Dispatcher<Payload>, DispatchError> {
    if let Some(d) = DEFAULT.get() {
        return Ok(d);
    }
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    match DEFAULT.get() {
        Some(d) => Ok(d),
        None => start(DispatcherConfig::default()),
    }
}

/// Returns the default dispatcher, initializing it if needed.
///
/// # Panics
/// Panics if the dedicated runtime thread cannot be started, like `std::thread::spawn`.
/// Use [`try_default`] to handle that case.
pub fn default_dispatcher() -> &'static Dispatcher<Payload> {
    match try_default() {
        Ok(d) => d,
        Err(e) => panic!("tagbus: cannot start the default dispatcher: {e}"),
    }
}

/// Must be called with `INIT` held and `DEFAULT` empty.
fn start(cfg: DispatcherConfig) -> Result<&'static Dispatcher<Payload>, DispatchError> {
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("tagbus-default")
        .build()?;

    let dispatcher = Dispatcher::spawn_on(cfg, runtime.handle());
    let _ = RUNTIME.set(runtime);

    tracing::debug!(target: "tagbus", "default dispatcher initialized");
    Ok(DEFAULT.get_or_init(|| dispatcher))
}

/// Registers interest in default-dispatcher events whose tag starts with `prefix`.
///
/// To stop listening, close or drop the returned subscription.
pub async fn listen(prefix: &str) -> Subscription<Payload> {
    default_dispatcher().subscribe(prefix).await
}

/// Announces `event` on the default dispatcher.
pub async fn announce(event: Event<Payload>) {
    default_dispatcher().announce(event).await;
}

/// Announces a tag-only event on the default dispatcher.
pub async fn signal(tag: &str) {
    default_dispatcher().signal(tag).await;
}
