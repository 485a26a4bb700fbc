use std::sync::Arc;

use scrape_logging::scrape_warn;

use crate::driver::{DriverError, PageDriver};

/// Scoped ownership of one browser session.
///
/// Guarantees the driver is closed exactly once on every exit path: the
/// explicit async [`DriverSession::close`] is preferred, and `Drop` spawns a
/// background close for error and cancellation paths that never reach it.
/// `PageDriver::close` is idempotent, so the two paths cannot double-free.
pub struct DriverSession {
    driver: Option<Arc<dyn PageDriver>>,
    runtime_handle: tokio::runtime::Handle,
}

impl DriverSession {
    /// Takes ownership of a driver. Must be called from within a tokio
    /// runtime, which is captured for the `Drop` cleanup path.
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver: Some(driver),
            runtime_handle: tokio::runtime::Handle::current(),
        }
    }

    /// The held driver. `close` consumes the session, so the handle is
    /// always present here.
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver
            .as_deref()
            .expect("driver session already closed")
    }

    /// Release the browser session, consuming the guard.
    pub async fn close(mut self) -> Result<(), DriverError> {
        match self.driver.take() {
            Some(driver) => driver.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for DriverSession {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            self.runtime_handle.spawn(async move {
                if let Err(err) = driver.close().await {
                    scrape_warn!("browser session cleanup failed: {err}");
                }
            });
        }
    }
}
