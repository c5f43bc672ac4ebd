//! Screen teardown handling.

use super::{ScreenError, ScreenResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cancellation scope shared by a screen and whoever tears it down.
///
/// Clones observe the same state. Once closed, pending work is abandoned and
/// new work is refused with [`ScreenError::Closed`].
#[derive(Debug, Clone, Default)]
pub struct ScreenLifetime {
    token: CancellationToken,
}

impl ScreenLifetime {
    /// Creates an open lifetime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the lifetime, abandoning pending work.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the lifetime is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `work` unless the lifetime closes first.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Closed`] when the lifetime is or becomes closed
    /// before `work` finishes, otherwise the work's own error.
    pub async fn run<T, E>(&self, work: impl Future<Output = Result<T, E>>) -> ScreenResult<T>
    where
        E: Into<ScreenError>,
    {
        if self.is_closed() {
            return Err(ScreenError::Closed);
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ScreenError::Closed),
            output = work => output.map_err(Into::into),
        }
    }
}
