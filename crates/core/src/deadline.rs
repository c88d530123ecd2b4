// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::repository::RepositoryError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// The instant by which a request must finish.
///
/// Every repository call made on behalf of a request races this deadline.
/// When it expires the call reports [`CoreError::Timeout`] and the caller
/// must not assume the call took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    /// A deadline `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Time left, zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    /// Runs a repository call bounded by this deadline.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Timeout` if the deadline passes first, or the
    /// call's own error converted to `CoreError::Repository`.
    pub async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        match tokio::time::timeout_at(self.0, call).await {
            Ok(result) => result.map_err(CoreError::from),
            Err(_) => {
                warn!(operation, "Repository call exceeded its deadline");
                Err(CoreError::Timeout { operation })
            }
        }
    }
}
