//! Read-only alert listings.

use std::sync::Arc;

use beacon_core::date_range::DateRangeQuery;
use beacon_core::error::CoreError;
use beacon_core::types::DbId;
use beacon_db::models::alert::{ActiveAlert, CompletedAlert};
use beacon_db::AlertStore;

use crate::error::LifecycleError;

pub struct AlertQueries {
    alerts: Arc<dyn AlertStore>,
}

impl AlertQueries {
    pub fn new(alerts: Arc<dyn AlertStore>) -> Self {
        Self { alerts }
    }

    /// Every active alert, oldest first.
    pub async fn list_active(&self) -> Result<Vec<ActiveAlert>, LifecycleError> {
        Ok(self.alerts.list_active().await?)
    }

    /// A user's alerts created inside the requested calendar range.
    ///
    /// An empty result is reported as [`CoreError::NothingFound`].
    pub async fn list_by_user(
        &self,
        user_id: DbId,
        filter: &DateRangeQuery,
    ) -> Result<Vec<ActiveAlert>, LifecycleError> {
        let range = filter.to_range()?;
        let alerts = self.alerts.list_by_user(user_id, range).await?;
        if alerts.is_empty() {
            return Err(
                CoreError::NothingFound(format!("No alerts found for user {user_id}")).into(),
            );
        }
        Ok(alerts)
    }

    /// Completed alerts whose completion time falls inside the range.
    pub async fn list_completed(
        &self,
        filter: &DateRangeQuery,
    ) -> Result<Vec<CompletedAlert>, LifecycleError> {
        let range = filter.to_range()?;
        Ok(self.alerts.list_completed(range).await?)
    }
}
