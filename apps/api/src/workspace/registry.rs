use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::state::{BuilderState, DashboardState};

#[derive(Debug, Clone, Default)]
struct UserUi {
    builder: BuilderState,
    dashboard: DashboardState,
}

/// Per-user UI state, held in memory only. A restart is the server-side "page reload".
#[derive(Debug, Default)]
pub struct UiStateRegistry {
    users: RwLock<HashMap<Uuid, UserUi>>,
}

impl UiStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn builder(&self, user_id: Uuid) -> BuilderState {
        self.users
            .read()
            .await
            .get(&user_id)
            .map(|ui| ui.builder.clone())
            .unwrap_or_default()
    }

    pub async fn dashboard(&self, user_id: Uuid) -> DashboardState {
        self.users
            .read()
            .await
            .get(&user_id)
            .map(|ui| ui.dashboard.clone())
            .unwrap_or_default()
    }

    /// Runs `f` against the user's builder state and returns the result.
    pub async fn update_builder(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut BuilderState),
    ) -> BuilderState {
        let mut users = self.users.write().await;
        let ui = users.entry(user_id).or_default();
        f(&mut ui.builder);
        ui.builder.clone()
    }

    pub async fn update_dashboard(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut DashboardState),
    ) -> DashboardState {
        let mut users = self.users.write().await;
        let ui = users.entry(user_id).or_default();
        f(&mut ui.dashboard);
        ui.dashboard.clone()
    }

    /// Records a completed save.
    pub async fn mark_saved(&self, user_id: Uuid, at: DateTime<Utc>) {
        self.update_builder(user_id, |b| {
            b.set_is_saving(false);
            b.set_last_saved_at(Some(at));
        })
        .await;
    }
}
