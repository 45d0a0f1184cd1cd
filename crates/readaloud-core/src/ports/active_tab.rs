//! Active tab provider port.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::TabId;

/// Answers which tab the user is currently looking at.
#[async_trait]
pub trait ActiveTabPort: Send + Sync {
    async fn current_active_tab_id(&self) -> Option<TabId>;
}

/// For contexts without tabs (command line, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActiveTab;

#[async_trait]
impl ActiveTabPort for NoActiveTab {
    async fn current_active_tab_id(&self) -> Option<TabId> {
        None
    }
}

/// An active tab that is set explicitly by the adapter.
#[derive(Debug, Default)]
pub struct ManualActiveTab {
    current: Mutex<Option<TabId>>,
}

impl ManualActiveTab {
    pub const fn new(tab: Option<TabId>) -> Self {
        Self {
            current: Mutex::new(tab),
        }
    }

    pub fn set(&self, tab: Option<TabId>) {
        *self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = tab;
    }
}

#[async_trait]
impl ActiveTabPort for ManualActiveTab {
    async fn current_active_tab_id(&self) -> Option<TabId> {
        *self
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
