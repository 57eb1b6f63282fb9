use crate::config::Config;
use crate::services::{AuthClient, OrderList, ServiceCatalog, SessionAccessor, SharedStorage};

/// Shared by every handler; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub storage: SharedStorage,
    pub auth: AuthClient,
    pub config: Config,
}

impl AppState {
    pub fn new(storage: SharedStorage, config: Config) -> Self {
        let auth = AuthClient::new(config.auth.base_url.clone());
        Self { storage, auth, config }
    }

    pub fn session(&self) -> SessionAccessor {
        SessionAccessor::new(self.storage.clone())
    }

    pub fn catalog(&self) -> ServiceCatalog {
        ServiceCatalog::new(self.storage.clone())
    }

    pub fn orders(&self) -> OrderList {
        OrderList::new(self.storage.clone())
    }

    pub fn notifier(&self) -> crate::ui::ToastNotifier {
        crate::ui::ToastNotifier::new(self.config.ui.toast_dismiss_ms)
    }
}
