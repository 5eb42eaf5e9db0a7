use std::sync::Arc;

use langrec_dal::LanguageStore;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct AppState<S> {
    state: Arc<AppStateInner<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<S: LanguageStore> AppState<S> {
    pub fn new(store: S, app_config: AppConfig) -> Self {
        AppState {
            state: Arc::new(AppStateInner { store, app_config }),
        }
    }

    pub fn store(&self) -> &S {
        &self.state.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }
}

struct AppStateInner<S> {
    store: S,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
