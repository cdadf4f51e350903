use crate::config::AppConfig;
use crate::coordinator::Coordinator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: AppConfig) -> Self {
        let coordinator = Arc::new(Coordinator::new(&config));
        Self::from_parts(Arc::new(config), coordinator)
    }

    pub fn from_parts(config: Arc<AppConfig>, coordinator: Arc<Coordinator>) -> Self {
        Self {
            config,
            coordinator,
        }
    }

    #[cfg(test)]
    pub fn fake_in(dir: &std::path::Path) -> Self {
        Self::from_config(AppConfig::with_data_dir(dir))
    }
}
