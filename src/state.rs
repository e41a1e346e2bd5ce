use crate::config::AppConfig;
use crate::db::{MemoryStore, PgStore, Store};
use crate::rtc::{OpenVidu, RtcProvider};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub rtc: Arc<dyn RtcProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.database_url {
            Some(url) => {
                let pg = PgStore::connect(url).await?;
                pg.migrate().await?;
                info!("postgres store ready");
                Arc::new(pg) as Arc<dyn Store>
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::dev()) as Arc<dyn Store>
            }
        };

        let rtc = Arc::new(OpenVidu::new(&config.rtc)?) as Arc<dyn RtcProvider>;

        Ok(Self { store, config, rtc })
    }
}

#[cfg(test)]
pub use fake::FakeRtc;
