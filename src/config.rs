use serde::Deserialize;
use time::UtcOffset;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// Connection settings for the OpenVidu session provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RtcConfig {
    pub base_url: String,
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub rtc: RtcConfig,
    /// Offset used to decide what "today" is for D-day labels.
    pub utc_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cookbank".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cookbank-users".into()),
        };
        let rtc = RtcConfig {
            base_url: std::env::var("OPENVIDU_URL")
                .unwrap_or_else(|_| "http://localhost:4443".into()),
            secret: std::env::var("OPENVIDU_SECRET").unwrap_or_else(|_| "MY_SECRET".into()),
        };
        let offset_hours = std::env::var("APP_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(9);
        let utc_offset = UtcOffset::from_hms(offset_hours, 0, 0)?;
        Ok(Self {
            database_url,
            jwt,
            rtc,
            utc_offset,
        })
    }

    /// Calendar date at the configured offset.
    pub fn today(&self) -> time::Date {
        time::OffsetDateTime::now_utc().to_offset(self.utc_offset).date()
    }
}
