use chrono::FixedOffset;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Geofence
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub geofence_radius_m: f64,

    /// Reporting timezone as minutes east of UTC (default 330 = IST).
    /// Every civil-day boundary and report timestamp uses this offset.
    pub tz_offset_minutes: i32,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".to_string()) // default 24h
                .parse()
                .unwrap(),

            office_latitude: env::var("OFFICE_LAT")
                .expect("OFFICE_LAT must be set")
                .parse()
                .expect("OFFICE_LAT must be a number"),
            office_longitude: env::var("OFFICE_LONG")
                .expect("OFFICE_LONG must be set")
                .parse()
                .expect("OFFICE_LONG must be a number"),
            geofence_radius_m: env::var("GEOFENCE_RADIUS_M")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),

            tz_offset_minutes: env::var("TZ_OFFSET_MINUTES")
                .unwrap_or_else(|_| "330".to_string()) // Asia/Kolkata
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    /// Fixed reporting-timezone offset. IST carries no DST, so a fixed
    /// offset is exact for the configured region.
    pub fn reporting_tz(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_minutes * 60).expect("TZ_OFFSET_MINUTES out of range")
    }
}
