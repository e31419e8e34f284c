use std::env;

use chrono_tz::Tz;
use tracing::warn;

/// Fallback civil timezone for the clinic when CLINIC_TIMEZONE is unset.
pub const DEFAULT_CLINIC_TIMEZONE: &str = "Europe/Bucharest";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub clinic_timezone: Tz,
    pub schedule: ScheduleConfig,
}

/// Parameters of the daily slot grid. Slots run at `slot_minutes` intervals
/// within each hour from `open_hour` (inclusive) to `close_hour` (exclusive).
#[derive(Debug, Clone, Copy)]
pub struct ScheduleConfig {
    pub open_hour: u32,
    pub close_hour: u32,
    pub slot_minutes: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 20,
            slot_minutes: 60,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL").unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY").unwrap_or_else(|_| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET").unwrap_or_else(|_| {
                warn!("SUPABASE_JWT_SECRET not set, using empty value");
                String::new()
            }),
            clinic_timezone: clinic_timezone_from_env(),
            schedule: ScheduleConfig {
                open_hour: hour_var("CLINIC_OPEN_HOUR", 9),
                close_hour: hour_var("CLINIC_CLOSE_HOUR", 20),
                slot_minutes: hour_var("CLINIC_SLOT_MINUTES", 60),
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn clinic_timezone_from_env() -> Tz {
    let name = env::var("CLINIC_TIMEZONE").unwrap_or_else(|_| DEFAULT_CLINIC_TIMEZONE.to_string());
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("CLINIC_TIMEZONE '{}' is not a valid timezone, using {}", name, DEFAULT_CLINIC_TIMEZONE);
        chrono_tz::Europe::Bucharest
    })
}

fn hour_var(name: &str, default: u32) -> u32 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} '{}' is not a number, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
