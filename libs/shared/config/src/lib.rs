use std::env;
use std::str::FromStr;
use tracing::warn;

/// Which persistence backend the API binary wires into the booking cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Supabase,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(StoreBackend::Memory),
            "supabase" => Ok(StoreBackend::Supabase),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

/// One slot can span at most the whole day.
pub const MAX_SLOT_INTERVAL_MINUTES: i64 = 24 * 60;

pub const MAX_PAYMENT_DUE_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub store_backend: StoreBackend,
    pub server_port: u16,
    pub slot_interval_minutes: i64,
    pub invoice_surcharge: f64,
    pub payment_due_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            store_backend: StoreBackend::Memory,
            server_port: 3000,
            slot_interval_minutes: 30,
            invoice_surcharge: 50.0,
            payment_due_days: 1,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            store_backend: parse_or_default("STORE_BACKEND", defaults.store_backend),
            server_port: parse_or_default("PORT", defaults.server_port),
            slot_interval_minutes: parse_or_default("SLOT_INTERVAL_MINUTES", defaults.slot_interval_minutes),
            invoice_surcharge: parse_or_default("INVOICE_SURCHARGE", defaults.invoice_surcharge),
            payment_due_days: parse_or_default("PAYMENT_DUE_DAYS", defaults.payment_due_days),
        };

        let config = config.validated();

        if config.store_backend == StoreBackend::Supabase && !config.is_configured() {
            warn!("Supabase backend selected but not fully configured - missing environment variables");
        }

        config
    }

    /// Replaces booking policy values outside their bounds with the defaults.
    pub fn validated(self) -> Self {
        let defaults = Self::default();

        let slot_interval_minutes = if (1..=MAX_SLOT_INTERVAL_MINUTES).contains(&self.slot_interval_minutes) {
            self.slot_interval_minutes
        } else {
            warn!(
                "SLOT_INTERVAL_MINUTES must be between 1 and {}, got {}, falling back to {}",
                MAX_SLOT_INTERVAL_MINUTES, self.slot_interval_minutes, defaults.slot_interval_minutes
            );
            defaults.slot_interval_minutes
        };

        let payment_due_days = if (0..=MAX_PAYMENT_DUE_DAYS).contains(&self.payment_due_days) {
            self.payment_due_days
        } else {
            warn!(
                "PAYMENT_DUE_DAYS must be between 0 and {}, got {}, falling back to {}",
                MAX_PAYMENT_DUE_DAYS, self.payment_due_days, defaults.payment_due_days
            );
            defaults.payment_due_days
        };

        Self { slot_interval_minutes, payment_due_days, ..self }
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value {:?}, using default {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_known_names() {
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!(" Supabase ".parse::<StoreBackend>(), Ok(StoreBackend::Supabase));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn defaults_match_booking_policy() {
        let config = AppConfig::default();
        assert_eq!(config.slot_interval_minutes, 30);
        assert_eq!(config.invoice_surcharge, 50.0);
        assert_eq!(config.payment_due_days, 1);
        assert!(!config.is_configured());
    }

    #[test]
    fn in_range_policy_values_are_kept() {
        let config = AppConfig { slot_interval_minutes: 15, payment_due_days: 0, ..AppConfig::default() }.validated();
        assert_eq!(config.slot_interval_minutes, 15);
        assert_eq!(config.payment_due_days, 0);
    }

    #[test]
    fn non_positive_slot_interval_falls_back() {
        for interval in [0, -30] {
            let config = AppConfig { slot_interval_minutes: interval, ..AppConfig::default() }.validated();
            assert_eq!(config.slot_interval_minutes, 30);
        }
    }

    #[test]
    fn huge_slot_interval_falls_back() {
        let config = AppConfig { slot_interval_minutes: i64::MAX / 10, ..AppConfig::default() }.validated();
        assert_eq!(config.slot_interval_minutes, 30);

        let config = AppConfig { slot_interval_minutes: MAX_SLOT_INTERVAL_MINUTES + 1, ..AppConfig::default() }.validated();
        assert_eq!(config.slot_interval_minutes, 30);
    }

    #[test]
    fn negative_payment_due_days_falls_back() {
        let config = AppConfig { payment_due_days: -3, ..AppConfig::default() }.validated();
        assert_eq!(config.payment_due_days, 1);
    }

    #[test]
    fn huge_payment_due_days_falls_back() {
        let config = AppConfig { payment_due_days: i64::MAX, ..AppConfig::default() }.validated();
        assert_eq!(config.payment_due_days, 1);
    }
}
