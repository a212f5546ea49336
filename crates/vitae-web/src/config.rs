pub const DEFAULT_PORT: u16 = 8501;

/// Largest accepted request body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: parse_or("VITAE_PORT", lookup("VITAE_PORT"), DEFAULT_PORT),
            max_upload_bytes: parse_or(
                "VITAE_MAX_UPLOAD_BYTES",
                lookup("VITAE_MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    let Some(value) = value else {
        return default;
    };

    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, %value, "Ignoring invalid setting");
        default
    })
}
