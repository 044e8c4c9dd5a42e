use std::collections::HashSet;
use std::env;

use tracing::warn;

pub const DEFAULT_ADMIN_PREFIX: &str = "/kk-console-admin";

/// Where the admin interface is mounted and who may use it
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub path_prefix: String,
    pub allowed_uids: HashSet<String>,
}

impl AdminConfig {
    /// Load admin configuration from environment variables
    ///
    /// Environment variables:
    /// - ADMIN_PATH_PREFIX: Mount point of the admin interface
    ///   (default: "/kk-console-admin"). Obscurity only, not an access control.
    /// - ADMIN_UIDS: Comma-separated Firebase UIDs allowed into the admin
    ///   interface (default: none)
    pub fn from_env() -> Self {
        let prefix = env::var("ADMIN_PATH_PREFIX").unwrap_or_default();
        let uids = env::var("ADMIN_UIDS").unwrap_or_default();
        let config = Self::from_values(&prefix, &uids);

        if config.allowed_uids.is_empty() {
            warn!("ADMIN_UIDS is empty; every admin request will be refused");
        }

        config
    }

    fn from_values(prefix: &str, uids: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        let path_prefix = if trimmed.is_empty() {
            DEFAULT_ADMIN_PREFIX.to_string()
        } else {
            format!("/{}", trimmed)
        };

        let allowed_uids = uids
            .split(',')
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            path_prefix,
            allowed_uids,
        }
    }
}
