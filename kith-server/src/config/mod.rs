//! Server configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_request_size: usize,

    /// Enable authentication
    pub enable_auth: bool,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// Session token expiration time in hours
    pub jwt_expiration_hours: u64,

    /// Email verification token expiration time in hours
    pub verification_token_hours: u64,

    /// Allow user signup (set to false in production)
    pub allow_signup: bool,

    /// Public base URL used to build activation links
    pub base_url: String,

    /// Use the stricter send-friend-request guard variant
    pub strict_relationship_guards: bool,

    /// Mail relay endpoint; verification mail is logged when unset
    pub mail_relay_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            max_request_size: 1024 * 1024, // 1MB; bodies carry JSON only
            enable_auth: true,
            jwt_secret: "".to_string(), // Generated at runtime if not provided
            jwt_expiration_hours: 24 * 7, // Week-long sessions
            verification_token_hours: 24,
            allow_signup: true,
            base_url: "http://localhost:3000".to_string(),
            strict_relationship_guards: false,
            mail_relay_url: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from CLI arguments and environment variables.
    /// CLI arguments take precedence over environment variables.
    pub fn from_cli_and_env(cli_args: crate::cli::CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = cli_args.port {
            config.port = port;
        } else if let Ok(port) = env::var("KITH_PORT") {
            config.port = port.parse()?;
        }

        if let Some(max_size) = cli_args.max_request_size {
            config.max_request_size = max_size;
        } else if let Ok(max_size) = env::var("KITH_MAX_REQUEST_SIZE") {
            config.max_request_size = max_size.parse()?;
        }

        if let Some(enable_auth) = cli_args.enable_auth {
            config.enable_auth = enable_auth;
        } else if let Ok(enable_auth) = env::var("KITH_ENABLE_AUTH") {
            config.enable_auth = enable_auth.parse().unwrap_or(true);
        }

        if let Some(jwt_secret) = cli_args.jwt_secret {
            config.jwt_secret = jwt_secret;
        } else if let Ok(jwt_secret) = env::var("KITH_JWT_SECRET") {
            config.jwt_secret = jwt_secret;
        } else if config.jwt_secret.is_empty() {
            config.jwt_secret = Self::generate_jwt_secret();
        }

        if let Some(exp_hours) = cli_args.jwt_expiration_hours {
            config.jwt_expiration_hours = exp_hours;
        } else if let Ok(exp_hours) = env::var("KITH_JWT_EXPIRATION_HOURS") {
            config.jwt_expiration_hours = exp_hours.parse()?;
        }

        if let Ok(hours) = env::var("KITH_VERIFICATION_TOKEN_HOURS") {
            config.verification_token_hours = hours.parse()?;
        }

        if let Some(allow_signup) = cli_args.allow_signup {
            config.allow_signup = allow_signup;
        } else if let Ok(allow_signup) = env::var("KITH_ALLOW_SIGNUP") {
            config.allow_signup = allow_signup.parse().unwrap_or(true);
        }

        if let Some(base_url) = cli_args.base_url {
            config.base_url = base_url;
        } else if let Ok(base_url) = env::var("KITH_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(strict) = cli_args.strict_guards {
            config.strict_relationship_guards = strict;
        } else if let Ok(strict) = env::var("KITH_STRICT_GUARDS") {
            config.strict_relationship_guards = strict.parse().unwrap_or(false);
        }

        if let Some(url) = cli_args.mail_relay_url {
            config.mail_relay_url = Some(url);
        } else if let Ok(url) = env::var("KITH_MAIL_RELAY_URL") {
            config.mail_relay_url = Some(url);
        }

        Ok(config)
    }

    /// Generate a secure random JWT secret
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;
        use rand::distr::Alphanumeric;
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }
}
