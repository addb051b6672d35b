use std::env;

/// Settings required before anything else can start.
///
/// Read once from the environment in main; everything that can be tuned at
/// runtime lives in `ApplicationSettings` instead.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    database_url: String,
    jwt_secret: String,
}

impl BootstrapSettings {
    /// Load bootstrap settings from environment variables
    ///
    /// `DATABASE_URL` falls back to a local SQLite file for development;
    /// `JWT_SECRET` has no safe default and must be set.
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://foundbox.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET environment variable must be set".to_string())?;

        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters".to_string());
        }

        Ok(Self {
            database_url,
            jwt_secret,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl std::fmt::Display for BootstrapSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BootstrapSettings {{ database_url: {}, jwt_secret: <redacted> }}",
            self.database_url
        )
    }
}
