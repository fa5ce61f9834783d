use std::env;

/// Deployment environment, parsed from `EDUHUB_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Preview,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        match env::var("EDUHUB_ENV").unwrap_or_default().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "preview" => Environment::Preview,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server_port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
}

impl GatewayConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let jwt_secret = match env::var("EDUHUB_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment.is_production() => {
                anyhow::bail!("EDUHUB_JWT_SECRET must be set in production")
            }
            _ => {
                tracing::warn!("EDUHUB_JWT_SECRET not set; using insecure dev default");
                "dev-secret".to_string()
            }
        };

        Ok(Self {
            server_port: env::var("EDUHUB_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret,
            environment,
        })
    }
}
