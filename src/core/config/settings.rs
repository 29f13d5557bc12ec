use super::parsing::{
    env_optional, env_or_default, normalize_prefix, parse_bool, parse_cors_origins,
    parse_environment, parse_i64, parse_u16, parse_u32,
};
use super::types::{
    ApiSettings, ConfigError, CorsSettings, DatabaseSettings, GenerationSettings, RuntimeSettings,
    S3Settings, SecuritySettings, ServerHost, ServerPort, ServerSettings, Settings,
    TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("EXAMLY_HOST", "0.0.0.0");
        let port = env_or_default("EXAMLY_PORT", "8000");

        let environment =
            parse_environment(env_optional("EXAMLY_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("EXAMLY_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Examly API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_prefix = normalize_prefix(env_or_default("API_PREFIX", "/api"));

        let jwt_secret = env_or_default("JWT_SECRET", "");
        let algorithm = env_or_default("JWT_ALGORITHM", "HS256");
        let audience = env_optional("JWT_AUDIENCE");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = parse_u16("POSTGRES_PORT", env_or_default("POSTGRES_PORT", "5432"))?;
        let postgres_user = env_or_default("POSTGRES_USER", "examly");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "examly_db");
        let database_url = env_optional("DATABASE_URL");
        let max_connections =
            parse_u32("DB_MAX_CONNECTIONS", env_or_default("DB_MAX_CONNECTIONS", "20"))?;

        let s3_endpoint = env_or_default("S3_ENDPOINT", "https://s3.amazonaws.com");
        let s3_access_key = env_or_default("S3_ACCESS_KEY", "");
        let s3_secret_key = env_or_default("S3_SECRET_KEY", "");
        let s3_bucket = env_or_default("S3_BUCKET", "examly-papers");
        let s3_region = env_or_default("S3_REGION", "us-east-1");
        let s3_public_base_url = env_optional("S3_PUBLIC_BASE_URL");

        let max_questions_per_type = parse_i64(
            "MAX_QUESTIONS_PER_TYPE",
            env_or_default("MAX_QUESTIONS_PER_TYPE", "200"),
        )?;

        let log_level = env_or_default("EXAMLY_LOG_LEVEL", "info");
        let json = env_optional("EXAMLY_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_prefix },
            security: SecuritySettings { jwt_secret, algorithm, audience },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            s3: S3Settings {
                endpoint: s3_endpoint,
                access_key: s3_access_key,
                secret_key: s3_secret_key,
                bucket: s3_bucket,
                region: s3_region,
                public_base_url: s3_public_base_url,
            },
            generation: GenerationSettings { max_questions_per_type },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn s3(&self) -> &S3Settings {
        &self.s3
    }

    pub(crate) fn generation(&self) -> &GenerationSettings {
        &self.generation
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.max_questions_per_type < 1 {
            return Err(ConfigError::InvalidValue {
                field: "MAX_QUESTIONS_PER_TYPE",
                value: self.generation.max_questions_per_type.to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        if !matches!(self.security.algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(ConfigError::InvalidValue {
                field: "JWT_ALGORITHM",
                value: self.security.algorithm.clone(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret("JWT_SECRET"));
        }
        if !self.s3.is_configured() {
            return Err(ConfigError::MissingSecret("S3_ACCESS_KEY/S3_SECRET_KEY"));
        }

        Ok(())
    }
}
