use anyhow::{anyhow, Result};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "incident-map.toml";

const ENV_NAME_DB_URL: &str = "DATABASE_URL";

pub struct Config {
    pub db: Db,
    pub webserver: WebServer,
    pub engagement: Engagement,
    pub images: Images,
    pub geolocation: Geolocation,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!(
                    "{} not found => load default configuration.",
                    file_path.display()
                );
                raw::Config::default()
            }
            Err(err) => return Err(err.into()),
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(db_url) = env::var(ENV_NAME_DB_URL) {
            cfg.db.conn_sqlite = db_url;
        }
        Ok(cfg)
    }
}

pub struct Db {
    /// SQLite connection
    pub conn_sqlite: String,
    pub conn_pool_size: u8,
}

pub struct WebServer {
    pub enable_cors: bool,
    pub default_radius_km: f64,
}

pub struct Engagement {
    /// File system directory for the client-local JSON records.
    pub dir: PathBuf,
}

pub struct Images {
    pub dir: Option<PathBuf>,
}

pub struct Geolocation {
    pub url: Option<String>,
    pub timeout: Duration,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            db,
            webserver,
            engagement,
            images,
            geolocation,
        } = from;

        let raw::Db {
            connection_sqlite,
            connection_pool_size,
        } = db.unwrap_or_default();
        if connection_pool_size == 0 {
            return Err(anyhow!("The connection pool size must not be zero"));
        }
        let db = Db {
            conn_sqlite: connection_sqlite,
            conn_pool_size: connection_pool_size,
        };

        let raw::WebServer {
            cors,
            default_radius_km,
        } = webserver.unwrap_or_default();
        if !default_radius_km.is_finite() {
            return Err(anyhow!("Invalid default radius: {default_radius_km}"));
        }
        let webserver = WebServer {
            enable_cors: cors,
            default_radius_km,
        };

        let raw::Engagement { dir } = engagement.unwrap_or_default();
        let engagement = Engagement { dir };

        let raw::Images { dir } = images.unwrap_or_default();
        if let Some(dir) = &dir {
            log::info!("Resolve images from {}", dir.display());
        }
        let images = Images { dir };

        let raw::Geolocation { url, timeout } = geolocation.unwrap_or_default();
        let geolocation = Geolocation { url, timeout };

        Ok(Self {
            db,
            webserver,
            engagement,
            images,
            geolocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg = Config::try_load_from_file_or_default(file).unwrap();
        assert_eq!(cfg.webserver.default_radius_km, 10.0);
        assert!(!cfg.webserver.enable_cors);
        assert_eq!(cfg.geolocation.timeout, Duration::from_secs(8));
    }

    #[test]
    fn reject_empty_connection_pool() {
        let raw: raw::Config = toml::from_str(
            r#"
[db]
connection-sqlite = ":memory:"
connection-pool-size = 0
"#,
        )
        .unwrap();
        assert!(Config::try_from(raw).is_err());
    }
}
