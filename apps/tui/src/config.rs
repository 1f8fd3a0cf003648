use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::auth::Credentials;

const DEFAULT_DATABASE_NAME: &str = "literacy.db";
const DEFAULT_LOG_FILE: &str = "literacy-desk.log";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_path: PathBuf,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub credentials: Credentials,
}

/// Initializes the application configuration from the environment (and `.env`)
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let base_dir: PathBuf = env::current_dir()?;
    let db_name =
        env::var("DATABASE_NAME").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());
    let database_path = base_dir.join(&db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let database_url = database_url_for(&database_path)?;

    Ok(AppConfig {
        database_url,
        database_path,
        export_dir: get_export_dir(),
        log_file: get_log_file(),
        credentials: get_credentials(),
    })
}

/// SQLx wants `sqlite:///abs/path` for absolute paths and `sqlite://rel/path` otherwise.
pub fn database_url_for(path: &std::path::Path) -> color_eyre::eyre::Result<String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    if path.is_absolute() {
        Ok(format!("sqlite:///{clean_path}"))
    } else {
        Ok(format!("sqlite://{clean_path}"))
    }
}

/// Gets the directory exported workbooks are written to
pub fn get_export_dir() -> PathBuf {
    env::var("EXPORT_DIR").map_or_else(|_| PathBuf::from("./exports"), PathBuf::from)
}

pub fn get_log_file() -> PathBuf {
    env::var("LOG_FILE").map_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from)
}

pub fn get_credentials() -> Credentials {
    Credentials::new(
        env::var("ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
        env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn absolute_paths_get_three_slashes() -> color_eyre::eyre::Result<()> {
        let url = database_url_for(Path::new("/var/lib/literacy/literacy.db"))?;
        assert_eq!(url, "sqlite:///var/lib/literacy/literacy.db");
        Ok(())
    }

    #[test]
    fn relative_paths_get_two_slashes() -> color_eyre::eyre::Result<()> {
        let url = database_url_for(Path::new("data/literacy.db"))?;
        assert_eq!(url, "sqlite://data/literacy.db");
        Ok(())
    }
}
