use simplelog::*;
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind};
use std::path::PathBuf;
use std::sync::OnceLock;

static LOGGER_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// `$HOME/.local/share/sonisyncrs/logs`
pub fn log_dir() -> Result<PathBuf, Error> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not set"))?;

    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("sonisyncrs")
        .join("logs"))
}

/// Routes the `log` facade to `app.log`. Safe to call more than once.
pub fn init_logger() -> Result<(), Error> {
    let log_dir = log_dir()?;

    // Create the log directory if it doesn't exist
    fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("app.log"))?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let initialized = *LOGGER_INITIALIZED.get_or_init(|| {
        CombinedLogger::init(vec![WriteLogger::new(LevelFilter::Debug, config, log_file)]).is_ok()
    });

    if initialized {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::Other, "Logger initialization failed"))
    }
}
