use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::{
    debug,
    warn,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::Result;

const APP_NAME: &str = "sentiment-dashboard";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json_to<T: Serialize>(data: &T, file_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    debug!("Data saved to: {}", file_path.display());
    Ok(())
}

/// Missing files load as `T::default()`.
pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(file_path: &Path) -> Result<T> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!("Data loaded from: {}", file_path.display());
    Ok(data)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<()> {
    save_json_to(data, &get_data_file_path(filename))
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> Result<T> {
    load_json_from(&get_data_file_path(filename))
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json::<T>(filename) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}
