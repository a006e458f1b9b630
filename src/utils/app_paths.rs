use anyhow::Result;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine data directory"))?
            .join("hemis-bot");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn action_log_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("user_actions.json"))
    }
}
