use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub sheet: SheetConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token. Usually left empty here and supplied via the
    /// BOT_TOKEN environment variable instead of sitting in a file.
    pub bot_token: String,

    /// Chat ids allowed to open the admin panel
    pub admin_ids: Vec<i64>,

    /// Long-poll timeout for getUpdates, seconds
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet id of the registry
    pub sheet_id: String,

    /// Worksheet (tab) title
    pub worksheet_title: String,

    /// Status phrase marking an active contract; matched as a
    /// case-insensitive substring of the status column
    pub required_status: String,

    /// Sheets API bearer token. Usually via SHEETS_API_TOKEN.
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Snapshot cache time-to-live, seconds
    pub cache_ttl_secs: u64,

    /// Records per result page
    pub page_size: usize,

    /// Action log file (leave unset for the default data dir location)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            sheet: SheetConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            admin_ids: Vec::new(),
            poll_timeout_secs: 30,
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: String::new(),
            worksheet_title: "Sheet1".to_string(),
            required_status: "faol mehnat shartnomasiga ega".to_string(),
            api_token: String::new(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            page_size: 7,
            action_log_path: None,
        }
    }
}

impl Config {
    /// Load config from the default location, then let the environment
    /// override the secrets and the ids (BOT_TOKEN, SHEETS_API_TOKEN,
    /// SHEET_ID, WORKSHEET_TITLE, ADMIN_IDS).
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            default_config.save()?;
            default_config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Ok(token) = std::env::var("SHEETS_API_TOKEN") {
            self.sheet.api_token = token;
        }
        if let Ok(id) = std::env::var("SHEET_ID") {
            self.sheet.sheet_id = id;
        }
        if let Ok(title) = std::env::var("WORKSHEET_TITLE") {
            self.sheet.worksheet_title = title;
        }
        if let Ok(ids) = std::env::var("ADMIN_IDS") {
            self.telegram.admin_ids = ids
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("hemis-bot").join("config.toml"))
    }
}
