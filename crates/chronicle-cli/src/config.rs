// Copyright 2026 The chronicle authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chronicle_app::{DEFAULT_AGENT_NAMES, DEFAULT_PLAIN_TEXT_FROM, SegmenterConfig};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub reader: Reader,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            reader: Reader::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub archive_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub show_reading_time: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            show_reading_time: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reader {
    pub agent_names: Option<Vec<String>>,
    pub plain_text_from: Option<usize>,
}

impl Default for Reader {
    fn default() -> Self {
        Self {
            agent_names: Some(
                DEFAULT_AGENT_NAMES
                    .iter()
                    .map(|name| (*name).to_owned())
                    .collect(),
            ),
            plain_text_from: Some(DEFAULT_PLAIN_TEXT_FROM),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CHRONICLE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CHRONICLE_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(chronicle_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and place values under [storage], [ui], and [reader]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(archive_path) = &self.storage.archive_path {
            chronicle_store::validate_archive_path(archive_path)?;
        }

        if let Some(threshold) = self.reader.plain_text_from
            && threshold < 1
        {
            bail!(
                "reader.plain_text_from in {} must be at least 1 (chapter numbers are 1-based), got {}",
                path.display(),
                threshold
            );
        }

        if let Some(names) = &self.reader.agent_names {
            if names.is_empty() {
                bail!(
                    "reader.agent_names in {} must not be empty; remove the key to use the defaults",
                    path.display()
                );
            }
            if names.iter().any(|name| name.trim().is_empty()) {
                bail!(
                    "reader.agent_names in {} contains a blank name",
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn archive_path(&self) -> Result<PathBuf> {
        match &self.storage.archive_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => chronicle_store::default_archive_path(),
        }
    }

    pub fn show_reading_time(&self) -> bool {
        self.ui.show_reading_time.unwrap_or(true)
    }

    pub fn segmenter_config(&self) -> SegmenterConfig {
        let names = self.reader.agent_names.clone().unwrap_or_else(|| {
            DEFAULT_AGENT_NAMES
                .iter()
                .map(|name| (*name).to_owned())
                .collect()
        });
        let threshold = self
            .reader
            .plain_text_from
            .unwrap_or(DEFAULT_PLAIN_TEXT_FROM);
        SegmenterConfig::new(names, threshold)
    }

    pub fn example_config(path: &Path) -> String {
        let names = DEFAULT_AGENT_NAMES
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "# chronicle config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/chronicle/archive.json)\n# archive_path = \"/absolute/path/to/archive.json\"\n\n[ui]\nshow_reading_time = true\n\n[reader]\n# Chapters numbered at or past this render as free-form prose.\nplain_text_from = {}\nagent_names = [{}]\n",
            path.display(),
            DEFAULT_PLAIN_TEXT_FROM,
            names,
        )
    }
}
