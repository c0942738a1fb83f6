use anyhow::{Context, Result};
use engine::AnalysisOptions;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

const CONFIG_PATHS: &[&str] = &[
    "/etc/logscope/intake",
    "config/intake",
    "crates/intake/config/intake",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub upload: UploadConfig,
    pub analysis: AnalysisOptions,
    pub follow: FollowConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_bytes: u64,
    /// Case-insensitive; the leading dot is optional
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FollowConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Where diagnostics go. Never stdout: stdout carries the reports.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    File { path: String },
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 50 * MIB,
            allowed_extensions: vec![".log".to_string(), ".txt".to_string()],
        }
    }
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 1000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,logscope=debug".to_string(),
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
        }
    }
}

impl UploadConfig {
    /// Whether `name` ends in one of the allowed extensions.
    pub fn allows(&self, name: &str) -> bool {
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    pub fn describe_extensions(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|e| format!(".{}", e.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl IntakeConfig {
    /// Load from the standard config locations and `LOGSCOPE_*` environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::load_from(CONFIG_PATHS)
    }

    /// Defaults, then each optional file in order, then environment
    /// (`LOGSCOPE_UPLOAD__MAX_FILE_BYTES=...`).
    pub fn load_from(paths: &[&str]) -> Result<Self> {
        let defaults = config::Config::try_from(&IntakeConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        for path in paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LOGSCOPE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("upload.allowed_extensions")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload.max_file_bytes == 0 {
            anyhow::bail!("upload.max_file_bytes must be > 0");
        }
        if self.upload.allowed_extensions.is_empty() {
            anyhow::bail!("upload.allowed_extensions must not be empty");
        }
        if let Some(bad) = self
            .upload
            .allowed_extensions
            .iter()
            .find(|e| e.trim_start_matches('.').is_empty())
        {
            anyhow::bail!("upload.allowed_extensions contains an empty extension: {:?}", bad);
        }
        if self.follow.poll_interval_ms == 0 {
            anyhow::bail!("follow.poll_interval_ms must be > 0");
        }
        self.analysis.validate().map_err(anyhow::Error::msg)?;
        Ok(())
    }
}
