// Configuration loading and parsing (config/allyscope.toml).

use allyscope_core::picklist::rank::{check_min_opr, RankParams, SortKey, StrengthFilter};
use allyscope_core::sim::alliance::DEFAULT_TRIALS;
use allyscope_core::stats::{PhaseDefaults, PLACEHOLDER_CONSISTENCY};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the config file inside `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "allyscope.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub event: EventConfig,
    pub data_paths: DataPaths,
    pub simulation: SimulationConfig,
    pub pick_list: PickListConfig,
    pub estimation: EstimationConfig,
    pub export: ExportConfig,
}

// ---------------------------------------------------------------------------
// allyscope.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    event: EventConfig,
    data: DataPaths,
    #[serde(default)]
    simulation: SimulationConfig,
    #[serde(default)]
    pick_list: PickListConfig,
    #[serde(default)]
    estimation: EstimationConfig,
    export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    /// Event code, used to name exported files.
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub team_stats: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Fixed seed for reproducible runs; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PickListConfig {
    /// "Your own team"; excluded from the list and used for complementary bonuses.
    #[serde(default)]
    pub reference_team: Option<u32>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub strength: Option<StrengthFilter>,
    #[serde(default)]
    pub min_opr: Option<f64>,
}

impl PickListConfig {
    pub fn rank_params(&self) -> RankParams {
        RankParams {
            sort: self.sort,
            strength: self.strength,
            min_opr: self.min_opr,
        }
    }
}

/// Estimation policies applied while importing team statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimationConfig {
    #[serde(default = "default_auto_share")]
    pub auto_share: f64,
    #[serde(default = "default_teleop_share")]
    pub teleop_share: f64,
    #[serde(default = "default_placeholder_consistency")]
    pub placeholder_consistency: f64,
}

fn default_auto_share() -> f64 {
    PhaseDefaults::default().auto_share
}

fn default_teleop_share() -> f64 {
    PhaseDefaults::default().teleop_share
}

fn default_placeholder_consistency() -> f64 {
    PLACEHOLDER_CONSISTENCY
}

impl Default for EstimationConfig {
    fn default() -> Self {
        EstimationConfig {
            auto_share: default_auto_share(),
            teleop_share: default_teleop_share(),
            placeholder_consistency: default_placeholder_consistency(),
        }
    }
}

impl EstimationConfig {
    pub fn phase_defaults(&self) -> PhaseDefaults {
        PhaseDefaults {
            auto_share: self.auto_share,
            teleop_share: self.teleop_share,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/allyscope.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Parse and validate config text. `path` is only used in error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        event: file.event,
        data_paths: file.data,
        simulation: file.simulation,
        pick_list: file.pick_list,
        estimation: file.estimation,
        export: file.export,
    };

    validate(&config)?;

    Ok(config)
}

/// Create `config/allyscope.toml` from `defaults/allyscope.toml` when it does
/// not exist yet. Returns the path written, or `None` when a local config was
/// already present; a local config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "{} is missing and there is no {} to start from; pass --base-dir",
                target.display(),
                source.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;

    info!("Created {} from shipped defaults", target.display());
    Ok(Some(target))
}

/// Copy defaults if needed, then load config relative to `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.event.code.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "event.code".into(),
            message: "must not be empty".into(),
        });
    }

    if config.simulation.trials == 0 {
        return Err(ConfigError::ValidationError {
            field: "simulation.trials".into(),
            message: "must be greater than 0".into(),
        });
    }

    if let Some(min) = config.pick_list.min_opr {
        check_min_opr(min).map_err(|e| ConfigError::ValidationError {
            field: "pick_list.min_opr".into(),
            message: e.to_string(),
        })?;
    }

    if config.pick_list.reference_team == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "pick_list.reference_team".into(),
            message: "team numbers are positive".into(),
        });
    }

    let est = &config.estimation;
    let shares: &[(&str, f64)] = &[
        ("estimation.auto_share", est.auto_share),
        ("estimation.teleop_share", est.teleop_share),
    ];
    for (name, val) in shares {
        if !(0.0..=1.0).contains(val) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be between 0.0 and 1.0 inclusive, got {val}"),
            });
        }
    }

    if !(est.placeholder_consistency >= 0.0 && est.placeholder_consistency.is_finite()) {
        return Err(ConfigError::ValidationError {
            field: "estimation.placeholder_consistency".into(),
            message: format!("must be >= 0, got {}", est.placeholder_consistency),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MINIMAL: &str = r#"
[event]
code = "TEST"

[data]
team_stats = "data/team_stats.csv"

[export]
dir = "exports"
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("allyscope.toml"))
    }

    /// Path to the app crate root, where `defaults/` lives.
    fn app_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn shipped_defaults_load() {
        let text = fs::read_to_string(app_root().join("defaults").join(CONFIG_FILE)).unwrap();
        let config = parse(&text).expect("defaults should be valid");
        assert_eq!(config.simulation.trials, 10_000);
        assert_eq!(config.pick_list.sort, SortKey::PickScore);
        assert!(config.pick_list.reference_team.is_none());
        assert!((config.estimation.auto_share - 0.25).abs() < f64::EPSILON);
        assert!((config.estimation.teleop_share - 0.55).abs() < f64::EPSILON);
        assert!((config.estimation.placeholder_consistency - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.data_paths.team_stats, "data/team_stats.csv");
    }

    #[test]
    fn minimal_file_uses_section_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.simulation.trials, DEFAULT_TRIALS);
        assert!(config.simulation.seed.is_none());
        assert_eq!(config.pick_list.rank_params(), RankParams::default());
        assert_eq!(config.estimation.phase_defaults(), PhaseDefaults::default());
    }

    #[test]
    fn pick_list_section_parses_names() {
        let text = format!(
            "{MINIMAL}\n[pick_list]\nreference_team = 16091\nsort = \"auto\"\nstrength = \"consistent\"\nmin_opr = 50.0\n"
        );
        let config = parse(&text).unwrap();
        let params = config.pick_list.rank_params();
        assert_eq!(config.pick_list.reference_team, Some(16091));
        assert_eq!(params.sort, SortKey::OprAuto);
        assert_eq!(params.strength, Some(StrengthFilter::Consistent));
        assert_eq!(params.min_opr, Some(50.0));
    }

    #[test]
    fn rejects_zero_trials() {
        let text = format!("{MINIMAL}\n[simulation]\ntrials = 0\n");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "simulation.trials"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_share_out_of_range() {
        let text = format!("{MINIMAL}\n[estimation]\nauto_share = 1.5\n");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "estimation.auto_share")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_min_opr() {
        let text = format!("{MINIMAL}\n[pick_list]\nmin_opr = -5.0\n");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, message } => {
                assert_eq!(field, "pick_list.min_opr");
                assert!(message.contains("-5"));
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let text = format!("{MINIMAL}\n[pick_list]\nsort = \"speed\"\n");
        assert!(matches!(parse(&text).unwrap_err(), ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_config_file_reported() {
        let tmp = std::env::temp_dir().join("allyscope_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("config/allyscope.toml")),
            other => panic!("expected FileNotFound, got {other:?}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_file_copies_without_overwriting() {
        let tmp = std::env::temp_dir().join("allyscope_config_test_copy");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), MINIMAL).unwrap();

        let copied = ensure_config_file(&tmp).unwrap();
        assert_eq!(copied, Some(tmp.join("config").join(CONFIG_FILE)));
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.event.code, "TEST");

        // Local edits survive a second call.
        let edited = MINIMAL.replace("TEST", "EDITED");
        fs::write(tmp.join("config").join(CONFIG_FILE), edited).unwrap();
        assert_eq!(ensure_config_file(&tmp).unwrap(), None);
        assert_eq!(load_config_from(&tmp).unwrap().event.code, "EDITED");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn no_defaults_and_no_config_is_an_error() {
        let tmp = std::env::temp_dir().join("allyscope_config_test_empty");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_file(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
