//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{FerruleConfig, RawConfig};
use std::path::Path;

/// Name of the configuration file inside a project directory.
pub const CONFIG_FILE_NAME: &str = "ferrule.toml";

/// Loads and validates a `ferrule.toml` configuration from a project directory.
///
/// A missing file is not an error: the default configuration is returned.
pub fn load_config(project_dir: &Path) -> Result<FerruleConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FerruleConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    load_config_from_str(&content)
}

/// Parses and validates a `ferrule.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<FerruleConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    let config = raw.resolve()?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the fold list is usable.
fn validate_config(config: &FerruleConfig) -> Result<(), ConfigError> {
    let folds = &config.evaluator.folds;
    if folds.is_empty() {
        return Err(ConfigError::InvalidFolds(
            "at least one fold is required".to_string(),
        ));
    }
    for (i, fold) in folds.iter().enumerate() {
        if folds[..i].contains(fold) {
            return Err(ConfigError::InvalidFolds(format!(
                "`{fold}` is listed more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FoldKind;

    #[test]
    fn empty_file_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, FerruleConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[evaluator]
folds = ["apply-operator-promotion", "apply-casts", "remove-redundant-casts"]
inline_locals = false
remove_redundant_casts = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.evaluator.folds,
            vec![
                FoldKind::ApplyOperatorPromotion,
                FoldKind::ApplyCasts,
                FoldKind::RemoveRedundantCasts
            ]
        );
        assert!(!config.evaluator.inline_locals);
        assert!(config.evaluator.remove_redundant_casts);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = load_config_from_str("[evaluator]\ninline_locals = false\n").unwrap();
        assert_eq!(config.evaluator.folds, FoldKind::DEFAULT_CHAIN.to_vec());
        assert!(!config.evaluator.inline_locals);
    }

    #[test]
    fn unknown_fold_errors() {
        let err = load_config_from_str("[evaluator]\nfolds = [\"fold-all\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFold(_)));
    }

    #[test]
    fn empty_fold_list_errors() {
        let err = load_config_from_str("[evaluator]\nfolds = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFolds(_)));
    }

    #[test]
    fn duplicate_fold_errors() {
        let toml = "[evaluator]\nfolds = [\"apply-casts\", \"apply-casts\"]\n";
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFolds(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_errors() {
        let err = load_config_from_str("[evaluator]\nfold = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[evaluator]\nremove_redundant_casts = true\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.evaluator.remove_redundant_casts);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, FerruleConfig::default());
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Read { path, .. } if path.ends_with(CONFIG_FILE_NAME)),
            "{err}"
        );
    }
}
