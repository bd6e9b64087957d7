//! Configuration loading and saving.

use std::path::Path;

use tv_config::{ConfigError, ThermovoltConfig};

use crate::error::{AppError, AppResult};

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load and validate a configuration file.
///
/// `.json` files are parsed as JSON, anything else as YAML.
pub fn load_config(path: &Path) -> AppResult<ThermovoltConfig> {
    let loaded = if is_json(path) {
        tv_config::load_json(path)
    } else {
        tv_config::load_yaml(path)
    };
    loaded.map_err(|e| match e {
        ConfigError::Io(source) => AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Validate and write a configuration file, picking the format as
/// [`load_config`] does.
pub fn save_config(path: &Path, config: &ThermovoltConfig) -> AppResult<()> {
    let saved = if is_json(path) {
        tv_config::save_json(path, config)
    } else {
        tv_config::save_yaml(path, config)
    };
    saved.map_err(|e| match e {
        ConfigError::Io(source) => AppError::ConfigFileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// The file at `path`, or the built-in defaults when no path is given.
pub fn resolve_config(path: Option<&Path>) -> AppResult<ThermovoltConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ThermovoltConfig::default()),
    }
}

/// The built-in defaults as a YAML document.
pub fn default_config_yaml() -> AppResult<String> {
    Ok(tv_config::to_yaml_string(&ThermovoltConfig::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tv-app-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn scratch(name: &str, content: &str) -> PathBuf {
        let path = scratch_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn picks_format_by_extension() {
        let yaml = scratch("poll.yaml", "poll:\n  interval_s: 2.0\n");
        assert_eq!(load_config(&yaml).unwrap().poll.interval_s, 2.0);

        let json = scratch("poll.JSON", r#"{"poll": {"interval_s": 3.0}}"#);
        assert_eq!(load_config(&json).unwrap().poll.interval_s, 3.0);
    }

    #[test]
    fn json_is_validated_too() {
        let json = scratch("bad.json", r#"{"poll": {"interval_s": 0.0}}"#);
        assert!(matches!(load_config(&json), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_config(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigFileRead { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn saved_defaults_load_back_in_either_format() {
        let dir = scratch_dir();
        for name in ["defaults.yaml", "defaults.json"] {
            let path = dir.join(name);
            save_config(&path, &ThermovoltConfig::default()).unwrap();
            assert_eq!(load_config(&path).unwrap(), ThermovoltConfig::default());
        }
        let json = std::fs::read_to_string(dir.join("defaults.json")).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[test]
    fn unwritable_path_names_the_path() {
        let err = save_config(
            Path::new("/definitely/not/here/out.yaml"),
            &ThermovoltConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigFileWrite { .. }));
    }

    #[test]
    fn default_document_loads_back() {
        let yaml = default_config_yaml().unwrap();
        let config = tv_config::from_yaml_str(&yaml).unwrap();
        assert_eq!(config, resolve_config(None).unwrap());
    }
}
