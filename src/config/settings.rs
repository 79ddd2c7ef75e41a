use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{ext::PathExt, filesystem::ErrorPolicy};

const SETTINGS_FILE_NAME: &str = "dirsize.yaml";

fn get_default_settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE_NAME)
}

/// Values read from the optional settings file. `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub report_file: Option<PathBuf>,
    pub depth_limit: Option<i64>,
    pub progress: Option<bool>,
    pub on_error: Option<ErrorPolicy>,
}

impl Settings {
    /// Reads `explicit` if given, which must exist. Otherwise reads
    /// `dirsize.yaml` from the working directory when present.
    pub async fn read(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::from_path(path).await,
            None => {
                let path = get_default_settings_path();
                if !path.is_file() {
                    debug!("No {} found, using default settings", SETTINGS_FILE_NAME);
                    return Ok(Self::default());
                }
                Self::from_path(&path).await
            }
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, SettingsError> {
        debug!("Reading settings file: {}", path.absolute_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.absolute_display(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.absolute_display(),
        })?;

        let settings: Self = contents.as_str().try_into()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        // Blank or comment-only file
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        Self::from_mapping(top_level)
    }
}

impl Settings {
    fn from_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string settings key: {:?}", key);
                continue;
            };
            match &**key {
                "report_file" => {
                    settings.report_file = Some(PathBuf::from(string_value(key, value)?));
                }
                "depth_limit" => settings.depth_limit = Some(integer_value(key, value)?),
                "progress" => settings.progress = Some(bool_value(key, value)?),
                "on_error" => settings.on_error = Some(error_policy_value(key, value)?),
                other => debug!("Ignoring unknown setting '{}'", other),
            }
        }

        Ok(settings)
    }
}

fn string_value(key: &str, value: &Yaml) -> Result<String, SettingsError> {
    match value {
        Yaml::Value(Scalar::String(s)) => Ok(s.to_string()),
        _ => InvalidValueSnafu {
            key,
            expected: "a string",
        }
        .fail(),
    }
}

fn integer_value(key: &str, value: &Yaml) -> Result<i64, SettingsError> {
    match value {
        Yaml::Value(Scalar::Integer(n)) => Ok(*n),
        _ => InvalidValueSnafu {
            key,
            expected: "an integer",
        }
        .fail(),
    }
}

fn bool_value(key: &str, value: &Yaml) -> Result<bool, SettingsError> {
    match value {
        Yaml::Value(Scalar::Boolean(b)) => Ok(*b),
        _ => InvalidValueSnafu {
            key,
            expected: "true or false",
        }
        .fail(),
    }
}

fn error_policy_value(key: &str, value: &Yaml) -> Result<ErrorPolicy, SettingsError> {
    match value {
        Yaml::Value(Scalar::String(s)) if s == "fail" => Ok(ErrorPolicy::FailFast),
        Yaml::Value(Scalar::String(s)) if s == "skip" => Ok(ErrorPolicy::Skip),
        _ => InvalidValueSnafu {
            key,
            expected: "'fail' or 'skip'",
        }
        .fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Settings file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn settings_error_on_missing_explicit_file() {
        let result = Settings::read(Some(Path::new("nonexistent-settings.yaml"))).await;
        assert!(matches!(result, Err(SettingsError::ReadError { .. })));
    }

    #[compio::test]
    async fn settings_read_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("dirsize.yaml");
        std::fs::write(
            &path,
            "report_file: reports/usage.txt\ndepth_limit: 2\nprogress: false\non_error: skip\n",
        )
        .unwrap();

        let settings = Settings::read(Some(path.as_path())).await.expect("Failed to read settings");

        assert_eq!(
            settings,
            Settings {
                report_file: Some(PathBuf::from("reports/usage.txt")),
                depth_limit: Some(2),
                progress: Some(false),
                on_error: Some(ErrorPolicy::Skip),
            }
        );
    }

    #[compio::test]
    async fn settings_error_on_invalid_utf8() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("broken.yaml");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let result = Settings::from_path(&path).await;

        assert!(matches!(result, Err(SettingsError::EncodingError { .. })));
    }

    #[rstest]
    #[case("")]
    #[case("# only a comment\n")]
    fn settings_default_on_empty_file(#[case] contents: &str) {
        let settings: Settings = contents.try_into().expect("Failed to parse settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn settings_negative_depth_is_kept() {
        let settings: Settings = "depth_limit: -1".try_into().expect("Failed to parse settings");
        assert_eq!(settings.depth_limit, Some(-1));
    }

    #[test]
    fn settings_ignore_unknown_keys() {
        let settings: Settings = "colour: always\nprogress: true"
            .try_into()
            .expect("Failed to parse settings");
        assert_eq!(settings.progress, Some(true));
        assert_eq!(settings.report_file, None);
    }

    #[test]
    fn settings_error_on_invalid_yaml() {
        let result: Result<Settings, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn settings_error_when_top_level_is_not_map(#[case] contents: &str) {
        let result: Result<Settings, _> = contents.try_into();
        assert!(matches!(result, Err(SettingsError::TopLevelNotMap)));
    }

    #[rstest]
    #[case("depth_limit: deep", "depth_limit")]
    #[case("progress: sometimes", "progress")]
    #[case("on_error: retry", "on_error")]
    #[case("report_file: 42", "report_file")]
    fn settings_error_on_wrongly_typed_value(#[case] contents: &str, #[case] expected_key: &str) {
        let result: Result<Settings, _> = contents.try_into();
        match result {
            Err(SettingsError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }
}
