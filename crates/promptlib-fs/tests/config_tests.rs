use promptlib_fs::{ConfigStore, Error, NormalizedPath};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    name: String,
    #[serde(default)]
    enabled: bool,
}

#[test]
fn test_round_trip_each_format() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();
    let value = Settings {
        name: "library".into(),
        enabled: true,
    };

    for file in ["s.toml", "s.json", "s.yaml"] {
        let path = NormalizedPath::new(temp.path().join(file));
        store.save(&path, &value).unwrap();
        let loaded: Settings = store.load(&path).unwrap();
        assert_eq!(loaded, value, "format {file}");
    }
}

#[test]
fn test_load_or_default_for_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent.toml"));

    let loaded: Settings = ConfigStore::new().load_or_default(&path).unwrap();

    assert_eq!(loaded, Settings::default());
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("settings.ini"));

    let result = ConfigStore::new().save(&path, &Settings::default());

    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("broken.toml");
    std::fs::write(&file, "name = [").unwrap();

    let result: Result<Settings, _> = ConfigStore::new().load(&NormalizedPath::new(&file));

    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}
