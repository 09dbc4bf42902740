use std::collections::HashMap;
use std::io::Write;

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn resolve(file: Option<&str>, env: &[(&str, &str)]) -> Result<Settings, SettingsError> {
    Settings::resolve(file, Path::new("settings.toml"), env_from(env))
}

const FILE: &str = r#"
[sheets]
spreadsheet = "Jogos e Similares"
credentials_path = "/etc/similar-games/key.json"
output_worksheet = "Saida"

[catalog]
host = "catalog.test"
strategy = "load-more"
page_limit = 20
click_budget = 3
settle_delay_ms = 500
allowed_platforms = ["pc", "switch"]
max_results = 5

[browser]
webdriver_url = "http://chromedriver:4444"
headless = false

[run]
game_delay_ms = 0
"#;

#[test]
fn defaults_without_file_or_env() {
    let settings = resolve(None, &[]).unwrap();
    assert_eq!(settings.spreadsheet, None);
    assert_eq!(settings.credentials, None);
    assert_eq!(settings.input_worksheet, "Jogos");
    assert_eq!(settings.output_worksheet, "Jogos Similares");
    assert_eq!(settings.catalog_host, "rawg.io");
    assert_eq!(settings.filter, SuggestionFilter::default());
    assert_eq!(settings.game_delay, Duration::from_secs(2));
    assert!(settings.headless);
}

#[test]
fn file_values_apply() {
    let settings = resolve(Some(FILE), &[]).unwrap();
    assert_eq!(settings.spreadsheet.as_deref(), Some("Jogos e Similares"));
    assert_eq!(
        settings.credentials,
        Some(CredentialsSource::File("/etc/similar-games/key.json".into()))
    );
    assert_eq!(settings.input_worksheet, "Jogos");
    assert_eq!(settings.output_worksheet, "Saida");
    assert_eq!(settings.catalog_host, "catalog.test");
    assert_eq!(settings.loader.strategy, LoadStrategy::LoadMore);
    assert_eq!(settings.loader.click_budget, 3);
    assert_eq!(settings.loader.settle_delay, Duration::from_millis(500));
    assert_eq!(settings.page_limit, 20);
    assert_eq!(
        settings.filter.allowed_platforms,
        vec![Platform::Pc, Platform::Nintendo]
    );
    assert_eq!(settings.filter.max_results, 5);
    assert_eq!(settings.webdriver_url, "http://chromedriver:4444");
    assert!(!settings.headless);
    assert!(settings.game_delay.is_zero());
}

#[test]
fn env_overrides_file() {
    let settings = resolve(
        Some(FILE),
        &[
            (ENV_SPREADSHEET, "https://docs.google.com/spreadsheets/d/abc/edit"),
            (ENV_CREDENTIALS, "{\"client_email\":\"a\"}"),
            (ENV_HEADLESS, "yes"),
            (ENV_CATALOG_HOST, "rawg.io"),
        ],
    )
    .unwrap();
    assert_eq!(
        settings.spreadsheet.as_deref(),
        Some("https://docs.google.com/spreadsheets/d/abc/edit")
    );
    assert!(matches!(settings.credentials, Some(CredentialsSource::Json(_))));
    assert!(settings.headless);
    assert_eq!(settings.catalog_host, "rawg.io");
}

#[test]
fn blank_env_is_ignored() {
    let settings = resolve(Some(FILE), &[(ENV_SPREADSHEET, "  ")]).unwrap();
    assert_eq!(settings.spreadsheet.as_deref(), Some("Jogos e Similares"));
}

#[test]
fn credentials_file_env_beats_file_setting() {
    let settings = resolve(Some(FILE), &[(ENV_CREDENTIALS_FILE, "/tmp/key.json")]).unwrap();
    assert_eq!(
        settings.credentials,
        Some(CredentialsSource::File("/tmp/key.json".into()))
    );
}

#[test]
fn unknown_platform_is_rejected() {
    let file = "[catalog]\nallowed_platforms = [\"dreamcast\"]\n";
    let err = resolve(Some(file), &[]).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid { ref key, .. } if key == "catalog.allowed_platforms"));
}

#[test]
fn unknown_key_is_a_parse_error() {
    let err = resolve(Some("[catalog]\nspeed = 3\n"), &[]).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn zero_page_limit_is_invalid() {
    let err = resolve(Some("[catalog]\npage_limit = 0\n"), &[]).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid { .. }));
}

#[test]
fn bad_boolean_env_is_invalid() {
    let err = resolve(None, &[(ENV_HEADLESS, "maybe")]).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid { .. }));
}

#[test]
fn missing_spreadsheet_and_credentials_are_reported() {
    let settings = resolve(None, &[]).unwrap();
    assert!(matches!(
        settings.spreadsheet_ref(),
        Err(SettingsError::Missing { what: "spreadsheet", .. })
    ));
    assert!(matches!(
        settings.service_account_key(),
        Err(SettingsError::Missing { .. })
    ));
}

#[test]
fn spreadsheet_url_becomes_id() {
    let settings = resolve(
        None,
        &[(ENV_SPREADSHEET, "https://docs.google.com/spreadsheets/d/abc123/edit#gid=0")],
    )
    .unwrap();
    assert_eq!(
        settings.spreadsheet_ref().unwrap(),
        SpreadsheetRef::Id("abc123".to_string())
    );
}

#[test]
fn key_file_is_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"client_email": "sync@demo.iam.gserviceaccount.com", "private_key": "pem"}}"#
    )
    .unwrap();

    let settings = Settings {
        credentials: Some(CredentialsSource::File(file.path().to_path_buf())),
        ..Settings::default()
    };
    let key = settings.service_account_key().unwrap();
    assert_eq!(key.client_email, "sync@demo.iam.gserviceaccount.com");
}

#[test]
fn malformed_key_json_is_a_credentials_error() {
    let settings = Settings {
        credentials: Some(CredentialsSource::Json("not json".to_string())),
        ..Settings::default()
    };
    assert!(matches!(
        settings.service_account_key(),
        Err(SettingsError::Credentials(_))
    ));
}
