//! Unit tests for token configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

#[derive(Debug)]
struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(contents: &[u8]) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("token-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, contents)?;
        Ok(Self { path })
    }

    fn path_str(&self) -> &str {
        self.path
            .to_str()
            .expect("temporary path should be valid UTF-8")
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn expect_error(result: Result<TokenSettings, TokenConfigError>, label: &str) -> TokenConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_requires_a_secret() {
    let env = mock_env(&[]);
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected missing secret to fail",
    );
    assert!(matches!(err, TokenConfigError::MissingSecret));
}

#[rstest]
fn debug_generates_an_ephemeral_secret() {
    let env = mock_env(&[]);
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.signing_key.len(), 64);
    assert!(!settings.cookie.secure);
}

#[rstest]
fn release_rejects_short_secrets() {
    let env = mock_env(&[(SECRET_ENV, "short")]);
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected short secret to fail",
    );
    assert!(matches!(
        err,
        TokenConfigError::SecretTooShort {
            length: 5,
            min_len: SECRET_MIN_LEN
        }
    ));
}

#[rstest]
fn release_defaults_to_thirty_days_and_secure_cookies() {
    let env = mock_env(&[(SECRET_ENV, SECRET)]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("release settings");
    assert_eq!(settings.token_lifetime, Duration::days(DEFAULT_EXPIRE_DAYS));
    assert_eq!(settings.cookie, TokenCookieSettings::default());
}

#[rstest]
fn lifetimes_are_read_in_days() {
    let env = mock_env(&[
        (SECRET_ENV, SECRET),
        (TOKEN_DAYS_ENV, "7"),
        (COOKIE_DAYS_ENV, "1"),
        (COOKIE_SECURE_ENV, "no"),
    ]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("release settings");
    assert_eq!(settings.token_lifetime, Duration::days(7));
    assert_eq!(settings.cookie.max_age, Duration::days(1));
    assert!(!settings.cookie.secure);
}

#[rstest]
#[case(TOKEN_DAYS_ENV, "soon")]
#[case(COOKIE_DAYS_ENV, "0")]
#[case(COOKIE_SECURE_ENV, "maybe")]
fn release_rejects_invalid_values(#[case] name: &'static str, #[case] value: &str) {
    let env = mock_env(&[(SECRET_ENV, SECRET), (name, value)]);
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Release),
        "expected invalid value to fail",
    );
    match err {
        TokenConfigError::InvalidEnv {
            name: reported,
            value: raw,
            ..
        } => {
            assert_eq!(reported, name);
            assert_eq!(raw, value);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case(TOKEN_DAYS_ENV, "-3")]
#[case(COOKIE_SECURE_ENV, "maybe")]
fn debug_falls_back_on_invalid_values(#[case] name: &'static str, #[case] value: &str) {
    let env = mock_env(&[(SECRET_ENV, SECRET), (name, value)]);
    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.token_lifetime, Duration::days(DEFAULT_EXPIRE_DAYS));
    assert!(!settings.cookie.secure);
}

#[rstest]
fn secret_file_is_read_without_trailing_newline() {
    let file = TempSecretFile::new(format!("{SECRET}\n").as_bytes())
        .expect("secret file creation should succeed");
    let env = mock_env(&[(SECRET_FILE_ENV, file.path_str())]);
    let settings = token_settings_from_env(&env, BuildMode::Release).expect("release settings");
    assert_eq!(settings.signing_key.len(), SECRET.len());
}

#[rstest]
fn unreadable_secret_file_is_reported() {
    let missing = std::env::temp_dir().join(format!("token-secret-missing-{}", Uuid::new_v4()));
    let path = missing.to_str().expect("valid UTF-8 path").to_owned();
    let env = mock_env(&[(SECRET_FILE_ENV, path.as_str())]);
    let err = expect_error(
        token_settings_from_env(&env, BuildMode::Debug),
        "expected unreadable file to fail",
    );
    assert!(matches!(err, TokenConfigError::SecretRead { .. }));
}
