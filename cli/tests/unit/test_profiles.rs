//! Profile store persistence and config resolution

use coolifyme::config::{resolve, EnvVars, Overrides};
use coolifyme::errors::ClientError;
use coolifyme::filesys::file::File;
use coolifyme::output::OutputFormat;
use coolifyme::storage::ProfileStore;
use secrecy::ExposeSecret;

fn store_in(dir: &tempfile::TempDir) -> ProfileStore {
    ProfileStore::new(File::new(dir.path().join("nested").join("config.yaml")))
}

#[tokio::test]
async fn test_missing_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(matches!(store.load().await, Err(ClientError::NotFound(_))));
    let doc = store.load_or_default().await.unwrap();
    assert!(doc.profiles.is_empty());
    assert!(doc.default_profile.is_none());
}

#[tokio::test]
async fn test_profiles_survive_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store
        .create_profile("default", "T0", Some("https://coolify.example.com/api/v1/"))
        .await
        .unwrap();
    store.create_profile("staging", "T1", None).await.unwrap();
    store.set_default_profile("staging").await.unwrap();
    store
        .update(|doc| {
            doc.global_settings.output_format = Some(OutputFormat::Yaml);
            Ok(())
        })
        .await
        .unwrap();

    let reopened = store_in(&dir);
    let doc = reopened.load().await.unwrap();
    assert_eq!(doc.default_profile.as_deref(), Some("staging"));
    assert_eq!(
        doc.profile("default").map(|p| p.base_url.as_str()),
        Some("https://coolify.example.com/api/v1")
    );
    assert_eq!(
        doc.profile("staging").map(|p| p.base_url.as_str()),
        Some("https://app.coolify.io/api/v1")
    );
    assert_eq!(doc.global_settings.output_format, Some(OutputFormat::Yaml));

    let (profiles, default) = reopened.list_profiles().await.unwrap();
    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["default", "staging"]);
    assert_eq!(default.as_deref(), Some("staging"));
}

#[tokio::test]
async fn test_deleting_default_promotes_reserved_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.create_profile("prod", "T1", None).await.unwrap();
    store.create_profile("default", "T0", None).await.unwrap();
    assert_eq!(
        store.load().await.unwrap().default_profile.as_deref(),
        Some("prod")
    );

    store.delete_profile("prod").await.unwrap();
    assert_eq!(
        store.load().await.unwrap().default_profile.as_deref(),
        Some("default")
    );

    let err = store.delete_profile("default").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert!(store.load().await.unwrap().profile("default").is_some());
}

#[tokio::test]
async fn test_failed_change_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.create_profile("prod", "T1", None).await.unwrap();

    let err = store.create_profile("prod", "T2", None).await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadyExists(_)));
    let doc = store.load().await.unwrap();
    assert_eq!(doc.profile("prod").map(|p| p.api_token.as_str()), Some("T1"));
}

#[tokio::test]
async fn test_corrupt_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "profiles: [not, a, map").unwrap();

    let store = ProfileStore::new(File::new(&path));
    assert!(matches!(store.load().await, Err(ClientError::Config(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_store_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.create_profile("prod", "T1", None).await.unwrap();

    let mode = std::fs::metadata(store.file().path())
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn test_resolution_from_a_saved_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store
        .create_profile("prod", "T1", Some("https://prod.example.com/api/v1"))
        .await
        .unwrap();
    let doc = store.load().await.unwrap();

    let cfg = resolve(Some(&doc), &EnvVars::default(), &Overrides::default()).unwrap();
    assert_eq!(cfg.profile_name, "prod");
    assert_eq!(cfg.base_url, "https://prod.example.com/api/v1");
    assert_eq!(cfg.require_token().unwrap().expose_secret(), "T1");

    let env = EnvVars::from_pairs([("COOLIFY_URL", "https://env.example.com/api/v1/")]);
    let overrides = Overrides {
        api_token: Some("T9".into()),
        ..Default::default()
    };
    let cfg = resolve(Some(&doc), &env, &overrides).unwrap();
    assert_eq!(cfg.base_url, "https://env.example.com/api/v1");
    assert_eq!(cfg.require_token().unwrap().expose_secret(), "T9");
}
