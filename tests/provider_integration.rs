//! End-to-end tests for secret resolution
//!
//! These tests build a configuration with the `config` crate, resolve its
//! markers against a secret store and read the merged result back.

use async_trait::async_trait;
use config_secrets::secrets::{EnvVarSecretStore, InMemorySecretStore};
use config_secrets::{
    find_markers, ConfigSecretsError, ConfigTree, ProviderSettings, Result, SecretStore,
    SecretStoreType, SecretValue, SecretsConfigProvider, Settings,
};
use serde_json::json;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn base_config() -> config::Config {
    config::Config::builder()
        .set_default("somesettings.awssecret", "secretid")
        .unwrap()
        .set_default("somesettings.timeout", 30)
        .unwrap()
        .set_default("services.billing.api.awssecret", "billing-api")
        .unwrap()
        .set_default("services.billing.name", "billing")
        .unwrap()
        .build()
        .unwrap()
}

fn secrets() -> InMemorySecretStore {
    InMemorySecretStore::new()
        .with_json("secretid", &json!({"server": "localhost", "port": 3306}))
        .with_json("billing-api", &json!({"key": "k-123", "limits": {"rps": 50, "burst": 75.5}}))
}

#[tokio::test]
async fn test_resolve_and_merge_end_to_end() -> Result<()> {
    let base = base_config();
    let mut provider =
        SecretsConfigProvider::from_config(&base, Arc::new(secrets()), &ProviderSettings::default())?;

    provider.load().await?;

    assert_eq!(
        provider.iter().collect::<Vec<_>>(),
        vec![
            ("somesettings:server", "localhost"),
            ("somesettings:port", "3306"),
            ("services:billing:api:key", "k-123"),
            ("services:billing:api:limits:rps", "50"),
            ("services:billing:api:limits:burst", "75.5"),
        ]
    );

    let merged = provider.merge_into(base)?;
    assert_eq!(merged.get_string("somesettings.server")?, "localhost");
    assert_eq!(merged.get_int("somesettings.port")?, 3306);
    assert_eq!(merged.get_int("somesettings.timeout")?, 30);
    assert_eq!(merged.get_float("services.billing.api.limits.burst")?, 75.5);
    assert_eq!(merged.get_string("services.billing.name")?, "billing");

    Ok(())
}

#[tokio::test]
async fn test_nested_marker_parent_path() -> Result<()> {
    let tree = ConfigTree::from_pairs(":", [("a:b:c:AwsSecret", "deep")]);
    let store = InMemorySecretStore::new().with_json("deep", &json!({"x": true}));

    let markers = find_markers(&tree, "AwsSecret")?;
    assert_eq!(markers[0].parent_path, "a:b:c");

    let mut provider =
        SecretsConfigProvider::with_store(tree, Arc::new(store), &ProviderSettings::default())?;
    provider.load().await?;
    assert_eq!(provider.get("a:b:c:x"), Some("true"));

    Ok(())
}

#[tokio::test]
async fn test_custom_marker_key_and_delimiter() -> Result<()> {
    let settings = ProviderSettings {
        marker_key: "VaultRef".to_string(),
        key_delimiter: "__".to_string(),
        ..Default::default()
    };
    let tree = ConfigTree::from_pairs("__", [("db__vaultref", "creds"), ("db__AwsSecret", "ignored")]);
    let store = InMemorySecretStore::new().with_json("creds", &json!({"user": "app"}));

    let mut provider = SecretsConfigProvider::with_store(tree, Arc::new(store), &settings)?;
    provider.load().await?;

    assert_eq!(provider.iter().collect::<Vec<_>>(), vec![("db__user", "app")]);
    Ok(())
}

/// Store that can be switched off between loads
#[derive(Debug)]
struct SwitchableStore {
    inner: InMemorySecretStore,
    available: AtomicBool,
}

#[async_trait]
impl SecretStore for SwitchableStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(ConfigSecretsError::store_unavailable("in_memory", "switched off"));
        }
        self.inner.get_secret_value(secret_id).await
    }

    fn store_type(&self) -> SecretStoreType {
        SecretStoreType::InMemory
    }
}

#[tokio::test]
async fn test_failed_reload_clears_previous_overrides() {
    let tree = ConfigTree::from_pairs(":", [("db:AwsSecret", "creds")]);
    let store = Arc::new(SwitchableStore {
        inner: InMemorySecretStore::new().with_json("creds", &json!({"user": "app"})),
        available: AtomicBool::new(true),
    });

    let mut provider =
        SecretsConfigProvider::with_store(tree, store.clone(), &ProviderSettings::default())
            .unwrap();
    provider.load().await.unwrap();
    assert_eq!(provider.get("db:user"), Some("app"));

    store.available.store(false, Ordering::SeqCst);
    let err = provider.load().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(provider.is_empty());

    store.available.store(true, Ordering::SeqCst);
    provider.load().await.unwrap();
    assert_eq!(provider.len(), 1);
}

#[tokio::test]
async fn test_env_store_end_to_end() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    env::set_var("CONFIG_SECRETS_SECRET_ORDERS_DB", r#"{"user":"orders","password":"pw"}"#);

    let mut settings = Settings::default();
    settings.provider.store = SecretStoreType::Env;

    let base = config::Config::builder()
        .set_default("orders.awssecret", "orders/db")
        .unwrap()
        .build()?;

    let mut provider = SecretsConfigProvider::from_settings(&base, &settings).await?;
    provider.load().await?;

    env::remove_var("CONFIG_SECRETS_SECRET_ORDERS_DB");

    assert_eq!(provider.get("orders:user"), Some("orders"));
    assert_eq!(provider.get("orders:password"), Some("pw"));
    assert_eq!(
        provider.data().paths().collect::<Vec<_>>(),
        vec!["orders:user", "orders:password"]
    );

    let direct = EnvVarSecretStore::new();
    assert_eq!(direct.env_var_name("orders/db"), "CONFIG_SECRETS_SECRET_ORDERS_DB");

    Ok(())
}

#[tokio::test]
async fn test_array_valued_secret_reads_back_as_array() -> Result<()> {
    let base = config::Config::builder().set_default("svc.awssecret", "hosts")?.build()?;
    let store = InMemorySecretStore::new().with_json("hosts", &json!({"hosts": ["a", "b"]}));

    let mut provider =
        SecretsConfigProvider::from_config(&base, Arc::new(store), &ProviderSettings::default())?;
    provider.load().await?;
    let merged = provider.merge_into(base)?;

    let hosts: Vec<String> = merged.get("svc.hosts")?;
    assert_eq!(hosts, vec!["a", "b"]);
    Ok(())
}

#[tokio::test]
async fn test_merge_rejects_secret_key_containing_dot() -> Result<()> {
    let base = config::Config::builder().set_default("x.awssecret", "dotted")?.build()?;
    let store = InMemorySecretStore::new().with_json("dotted", &json!({"a.b": 1}));

    let mut provider =
        SecretsConfigProvider::from_config(&base, Arc::new(store), &ProviderSettings::default())?;
    provider.load().await?;
    assert_eq!(provider.get("x:a.b"), Some("1"));

    let err = provider.merge_into(base).unwrap_err();
    assert!(matches!(err, ConfigSecretsError::Config { .. }));
    Ok(())
}
