//! HTTP-level tests for the LDAP settings plugin adapter.

use std::time::Duration;

use artisync_client::{ClientConfig, HttpTransport, LdapSettingsAdapter};
use artisync_reconcile::{IdentityKey, Record, Reconciler, RemoteResourceAdapter};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter(base_url: &str) -> LdapSettingsAdapter {
    let config = ClientConfig::new(base_url, "ApiKey", "key-123", false, Duration::from_secs(5))
        .unwrap();
    LdapSettingsAdapter::new(HttpTransport::new(&config).unwrap())
}

async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.unwrap()
}

async fn mount_setting(server: &MockServer, key: &str, url: &str) {
    Mock::given(method("GET"))
        .and(path("/artifactory/api/plugins/execute/getLdapSetting"))
        .and(query_param("params", format!("key={key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": key,
            "enabled": true,
            "ldapUrl": url
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_fetches_each_setting_with_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifactory/api/plugins/execute/getLdapSettingsList"))
        .and(header("x-jfrog-art-api", "key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["corp", {"key": "partner"}])))
        .expect(1)
        .mount(&server)
        .await;
    mount_setting(&server, "corp", "ldap://corp.example.com").await;
    mount_setting(&server, "partner", "ldap://partner.example.com").await;

    let uri = server.uri();
    let records = blocking(move || adapter(&uri).list_actual()).await.unwrap();

    let keys: Vec<_> = records
        .iter()
        .map(|r| r.get("key").cloned().unwrap())
        .collect();
    assert_eq!(keys, vec![json!("corp"), json!("partner")]);
    assert_eq!(
        records[1].get("ldapUrl"),
        Some(&json!("ldap://partner.example.com"))
    );
}

#[tokio::test]
async fn present_creates_and_updates_through_plugin_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifactory/api/plugins/execute/getLdapSettingsList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["corp"])))
        .mount(&server)
        .await;
    mount_setting(&server, "corp", "ldap://old.example.com").await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/plugins/execute/addLdapSetting"))
        .and(body_partial_json(json!({"key": "partner"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/artifactory/api/plugins/execute/updateLdapSetting"))
        .and(query_param("params", "key=corp"))
        .and(body_partial_json(json!({"key": "corp", "enabled": true, "ldapUrl": "ldap://new.example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let report = blocking(move || {
        let desired = Record::from_values(vec![
            json!({"key": "corp", "ldapUrl": "ldap://new.example.com"}),
            json!({"key": "partner", "ldapUrl": "ldap://partner.example.com"}),
        ])
        .unwrap();
        Reconciler::new(adapter(&uri)).present(&desired, false)
    })
    .await
    .unwrap();

    assert_eq!(report.counts.added, 1);
    assert_eq!(report.counts.updated, 1);
    assert_eq!(
        report.message,
        "1 LDAP settings were added\n1 LDAP settings were updated\n0 LDAP settings were deleted"
    );
}

#[tokio::test]
async fn delete_passes_key_as_plugin_param() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/artifactory/api/plugins/execute/deleteLdapSetting"))
        .and(query_param("params", "key=corp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    blocking(move || {
        let adapter = adapter(&uri);
        adapter.delete(&IdentityKey::single("corp"), true)?;
        adapter.delete(&IdentityKey::single("corp"), false)
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn missing_plugin_surfaces_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/artifactory/api/plugins/execute/getLdapSettingsList"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": 404, "message": "Plugin 'getLdapSettingsList' not found"}]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || adapter(&uri).list_actual())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Querying LDAP settings failed with status 404: Plugin 'getLdapSettingsList' not found"
    );
}
