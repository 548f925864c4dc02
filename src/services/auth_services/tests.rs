use super::*;
use crate::contracts::ssd_token::v1::token_type::TokenType;
use crate::testing::key_directory_context::KeyDirectoryContext;
use crate::testing::keys::{EC_PRIVATE, KEY_A_PRIVATE, KEY_A_PUBLIC, KEY_B_PUBLIC};
use crate::testing::mock_audit_service::MockAuditService;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use test_context::test_context;

fn make_settings(public_key_directory: &Path, signing_key: Option<&Path>) -> AuthSettings {
    let mut yaml = format!(
        "public_key_directory: {}\nadmin_groups: [admin]\n",
        public_key_directory.display()
    );
    if let Some(path) = signing_key {
        yaml.push_str(&format!("signing_key:\n  key_id: key-a\n  private_key_path: {}\n", path.display()));
    }
    AuthSettings::from_yaml(&yaml).unwrap()
}

#[test_context(KeyDirectoryContext)]
#[tokio::test]
async fn test_start_issue_and_verify(ctx: &mut KeyDirectoryContext) {
    ctx.write_key("key-a", KEY_A_PUBLIC);
    ctx.write_key("key-b", KEY_B_PUBLIC);
    let signing_directory = tempfile::tempdir().unwrap();
    let private_key_path = signing_directory.path().join("key-a.pem");
    std::fs::write(&private_key_path, KEY_A_PRIVATE).unwrap();
    let audit = Arc::new(MockAuditService::default());

    let services = AuthServices::start_with_audit(
        &make_settings(ctx.path(), Some(&private_key_path)),
        audit.clone(),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let issuer = services.issuer().unwrap();
    let token = issuer
        .mint_user_token("u1", "o1", vec!["admin".to_string()], Duration::from_secs(60))
        .unwrap();
    let envelope = services.verifier().verify_token(&token).unwrap();

    assert!(envelope.custom.is_admin);
    assert_eq!(services.key_store().key_ids(), vec!["key-a".to_string(), "key-b".to_string()]);
    assert_eq!(issuer.default_lifetime(TokenType::User), TokenLifetimes::default().user_session);
    assert_eq!(audit.count_issued(), 1);
    assert_eq!(audit.count_accepted(), 1);
    assert!(services.rotation().is_running());

    services.shutdown().await;
}

#[test_context(KeyDirectoryContext)]
#[tokio::test]
async fn test_start_without_signing_key(ctx: &mut KeyDirectoryContext) {
    ctx.write_key("key-a", KEY_A_PUBLIC);

    let services = AuthServices::start(&make_settings(ctx.path(), None), CancellationToken::new())
        .await
        .unwrap();

    assert!(services.issuer().is_none());
    assert_eq!(services.verifier().jwks().keys.len(), 1);
    services.shutdown().await;
}

#[tokio::test]
async fn test_start_fails_without_public_keys() {
    let settings = make_settings(Path::new("/definitely/not/a/key/directory"), None);

    assert!(AuthServices::start(&settings, CancellationToken::new()).await.is_err());
}

#[test_context(KeyDirectoryContext)]
#[tokio::test]
async fn test_start_fails_with_unusable_signing_key(ctx: &mut KeyDirectoryContext) {
    ctx.write_key("key-a", KEY_A_PUBLIC);
    let signing_directory = tempfile::tempdir().unwrap();
    let ec_key_path = signing_directory.path().join("ec.pem");
    std::fs::write(&ec_key_path, EC_PRIVATE).unwrap();

    let unusable = make_settings(ctx.path(), Some(&ec_key_path));
    let missing = make_settings(ctx.path(), Some(&signing_directory.path().join("missing.pem")));

    assert!(AuthServices::start(&unusable, CancellationToken::new()).await.is_err());
    assert!(AuthServices::start(&missing, CancellationToken::new()).await.is_err());
}

#[test_context(KeyDirectoryContext)]
#[tokio::test]
async fn test_cancellation_stops_rotation(ctx: &mut KeyDirectoryContext) {
    ctx.write_key("key-a", KEY_A_PUBLIC);
    let cancellation = CancellationToken::new();
    let services = AuthServices::start(&make_settings(ctx.path(), None), cancellation.clone())
        .await
        .unwrap();

    cancellation.cancel();
    tokio::time::timeout(Duration::from_secs(5), async {
        while services.rotation().is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    services.shutdown().await;
}
