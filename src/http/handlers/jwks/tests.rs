use super::*;
use crate::contracts::jwks::JwkSet;
use crate::testing::keys::{KEY_B_PUBLIC, pem_map};
use crate::testing::token_fixtures::make_verifier;
use actix_web::{App, test, web};
use pretty_assertions::assert_eq;

#[actix_web::test]
async fn test_jwks_serves_trusted_keys() {
    let verifier = make_verifier();
    let app = test::init_service(
        App::new()
            .app_data(Data::from(verifier.clone()))
            .route("/jwks", web::get().to(jwks)),
    )
    .await;

    let req = test::TestRequest::get().uri("/jwks").to_request();
    let key_set: JwkSet = test::call_and_read_body_json(&app, req).await;

    let key_ids: Vec<&str> = key_set.keys.iter().map(|key| key.kid.as_str()).collect();
    assert_eq!(key_ids, vec!["key-a", "key-b"]);
    assert!(key_set.keys.iter().all(|key| key.kty == "RSA" && key.alg == "RS256" && key.key_use == "sig"));

    verifier.set_keys(&pem_map(&[("key-b", KEY_B_PUBLIC)])).unwrap();
    let req = test::TestRequest::get().uri("/jwks").to_request();
    let key_set: JwkSet = test::call_and_read_body_json(&app, req).await;

    assert_eq!(key_set.keys.len(), 1);
    assert!(key_set.find("key-b").is_some());
}
