//! Session token verification integration tests
//!
//! Tokens are signed here exactly as the platform signs them, then run
//! through the public verifier API. Each failure case breaks one property of
//! an otherwise valid token.

use appkit_auth::{offline_session_id, AuthConfig, InvalidTokenError, NumericDate, SessionClaims};
use chrono::Utc;
use jsonwebtoken::Algorithm;
use serde_json::json;

use crate::common::{
    encode_segment, replace_segment, session_claims, sign_token, TestApp,
};

const SHOP: &str = "test-shop.myshopify.io";

fn assert_rejected(result: Result<SessionClaims, InvalidTokenError>, message: &str) {
    match result {
        Ok(claims) => panic!("Expected rejection '{}', got claims {:?}", message, claims),
        Err(error) => {
            assert_eq!(error.message(), message);
            assert_eq!(error.error_code(), "INVALID_TOKEN");
        }
    }
}

mod test_valid_tokens {
    use super::*;

    #[test_log::test]
    fn test_valid_token_is_returned_unchanged() {
        let app = TestApp::new().unwrap();
        let claims = session_claims(&app, SHOP);
        let token = app.sign(&claims).unwrap();

        let result = app.verifier.verify(&token);
        assert!(result.is_ok(), "Verification failed: {:?}", result.err());
        assert_eq!(result.unwrap(), claims);
    }

    #[test]
    fn test_fractional_timestamps_are_returned_unchanged() {
        let app = TestApp::new().unwrap();
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        let mut claims = session_claims(&app, SHOP);
        claims.expires_at = NumericDate::from_secs_f64(now + 3600.25).unwrap();
        claims.not_before = NumericDate::from_secs_f64(now - 10.75).unwrap();
        claims.issued_at = NumericDate::from_secs_f64(now).unwrap();
        let token = app.sign(&claims).unwrap();

        let verified = app.verifier.verify(&token).unwrap();
        assert_eq!(verified, claims);
        assert_eq!(
            serde_json::to_value(&verified).unwrap(),
            serde_json::to_value(&claims).unwrap()
        );
    }

    #[test]
    fn test_session_ids_from_verified_claims() {
        let app = TestApp::new().unwrap();
        let mut claims = session_claims(&app, SHOP);
        claims.destination = format!("https://{}", SHOP);
        let token = app.sign(&claims).unwrap();

        let verified = app.verifier.verify(&token).unwrap();
        assert_eq!(verified.shop(), SHOP);
        assert_eq!(verified.online_session_id(), "test-shop.myshopify.io_1");
        assert_eq!(
            offline_session_id(verified.shop()),
            "offline_test-shop.myshopify.io"
        );
    }

    #[test]
    fn test_verifier_built_from_process_config() {
        let app = TestApp::new().unwrap();
        let process = appkit_common::Config {
            api_key: app.config.api_key.clone(),
            api_secret_key: app.config.api_secret_key.clone(),
            custom_shop_domains: vec!["shops.example.com".to_string()],
            session_token_leeway_secs: 0,
            rust_log: "appkit=debug".to_string(),
            log_format: appkit_common::LogFormat::Pretty,
        };
        let verifier = app.verifier_with(AuthConfig::from(&process)).unwrap();

        let claims = session_claims(&app, "acme.shops.example.com");
        let token = app.sign(&claims).unwrap();
        assert_eq!(verifier.verify(&token).unwrap(), claims);
        assert!(app.verifier.verify(&token).is_err());
    }
}

mod test_invalid_tokens {
    use super::*;

    #[test]
    fn test_garbage_token() {
        let app = TestApp::new().unwrap();
        assert_rejected(
            app.verifier.verify("not_a_valid_token"),
            "Session token is malformed",
        );
    }

    #[test]
    fn test_header_that_is_not_json() {
        let app = TestApp::new().unwrap();
        let token = app.sign(&session_claims(&app, SHOP)).unwrap();

        let token = replace_segment(&token, 0, "bm90LWpzb24");
        assert_rejected(app.verifier.verify(&token), "Session token is malformed");
    }

    #[test_log::test]
    fn test_token_signed_with_other_secret() {
        let app = TestApp::new().unwrap();
        let token = sign_token(
            &session_claims(&app, SHOP),
            "not-the-app-secret",
            Algorithm::HS256,
        )
        .unwrap();

        assert_rejected(
            app.verifier.verify(&token),
            "Session token signature is invalid",
        );
    }

    #[test]
    fn test_modified_payload_keeps_old_signature() {
        let app = TestApp::new().unwrap();
        let claims = session_claims(&app, SHOP);
        let token = app.sign(&claims).unwrap();

        let mut escalated = serde_json::to_value(&claims).unwrap();
        escalated["sub"] = json!("999");
        let token = replace_segment(&token, 1, &encode_segment(&escalated));

        assert_rejected(
            app.verifier.verify(&token),
            "Session token signature is invalid",
        );
    }

    #[test]
    fn test_algorithm_substitution() {
        let app = TestApp::new().unwrap();
        let claims = session_claims(&app, SHOP);

        let token = sign_token(&claims, &app.config.api_secret_key, Algorithm::HS384).unwrap();
        assert_rejected(
            app.verifier.verify(&token),
            "Session token uses unsupported algorithm",
        );

        let token = app.sign(&claims).unwrap();
        let unsigned = replace_segment(
            &replace_segment(&token, 0, &encode_segment(&json!({"alg": "none", "typ": "JWT"}))),
            2,
            "",
        );
        assert_rejected(
            app.verifier.verify(&unsigned),
            "Session token uses unsupported algorithm",
        );
    }

    #[test]
    fn test_expired_token() {
        let app = TestApp::new().unwrap();
        let mut claims = session_claims(&app, SHOP);
        claims.expires_at = (Utc::now().timestamp() - 60).into();
        let token = app.sign(&claims).unwrap();

        assert_rejected(app.verifier.verify(&token), "Session token has expired");
    }

    #[test]
    fn test_token_not_activated_yet() {
        let app = TestApp::new().unwrap();
        let mut claims = session_claims(&app, SHOP);
        claims.not_before = (Utc::now().timestamp() + 60).into();
        let token = app.sign(&claims).unwrap();

        assert_rejected(
            app.verifier.verify(&token),
            "Session token is not active yet",
        );
    }

    #[test]
    fn test_clock_skew_within_leeway() {
        let app = TestApp::new().unwrap();
        let lenient = app
            .verifier_with(app.config.auth_config().with_leeway(120))
            .unwrap();

        let mut claims = session_claims(&app, SHOP);
        claims.not_before = (Utc::now().timestamp() + 60).into();
        let token = app.sign(&claims).unwrap();

        assert!(app.verifier.verify(&token).is_err());
        assert_eq!(lenient.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_api_key_changed_after_signing() {
        let app = TestApp::new().unwrap();
        let token = app.sign(&session_claims(&app, SHOP)).unwrap();

        let rotated = app
            .verifier_with(AuthConfig::new(
                "something_else",
                app.config.api_secret_key.clone(),
            ))
            .unwrap();

        assert_rejected(rotated.verify(&token), "Session token had invalid API key");
    }

    #[test]
    fn test_invalid_destination_domain() {
        let app = TestApp::new().unwrap();
        let mut claims = session_claims(&app, SHOP);
        claims.destination = "https://not-a-domain".to_string();
        let token = app.sign(&claims).unwrap();

        assert_rejected(app.verifier.verify(&token), "Session token had invalid shop");
    }

    #[test]
    fn test_issuer_from_another_shop() {
        let app = TestApp::new().unwrap();
        let mut claims = session_claims(&app, SHOP);
        claims.issuer = "evil-shop.myshopify.io/admin".to_string();
        let token = app.sign(&claims).unwrap();

        assert_rejected(
            app.verifier.verify(&token),
            "Session token issuer does not match destination",
        );
    }

    #[test]
    fn test_missing_session_id() {
        let app = TestApp::new().unwrap();
        let mut payload = serde_json::to_value(session_claims(&app, SHOP)).unwrap();
        payload.as_object_mut().unwrap().remove("sid");
        let token = app.sign(&payload).unwrap();

        assert_rejected(
            app.verifier.verify(&token),
            "Session token has invalid claims",
        );
    }
}

mod common;
