//! End-to-end verification of signed requests.

mod common;

use std::sync::Arc;

use chrono::Utc;
use common::{NOW, at, consumer, validator, without_param};
use oauth1_auth::header::REQUIRED_PARAMS;
use oauth1_auth::{
    ApiRequest, AuthError, RejectReason, RequestParams, Validator, Verdict, sign_request,
};
use oauth1_core::{ActorCredential, ConsumerStore};

const URL: &str = "http://example.com/api";

fn sign(request: &ApiRequest, timestamp: i64, nonce: &str) -> String {
    sign_with(request, &ActorCredential::anonymous(), timestamp, nonce)
}

fn sign_with(request: &ApiRequest, actor: &ActorCredential, timestamp: i64, nonce: &str) -> String {
    sign_request(request, &consumer(), actor, &timestamp.to_string(), nonce).unwrap()
}

/// Verify `header` with the server clock `offset` seconds after `NOW`.
fn verdict(validator: &Validator, header: &str, request: &ApiRequest, offset: i64) -> Verdict {
    validator.verify_at(header, request, at(offset)).unwrap()
}

fn mismatch() -> Verdict {
    Verdict::Rejected(RejectReason::SignatureMismatch)
}

#[test]
fn test_should_accept_request_signed_now() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "foo=bar");
    let header = sign(&request, Utc::now().timestamp(), "n-1");

    let valid = validator.validate(&header, "GET", URL, "foo=bar", false);
    assert!(valid.unwrap());
}

#[test]
fn test_should_match_known_header_for_fixed_inputs() {
    let request = ApiRequest::new("GET", URL, "foo=bar");
    let header = sign(&request, NOW, "abc123");

    assert_eq!(
        header,
        "OAuth oauth_consumer_key=\"ck\", oauth_nonce=\"abc123\", \
         oauth_signature=\"%2FUQ5jaomwxX8ifdmFPg0tD75fJU%3D\", \
         oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", \
         oauth_version=\"1.0\""
    );

    let validator = validator();
    assert!(verdict(&validator, &header, &request, 0).is_accepted());

    let tampered = ApiRequest::new("GET", URL, "foo=baz");
    assert_eq!(verdict(&validator, &header, &tampered, 0), mismatch());
}

#[test]
fn test_should_reject_any_tampering() {
    let validator = validator();
    let body = "status=Hello%20World&count=5";
    let request = ApiRequest::new("POST", URL, body);
    let header = sign(&request, NOW, "abc123");
    assert!(verdict(&validator, &header, &request, 0).is_accepted());

    let other_nonce = header.replace("abc123", "abc124");
    assert_eq!(verdict(&validator, &other_nonce, &request, 0), mismatch());

    let changed_requests = [
        ApiRequest::new("PUT", URL, body),
        ApiRequest::new("POST", "http://example.com/api2", body),
        ApiRequest::new("POST", URL, "status=Hello%20World&count=6"),
        ApiRequest::new("POST", URL, "status=Hello%20World&count=5&x=1"),
    ];
    for changed in &changed_requests {
        assert_eq!(verdict(&validator, &header, changed, 0), mismatch());
    }
}

#[test]
fn test_should_reject_flipped_signature_character() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "foo=bar");
    let header = sign(&request, NOW, "abc123");
    let flipped = header.replace("%2FUQ5", "%2FUQ6");

    assert_ne!(header, flipped);
    assert_eq!(verdict(&validator, &flipped, &request, 0), mismatch());
}

#[test]
fn test_should_enforce_clock_skew_boundary() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "");
    let header = sign(&request, NOW, "abc123");

    for offset in [-180, 0, 180] {
        assert!(
            verdict(&validator, &header, &request, offset).is_accepted(),
            "offset {offset} should be accepted"
        );
    }
    for offset in [-181, 181] {
        assert_eq!(
            verdict(&validator, &header, &request, offset),
            Verdict::Rejected(RejectReason::ClockSkew { difference: 181 })
        );
    }
}

#[test]
fn test_should_name_each_missing_required_param() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "");
    let header = sign(&request, NOW, "abc123");

    for name in REQUIRED_PARAMS {
        let stripped = without_param(&header, name);
        assert_eq!(
            verdict(&validator, &stripped, &request, 0),
            Verdict::Rejected(RejectReason::MissingParam(name)),
            "removing {name}"
        );
    }
}

#[test]
fn test_should_reject_non_oauth_scheme() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "");

    for header in ["", "Bearer token", "oauth oauth_consumer_key=\"ck\""] {
        assert_eq!(
            verdict(&validator, header, &request, 0),
            Verdict::Rejected(RejectReason::NotOAuth)
        );
    }
}

#[test]
fn test_should_reject_non_canonical_header() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "");
    let header = sign(&request, NOW, "abc123");
    let with_realm = header.replacen("OAuth ", "OAuth realm=\"api\", ", 1);

    assert_eq!(verdict(&validator, &with_realm, &request, 0), mismatch());
}

#[test]
fn test_should_exclude_multipart_body_from_non_get_signature() {
    let validator = validator();
    let body = "file=binary-content&name=avatar";
    let header = sign(&ApiRequest::new("POST", URL, ""), NOW, "abc123");

    let upload = ApiRequest::new("POST", URL, body).with_multipart(true);
    assert!(verdict(&validator, &header, &upload, 0).is_accepted());

    let form = ApiRequest::new("POST", URL, body);
    assert_eq!(verdict(&validator, &header, &form, 0), mismatch());
}

#[test]
fn test_should_keep_params_for_multipart_get() {
    let validator = validator();
    let request = ApiRequest::new("GET", URL, "q=1").with_multipart(true);
    let signed_without = sign(&ApiRequest::new("GET", URL, ""), NOW, "abc123");
    let signed_with = sign(&ApiRequest::new("GET", URL, "q=1"), NOW, "abc123");

    let without = verdict(&validator, &signed_without, &request, 0);
    assert!(!without.is_accepted());
    assert!(verdict(&validator, &signed_with, &request, 0).is_accepted());
}

#[test]
fn test_should_treat_query_string_and_structured_params_alike() {
    let validator = validator();
    let json = r#"{"count": 5, "flag": true, "ids": [1, 2], "status": "Hello World"}"#;
    let structured: RequestParams = serde_json::from_str(json).unwrap();
    let header = sign(&ApiRequest::new("POST", URL, structured), NOW, "abc123");

    let query = "status=Hello+World&count=5&flag=true&ids[]=1&ids[]=2";
    let query_request = ApiRequest::new("POST", URL, query);
    let result = verdict(&validator, &header, &query_request, 0);
    assert!(result.is_accepted());
}

#[test]
fn test_should_round_trip_reserved_and_multibyte_values() {
    let validator = validator();
    let params: RequestParams = [
        ("text", "a b&c=d/e?f"),
        ("emoji", "caf\u{e9} \u{2603}"),
        ("tilde", "~user"),
    ]
    .into_iter()
    .collect();
    let request = ApiRequest::new("GET", "https://example.com/path?x=y", params);
    let header = sign(&request, NOW, "abc123");

    assert!(verdict(&validator, &header, &request, 0).is_accepted());
}

#[test]
fn test_should_require_matching_token_and_secret() {
    let actor = ActorCredential::new("tok", "ts");
    let validator = validator().with_actor(actor.clone());
    let request = ApiRequest::new("GET", URL, "");

    let good = sign_with(&request, &actor, NOW, "abc123");
    assert!(good.contains("oauth_token=\"tok\""));
    assert!(verdict(&validator, &good, &request, 0).is_accepted());

    let other_token = ActorCredential::new("other", "ts");
    let foreign = sign_with(&request, &other_token, NOW, "abc123");
    assert_eq!(verdict(&validator, &foreign, &request, 0), mismatch());

    let anonymous = sign(&request, NOW, "abc123");
    assert!(!verdict(&validator, &anonymous, &request, 0).is_accepted());
}

#[test]
fn test_should_error_without_consumer_credential() {
    let validator = Validator::new(Arc::new(ConsumerStore::new()));
    let request = ApiRequest::new("GET", URL, "");

    let fixed = sign(&request, NOW, "abc123");
    let result = validator.verify_at(&fixed, &request, at(0));
    assert!(matches!(result, Err(AuthError::MissingCredential)));

    let live = sign(&request, Utc::now().timestamp(), "abc123");
    let result = validator.validate(&live, "GET", URL, "", false);
    assert!(matches!(result, Err(AuthError::MissingCredential)));
}

#[test]
fn test_should_check_clock_before_requiring_consumer_credential() {
    let validator = Validator::new(Arc::new(ConsumerStore::new()));
    let request = ApiRequest::new("GET", URL, "");
    let stale = sign(&request, NOW, "abc123");

    let result = validator.validate(&stale, "GET", URL, "", false);
    assert!(matches!(result, Ok(false)));
}

#[test]
fn test_should_accept_lowercase_method_for_same_request() {
    let validator = validator();
    let header = sign(&ApiRequest::new("POST", URL, "a=1"), NOW, "abc123");
    let lowercase = ApiRequest::new("post", URL, "a=1");

    assert!(verdict(&validator, &header, &lowercase, 0).is_accepted());
}
