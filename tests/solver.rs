mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use websupport_solver::config::ApiSettings;
use websupport_solver::dns::DnsError;
use websupport_solver::secrets::CredentialStore;
use websupport_solver::solver::{ChallengeRequest, Solver, SolverConfig, WebsupportSolver};

use common::*;

const FQDN: &str = "_acme-challenge.example.com.";

fn solver(server: &MockServer) -> WebsupportSolver {
    let api = ApiSettings {
        base_url: base_url(server),
        timeout_seconds: 10,
        ttl: 600,
    };
    WebsupportSolver::new(
        "websupport-solver",
        api,
        CredentialStore::new("/nonexistent/credentials.toml"),
    )
}

fn challenge(key: &str) -> ChallengeRequest {
    ChallengeRequest {
        resolved_fqdn: FQDN.to_string(),
        key: key.to_string(),
        config: SolverConfig {
            api_key: API_KEY.to_string(),
            api_secret: API_SECRET.to_string(),
            ..SolverConfig::default()
        },
    }
}

fn create_body(key: &str) -> serde_json::Value {
    json!({ "type": "TXT", "name": "_acme-challenge", "content": key, "ttl": 600 })
}

#[tokio::test]
async fn test_present_creates_txt_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .and(body_json(create_body("AAA")))
        .and(SignedRequest)
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    solver(&server).present(&challenge("AAA")).await.unwrap();
}

#[tokio::test]
async fn test_present_twice_tolerates_duplicate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(rejection("Record already exists")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![txt(5, "_acme-challenge", "AAA")])),
        )
        .mount(&server)
        .await;

    let solver = solver(&server);
    solver.present(&challenge("AAA")).await.unwrap();
    solver.present(&challenge("AAA")).await.unwrap();
}

#[tokio::test]
async fn test_present_surfaces_unrelated_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(rejection("Invalid record name")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![txt(5, "_acme-challenge", "BBB")])),
        )
        .mount(&server)
        .await;

    let err = solver(&server).present(&challenge("AAA")).await.unwrap_err();
    match err.downcast_ref::<DnsError>() {
        Some(DnsError::Provider(provider)) => {
            assert_eq!(provider.to_string(), "Invalid record name");
        }
        other => panic!("expected Provider, got {:?}", other),
    }
}

#[tokio::test]
async fn test_present_propagates_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let api = ApiSettings {
        base_url: format!("http://127.0.0.1:{}/v1/user/self/zone/", port),
        ..ApiSettings::default()
    };
    let solver = WebsupportSolver::new(
        "websupport-solver",
        api,
        CredentialStore::new("/nonexistent/credentials.toml"),
    );

    let err = solver.present(&challenge("AAA")).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DnsError>(),
        Some(DnsError::Transport(_))
    ));
}

#[tokio::test]
async fn test_present_rejects_bad_domain() {
    let server = MockServer::start().await;
    let mut ch = challenge("AAA");
    ch.resolved_fqdn = "localhost.".to_string();

    let err = solver(&server).present(&ch).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DnsError>(),
        Some(DnsError::Config(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clean_up_deletes_only_matching_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
            txt(1, "_acme-challenge", "BBB"),
            txt(2, "_acme-challenge", "AAA"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(record_path(2)))
        .and(SignedRequest)
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(record_path(1)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    solver(&server).clean_up(&challenge("AAA")).await.unwrap();
}

#[tokio::test]
async fn test_clean_up_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(vec![txt(1, "_acme-challenge", "BBB")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = solver(&server).clean_up(&challenge("AAA")).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DnsError>(),
        Some(DnsError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_challenges_for_same_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let solver: Arc<dyn Solver> = Arc::new(solver(&server));
    let first = {
        let solver = Arc::clone(&solver);
        tokio::spawn(async move { solver.present(&challenge("AAA")).await })
    };
    let second = {
        let solver = Arc::clone(&solver);
        tokio::spawn(async move { solver.present(&challenge("BBB")).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let mut contents: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["content"].as_str().unwrap().to_string()
        })
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["AAA", "BBB"]);
}

#[tokio::test]
async fn test_credentials_from_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .and(SignedRequest)
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().join("credentials.toml"));
    store.store("websupport", API_KEY, API_SECRET).unwrap();

    let api = ApiSettings {
        base_url: base_url(&server),
        ..ApiSettings::default()
    };
    let solver = WebsupportSolver::new("websupport-solver", api, store);

    let ch = ChallengeRequest {
        resolved_fqdn: FQDN.to_string(),
        key: "AAA".to_string(),
        config: SolverConfig::with_secret_ref("websupport"),
    };
    solver.present(&ch).await.unwrap();
}
