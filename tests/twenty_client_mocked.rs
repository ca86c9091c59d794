/// Integration tests with a mocked Twenty backend
/// Covers the remote branch and every fallback trigger without a live CRM
use chrono::DateTime;
use rust_twenty_dashboard::config::TwentyConfig;
use rust_twenty_dashboard::integrations::twenty_client::{Fetched, TwentyCrmClient};
use rust_twenty_dashboard::models::{AnalyticsSnapshot, Contact, ContactStatus, NewContact};
use serde_json::{json, Number};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create a client pointed at `base_url`
fn create_test_client(base_url: String) -> TwentyCrmClient {
    let config = TwentyConfig::resolve_with(Some(base_url), Some("test-key".to_string()), |_| None);
    TwentyCrmClient::new(config).unwrap()
}

/// Base URL of a port nothing listens on
fn dead_server_uri() -> String {
    // MockServer instances are pooled and keep listening after drop, so
    // reserve a port with a plain listener instead
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn remote_contacts() -> serde_json::Value {
    json!([
        {
            "id": "c-100",
            "name": "Grace Hopper",
            "email": "grace@navy.mil",
            "status": "won",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        }
    ])
}

fn assert_fallback_contacts(fetched: Fetched<serde_json::Value>) {
    assert!(fetched.is_fallback());
    let contacts: Vec<Contact> = serde_json::from_value(fetched.into_inner()).unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].id, "1");
    assert_eq!(contacts[0].name, "John Smith");
    assert_eq!(contacts[0].status, ContactStatus::Qualified);
    assert_eq!(contacts[0].value, Some(Number::from(15000u64)));
    assert_eq!(contacts[1].id, "2");
    assert_eq!(contacts[1].email, "sarah@startup.com");
    assert_eq!(contacts[1].status, ContactStatus::Proposal);
    assert_eq!(contacts[1].position.as_deref(), Some("CEO"));
}

fn assert_fallback_analytics(fetched: Fetched<serde_json::Value>) {
    assert!(fetched.is_fallback());
    let snapshot: AnalyticsSnapshot = serde_json::from_value(fetched.into_inner()).unwrap();
    assert_eq!(snapshot.total_contacts, 156);
    assert_eq!(snapshot.qualified_leads, 23);
    assert_eq!(snapshot.pipeline_value, Number::from(125000u64));
    assert_eq!(snapshot.conversion_rate, 12.4);
    assert_eq!(snapshot.monthly_growth, 8.5);
    assert_eq!(snapshot.top_sources.len(), 5);
    assert_eq!(snapshot.top_sources[2].source, "cold-call");
    assert_eq!(snapshot.top_sources[2].count, 28);
    assert_eq!(snapshot.top_sources[2].percentage, 17.9);
}

#[tokio::test]
async fn test_get_contacts_returns_remote_body_verbatim() {
    let mock_server = MockServer::start().await;

    // Extra fields must survive untouched
    let mut body = remote_contacts();
    body[0]["customField"] = json!({"nested": [1, 2, 3]});

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let fetched = client.get_contacts().await;

    assert_eq!(fetched, Fetched::Remote(body));
}

#[tokio::test]
async fn test_get_contacts_accepts_unknown_shapes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"people": []}})))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let fetched = client.get_contacts().await;

    assert_eq!(fetched, Fetched::Remote(json!({"data": {"people": []}})));
}

#[tokio::test]
async fn test_get_contacts_server_error_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    assert_fallback_contacts(client.get_contacts().await);
}

#[tokio::test]
async fn test_get_contacts_malformed_body_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    assert_fallback_contacts(client.get_contacts().await);
}

#[tokio::test]
async fn test_get_contacts_connection_refused_falls_back() {
    let client = create_test_client(dead_server_uri());
    assert_fallback_contacts(client.get_contacts().await);
}

#[tokio::test]
async fn test_fallback_contacts_are_stamped_at_call_time() {
    let client = create_test_client(dead_server_uri());
    let before = chrono::Utc::now();
    let fetched = client.get_contacts().await;
    let after = chrono::Utc::now();

    let contacts: Vec<Contact> = serde_json::from_value(fetched.into_inner()).unwrap();
    for contact in contacts {
        assert!(contact.created_at >= before && contact.created_at <= after);
        assert_eq!(contact.created_at, contact.updated_at);
    }
}

#[tokio::test]
async fn test_get_analytics_returns_remote_body() {
    let mock_server = MockServer::start().await;

    // Percentages deliberately do not sum to 100
    let body = json!({
        "totalContacts": 10,
        "qualifiedLeads": 99,
        "pipelineValue": 1.5,
        "conversionRate": 0.0,
        "monthlyGrowth": -3.2,
        "topSources": [{"source": "website", "count": 1, "percentage": 250.0}]
    });

    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let fetched = client.get_analytics().await;

    assert_eq!(fetched, Fetched::Remote(body));
}

#[tokio::test]
async fn test_get_analytics_server_error_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    assert_fallback_analytics(client.get_analytics().await);
}

#[tokio::test]
async fn test_get_analytics_malformed_body_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"totalContacts\": "))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    assert_fallback_analytics(client.get_analytics().await);
}

#[tokio::test]
async fn test_get_analytics_connection_refused_falls_back() {
    let client = create_test_client(dead_server_uri());
    assert_fallback_analytics(client.get_analytics().await);
}

#[tokio::test]
async fn test_create_contact_posts_json_and_returns_server_record() {
    let mock_server = MockServer::start().await;

    let server_record = json!({
        "id": "srv-1",
        "name": "X",
        "email": "x@y.com",
        "status": "new",
        "createdAt": "2024-05-01T00:00:00Z",
        "updatedAt": "2024-05-01T00:00:00Z"
    });

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "X", "email": "x@y.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(&server_record))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let fetched = client.create_contact(&NewContact::new("X", "x@y.com")).await;

    assert_eq!(fetched, Fetched::Remote(server_record));
}

#[tokio::test]
async fn test_create_contact_failure_synthesizes_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let fetched = client.create_contact(&NewContact::new("X", "x@y.com")).await;

    assert!(fetched.is_fallback());
    let record = fetched.into_inner();
    assert_eq!(record["name"], "X");
    assert_eq!(record["email"], "x@y.com");
    assert!(!record["id"].as_str().unwrap().is_empty());

    let created = record["createdAt"].as_str().unwrap();
    let updated = record["updatedAt"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(created).is_ok());
    assert!(DateTime::parse_from_rfc3339(updated).is_ok());
    assert_eq!(created, updated);
}

#[tokio::test]
async fn test_create_contact_connection_refused_keeps_all_fields() {
    let client = create_test_client(dead_server_uri());

    let mut input = NewContact::new("Dana", "dana@example.com");
    input.company = Some("Acme".to_string());
    input.status = Some(ContactStatus::Other("nurturing".to_string()));
    input.value = Some(Number::from(1200u64));
    input.extra.insert("tags".to_string(), json!(["vip"]));

    let record = client.create_contact(&input).await.into_inner();

    assert_eq!(record["company"], "Acme");
    assert_eq!(record["status"], "nurturing");
    assert_eq!(record["value"], json!(1200));
    assert_eq!(record["tags"], json!(["vip"]));
}

#[tokio::test]
async fn test_get_contacts_is_idempotent_against_stable_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_contacts()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());
    let first = client.get_contacts().await;
    let second = client.get_contacts().await;

    assert_eq!(first, second);
    assert!(!first.is_fallback());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_contacts()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(format!("{}/", mock_server.uri()));
    assert!(!client.get_contacts().await.is_fallback());
}

#[tokio::test]
async fn test_concurrent_contacts_and_analytics() {
    let mock_server = MockServer::start().await;

    let analytics = json!({
        "totalContacts": 3,
        "qualifiedLeads": 1,
        "pipelineValue": 900.0,
        "conversionRate": 33.3,
        "monthlyGrowth": 1.0,
        "topSources": []
    });

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_contacts()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&analytics))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri());

    let mut handles = vec![];
    for _ in 0..5 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            tokio::join!(client.get_contacts(), client.get_analytics())
        }));
    }

    for handle in handles {
        let (contacts, snapshot) = handle.await.unwrap();
        assert_eq!(contacts, Fetched::Remote(remote_contacts()));
        assert_eq!(snapshot, Fetched::Remote(analytics.clone()));
    }
}

#[tokio::test]
async fn test_concurrent_fallbacks_do_not_interfere() {
    let client = create_test_client(dead_server_uri());

    let (contacts, snapshot) = tokio::join!(client.get_contacts(), client.get_analytics());

    assert_fallback_contacts(contacts);
    assert_fallback_analytics(snapshot);
}

#[tokio::test]
async fn test_fallback_payloads_keep_integer_literals() {
    let client = create_test_client(dead_server_uri());

    let contacts = client.get_contacts().await.into_inner();
    assert_eq!(contacts[0]["value"], json!(15000));
    assert_eq!(contacts[1]["value"], json!(25000));

    let snapshot = client.get_analytics().await.into_inner();
    assert_eq!(snapshot["pipelineValue"], json!(125000));
    assert_eq!(snapshot["totalContacts"], json!(156));
    assert_eq!(snapshot["monthlyGrowth"], json!(8.5));
}
