// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GraphqlClient against a local axum server standing in for the API.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use lattice_app_core::ClientConfig;
use lattice_graphql::{
    GraphqlClient, MutationContext, MutationEndpoint, MutationError, MutationRequest, ObjectId,
    Timestamp,
};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Seen {
    branch: String,
    query: Option<String>,
    auth: Option<String>,
    document: String,
}

#[derive(Clone)]
struct Server {
    seen: Arc<Mutex<Vec<Seen>>>,
    reply: Arc<dyn Fn(&str) -> (StatusCode, Value) + Send + Sync>,
}

async fn graphql(
    State(server): State<Server>,
    Path(branch): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let document = body["query"].as_str().unwrap_or_default().to_string();
    let (status, reply) = (server.reply)(&document);
    server.seen.lock().unwrap().push(Seen {
        branch,
        query,
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        document,
    });
    (status, Json(reply))
}

async fn spawn<F>(reply: F) -> (String, Arc<Mutex<Vec<Seen>>>)
where
    F: Fn(&str) -> (StatusCode, Value) + Send + Sync + 'static,
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/graphql/{branch}", post(graphql))
        .with_state(Server {
            seen: seen.clone(),
            reply: Arc::new(reply),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn client(address: String, token: Option<&str>) -> GraphqlClient {
    GraphqlClient::new(&ClientConfig {
        address,
        api_token: token.map(str::to_owned),
        timeout_secs: Some(5),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn create_returns_server_assigned_id_and_scopes_request() {
    let (addr, seen) = spawn(|_| {
        (
            StatusCode::OK,
            json!({"data": {"CoreChangeThreadCreate": {"ok": true, "object": {"id": "T1"}}}}),
        )
    })
    .await;
    let client = client(addr, Some("tok"));
    let ctx = MutationContext::new("feature-1")
        .at("2024-05-01T12:00:00Z".parse::<Timestamp>().unwrap());

    let id = client
        .create(
            &ctx,
            &MutationRequest::new("CoreChangeThread").relation("change", &ObjectId::new("pc-1")),
        )
        .await
        .unwrap();
    assert_eq!(id, ObjectId::new("T1"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].branch, "feature-1");
    assert_eq!(seen[0].query.as_deref(), Some("at=2024-05-01T12%3A00%3A00Z"));
    assert_eq!(seen[0].auth.as_deref(), Some("Bearer tok"));
    assert!(seen[0].document.contains("CoreChangeThreadCreate(data: {change: {id: \"pc-1\"}})"));
}

#[tokio::test]
async fn graphql_errors_surface_their_messages() {
    let (addr, _) = spawn(|_| {
        (
            StatusCode::OK,
            json!({"data": null, "errors": [{"message": "text is mandatory"}, {"message": "second"}]}),
        )
    })
    .await;
    let err = client(addr, None)
        .create(&MutationContext::new("main"), &MutationRequest::new("CoreThreadComment"))
        .await
        .unwrap_err();
    assert_eq!(err, MutationError::Graphql("text is mandatory; second".into()));
    assert_eq!(err.to_string(), "text is mandatory; second");
}

#[tokio::test]
async fn http_failure_without_graphql_body_is_http_error() {
    let (addr, _) = spawn(|_| (StatusCode::BAD_GATEWAY, json!({"detail": "upstream down"}))).await;
    let err = client(addr, None)
        .delete(&MutationContext::new("main"), "CoreChangeThread", &ObjectId::new("T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, MutationError::Http { status: 502, .. }), "{err:?}");
}

#[tokio::test]
async fn create_without_id_is_reported() {
    let (addr, _) = spawn(|_| (StatusCode::OK, json!({"data": {"CoreChangeThreadCreate": {"ok": true}}}))).await;
    let err = client(addr, None)
        .create(&MutationContext::new("main"), &MutationRequest::new("CoreChangeThread"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MutationError::MissingObjectId {
            kind: "CoreChangeThread".into()
        }
    );
}

#[tokio::test]
async fn delete_not_acknowledged_is_an_error() {
    let (addr, seen) = spawn(|_| (StatusCode::OK, json!({"data": {"CoreChangeThreadDelete": {"ok": false}}}))).await;
    let err = client(addr, None)
        .delete(&MutationContext::new("main"), "CoreChangeThread", &ObjectId::new("T1"))
        .await
        .unwrap_err();
    assert!(matches!(err, MutationError::NotAcknowledged { operation: "delete", .. }));
    assert!(seen.lock().unwrap()[0].document.contains(r#"CoreChangeThreadDelete(data: {id: "T1"})"#));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = client(format!("http://{addr}"), None)
        .execute(&MutationContext::new("main"), "query { ok }")
        .await
        .unwrap_err();
    assert!(matches!(err, MutationError::Transport(_)));
}
