//! End-to-end tests of the HTTP adapters against an in-process fake backend.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use voley_core::api::ApiClient;
use voley_core::api::client::REQUEST_ID_HEADER;
use voley_core::config::ApiConfig;
use voley_core::matches::{HttpMatchApi, MatchStore};
use voley_core::reprogram::{
    HttpScheduleApi, NegotiationState, ReprogramError, ReprogramNegotiator, ReprogramRequest,
};
use voley_core::transfer::{
    ActingRole, ActionGateway, Actor, HttpTransferApi, ListScope, TransferError, TransferStatus,
    TransferStore,
};
use voley_core::FailureKind;

#[derive(Default)]
struct Backend {
    transfers: HashMap<String, Value>,
    matches: HashMap<String, Value>,
    request_ids: Vec<String>,
    list_queries: Vec<HashMap<String, String>>,
    simulate_queries: Vec<HashMap<String, String>>,
    confirmed: Vec<Value>,
    reject_confirm: bool,
    unavailable: bool,
}

type Shared = Arc<Mutex<Backend>>;

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("{} not found", what) })))
        .into_response()
}

async fn get_transfer(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    let backend = s.lock().unwrap();
    if backend.unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    match backend.transfers.get(&id) {
        Some(t) => Json(t.clone()).into_response(),
        None => not_found("transfer"),
    }
}

async fn list_transfers(
    State(s): State<Shared>,
    Path(championship_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut backend = s.lock().unwrap();
    backend.list_queries.push(query.clone());
    let mut out: Vec<Value> = backend
        .transfers
        .values()
        .filter(|t| t["championship_id"] == championship_id.as_str())
        .filter(|t| match query.get("club_id") {
            Some(club) => {
                t["destination_club"]["id"] == club.as_str()
                    || t["origin_club"]["id"] == club.as_str()
            }
            None => true,
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| a["id"].as_str().cmp(&b["id"].as_str()));
    Json(out).into_response()
}

fn column(role: &str) -> Option<&'static str> {
    match role {
        "player" => Some("player_approval"),
        "origin_president" => Some("origin_president_approval"),
        "destination_president" => Some("destination_president_approval"),
        _ => None,
    }
}

async fn decide(
    State(s): State<Shared>,
    Path((family, id, action)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = s.lock().unwrap();
    if let Some(rid) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        backend.request_ids.push(rid.to_string());
    }
    let Some(transfer) = backend.transfers.get_mut(&id) else {
        return not_found("transfer");
    };
    let expected_family = match transfer["request_type"].as_str() {
        Some("player_initiated") => "player",
        _ => "president",
    };
    if family != expected_family {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "wrong endpoint family" })))
            .into_response();
    }
    let Some(col) = body["role"].as_str().and_then(column) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "bad role" }))).into_response();
    };
    if transfer[col] != "PENDING" {
        return (StatusCode::CONFLICT, Json(json!({ "message": "approval already resolved" })))
            .into_response();
    }
    transfer[col] = match action.as_str() {
        "approve" => json!("APPROVED"),
        _ => json!("REJECTED"),
    };
    StatusCode::NO_CONTENT.into_response()
}

async fn soft_delete(
    State(s): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut backend = s.lock().unwrap();
    if let Some(rid) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        backend.request_ids.push(rid.to_string());
    }
    match backend.transfers.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("transfer"),
    }
}

async fn get_match(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    match s.lock().unwrap().matches.get(&id) {
        Some(m) => Json(m.clone()).into_response(),
        None => not_found("match"),
    }
}

async fn simulate(
    State(s): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    s.lock().unwrap().simulate_queries.push(query);
    Json(json!({
        "match_id": id,
        "proposed_start_time": "2024-06-08T19:30:00Z",
        "proposed_venue": { "id": 2, "name": "Polideportivo Sur" },
        "proposed_referees": [
            { "id": "r-7", "name": "Bruno Díaz" },
            { "id": "r-3", "name": "Carla Soto" }
        ]
    }))
    .into_response()
}

async fn confirm(
    State(s): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = s.lock().unwrap();
    if backend.reject_confirm {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "referee r-7 no longer available" })),
        )
            .into_response();
    }
    backend.confirmed.push(body);
    StatusCode::NO_CONTENT.into_response()
}

fn transfer_json(id: &str, request_type: &str, approvals: Value) -> Value {
    let mut t = json!({
        "id": id,
        "request_type": request_type,
        "player": { "id": "p-1", "name": "Lucía Paz" },
        "origin_club": { "id": "club-a", "name": "Litoral" },
        "destination_club": { "id": "club-b", "name": "San Martín" },
        "debt_status": "PENDING",
        "requested_at": "2024-05-10T14:30:00Z",
        "championship_id": "ch-1"
    });
    if let (Some(t), Some(a)) = (t.as_object_mut(), approvals.as_object()) {
        t.extend(a.clone());
    }
    t
}

fn seeded() -> Backend {
    let mut b = Backend::default();
    b.transfers.insert(
        "t-1".into(),
        transfer_json(
            "t-1",
            "player_initiated",
            json!({
                "origin_president_approval": "APPROVED",
                "destination_president_approval": "PENDING"
            }),
        ),
    );
    b.transfers.insert(
        "t-2".into(),
        transfer_json(
            "t-2",
            "player_initiated",
            json!({
                "origin_president_approval": "PENDING",
                "destination_president_approval": "PENDING"
            }),
        ),
    );
    b.transfers.insert(
        "t-3".into(),
        transfer_json(
            "t-3",
            "president_initiated",
            json!({
                "player_approval": "PENDING",
                "origin_president_approval": "PENDING"
            }),
        ),
    );
    b.matches.insert(
        "m-1".into(),
        json!({
            "id": "m-1",
            "championship_id": "ch-1",
            "home_team": "Litoral",
            "away_team": "San Martín",
            "scheduled_at": "2024-06-01T20:00:00Z",
            "venue": { "id": "v-1", "name": "Coliseo Norte" },
            "referees": [{ "id": "r-1", "name": "Ana Ríos" }]
        }),
    );
    b
}

async fn start_backend() -> (Shared, ApiClient) {
    let state: Shared = Arc::new(Mutex::new(seeded()));
    let app = Router::new()
        .route("/api/transfers/{id}", get(get_transfer))
        .route("/api/transfers/{id}/delete", put(soft_delete))
        .route("/api/transfers/{family}/{id}/{action}", put(decide))
        .route("/api/championships/{id}/transfers", get(list_transfers))
        .route("/api/matches/{id}", get(get_match))
        .route("/api/matches/{id}/reprogram/simulate", get(simulate))
        .route("/api/matches/{id}/reprogram/confirm", post(confirm))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = ApiClient::new(&ApiConfig {
        base_url: format!("http://{}/api", addr),
        timeout_ms: 2000,
    })
    .unwrap();
    (state, client)
}

fn gateway(client: &ApiClient) -> (Arc<TransferStore>, ActionGateway) {
    let api = Arc::new(HttpTransferApi::new(client.clone()));
    let store = Arc::new(TransferStore::new(api.clone()));
    (store.clone(), ActionGateway::new(api, store))
}

#[tokio::test]
async fn test_approve_moves_to_in_progress() {
    let (backend, client) = start_backend().await;
    let (store, gateway) = gateway(&client);

    assert_eq!(
        store.refresh("t-1").await.unwrap().request_type().as_str(),
        "player_initiated"
    );
    assert_eq!(store.status("t-1"), Some(TransferStatus::Pending));

    gateway
        .approve("t-1", &Actor::new(ActingRole::DestinationClubPresident, "u-2"))
        .await
        .unwrap();

    assert_eq!(store.status("t-1"), Some(TransferStatus::InProgress));
    let ids = backend.lock().unwrap().request_ids.clone();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].len(), 26);
}

#[tokio::test]
async fn test_president_family_and_reject() {
    let (backend, client) = start_backend().await;
    let (store, gateway) = gateway(&client);

    gateway
        .reject("t-3", &Actor::new(ActingRole::Player, "p-1"))
        .await
        .unwrap();

    assert_eq!(store.status("t-3"), Some(TransferStatus::Rejected));
    assert_eq!(
        backend.lock().unwrap().transfers["t-3"]["player_approval"],
        "REJECTED"
    );
}

#[tokio::test]
async fn test_conflict_forces_refetch() {
    let (backend, client) = start_backend().await;
    let (store, gateway) = gateway(&client);
    store.refresh("t-1").await.unwrap();

    // another president resolves the field behind our back
    backend.lock().unwrap().transfers.get_mut("t-1").unwrap()["destination_president_approval"] =
        json!("REJECTED");

    let err = gateway
        .approve("t-1", &Actor::new(ActingRole::DestinationClubPresident, "u-2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Conflict);
    assert_eq!(err, TransferError::Conflict("approval already resolved".into()));
    assert_eq!(store.status("t-1"), Some(TransferStatus::Rejected));
}

#[tokio::test]
async fn test_local_validation_never_reaches_backend() {
    let (backend, client) = start_backend().await;
    let (_store, gateway) = gateway(&client);

    let err = gateway
        .approve("t-1", &Actor::new(ActingRole::OriginClubPresident, "u-1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Validation);

    let err = gateway
        .approve("t-3", &Actor::new(ActingRole::DestinationClubPresident, "u-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::RoleNotApplicable { .. }));

    assert!(backend.lock().unwrap().request_ids.is_empty());
}

#[tokio::test]
async fn test_withdraw_by_initiator() {
    let (backend, client) = start_backend().await;
    let (store, gateway) = gateway(&client);
    store
        .refresh_championship("ch-1", ListScope::All)
        .await
        .unwrap();
    assert_eq!(store.listing("ch-1").len(), 3);

    gateway
        .withdraw("t-3", &Actor::new(ActingRole::DestinationClubPresident, "u-2"))
        .await
        .unwrap();

    assert!(!store.contains("t-3"));
    assert_eq!(store.listing("ch-1").len(), 2);
    assert!(!backend.lock().unwrap().transfers.contains_key("t-3"));

    let err = store.refresh("t-3").await.unwrap_err();
    assert!(matches!(err, TransferError::NotFound(_)));
}

#[tokio::test]
async fn test_scoped_listing_and_filter() {
    let (backend, client) = start_backend().await;
    let (store, _gateway) = gateway(&client);

    let records = store
        .refresh_championship("ch-1", ListScope::Club("club-b".into()))
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        backend.lock().unwrap().list_queries[0].get("club_id"),
        Some(&"club-b".to_string())
    );

    let pending: Vec<_> = store
        .filter("ch-1", TransferStatus::Pending)
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(pending, vec!["t-1", "t-2", "t-3"]);
}

#[tokio::test]
async fn test_unavailable_is_transient() {
    let (backend, client) = start_backend().await;
    let (store, _gateway) = gateway(&client);
    store.refresh("t-1").await.unwrap();

    backend.lock().unwrap().unavailable = true;
    let err = store.refresh("t-1").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(store.status("t-1"), Some(TransferStatus::Pending));
}

#[tokio::test]
async fn test_reprogram_round_trip() {
    let (backend, client) = start_backend().await;
    let matches = Arc::new(MatchStore::new(Arc::new(HttpMatchApi::new(client.clone()))));
    let negotiator = ReprogramNegotiator::new(
        Arc::new(HttpScheduleApi::new(client.clone())),
        matches.clone(),
        std::time::Duration::from_secs(300),
    );
    matches.refresh("m-1").await.unwrap();

    let not_before = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
    let proposal = negotiator
        .propose(
            "m-1",
            &ReprogramRequest {
                not_before: Some(not_before),
            },
        )
        .await
        .unwrap();
    assert_eq!(proposal.proposed_venue.id, "2");
    assert!(backend.lock().unwrap().simulate_queries[0].contains_key("not_before"));

    negotiator.confirm(&proposal).await.unwrap();
    assert_eq!(negotiator.state("m-1"), NegotiationState::Confirmed);

    let confirmed = backend.lock().unwrap().confirmed.clone();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0]["match_id"], "m-1");
    assert_eq!(confirmed[0]["proposed_referees"][0]["id"], "r-7");
    assert_eq!(confirmed[0]["proposed_referees"][1]["id"], "r-3");

    let schedule = matches.get("m-1").unwrap().schedule;
    assert_eq!(schedule.venue.name, "Polideportivo Sur");
    assert_eq!(schedule.referees.len(), 2);
}

#[tokio::test]
async fn test_reprogram_conflict_returns_to_idle() {
    let (backend, client) = start_backend().await;
    let matches = Arc::new(MatchStore::new(Arc::new(HttpMatchApi::new(client.clone()))));
    let negotiator = ReprogramNegotiator::new(
        Arc::new(HttpScheduleApi::new(client.clone())),
        matches.clone(),
        std::time::Duration::from_secs(300),
    );
    matches.refresh("m-1").await.unwrap();

    let proposal = negotiator
        .propose("m-1", &ReprogramRequest::default())
        .await
        .unwrap();
    backend.lock().unwrap().reject_confirm = true;

    let err = negotiator.confirm(&proposal).await.unwrap_err();
    assert_eq!(
        err,
        ReprogramError::Conflict("referee r-7 no longer available".into())
    );
    assert_eq!(negotiator.state("m-1"), NegotiationState::Idle);
    assert_eq!(matches.get("m-1").unwrap().schedule.venue.id, "v-1");
}
