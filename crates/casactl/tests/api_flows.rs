//! Client flows against a stub backend.
//!
//! The stub speaks the same envelopes as the real backend: camelCase
//! keys, `success`/`message` on most routes, `error` on calendar routes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use casa_common::balance::net_balance;
use casa_common::types::{
    CreateGroupRequest, ExpenseRequest, GroceryRequest, InviteAction, LoginRequest, MemberRef,
    NotificationStatus, RegisterRequest,
};
use casactl::client::ApiClient;

#[derive(Default)]
struct Stub {
    register_bodies: Vec<Value>,
    users: Vec<Value>,
    /// notification id -> (status, group id)
    notifications: HashMap<String, (String, String)>,
    /// group id -> member user ids
    group_members: HashMap<String, Vec<String>>,
    transactions: Vec<Value>,
    events: HashMap<String, Value>,
    groceries: HashMap<String, Value>,
    next_id: u64,
}

impl Stub {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

type Shared = Arc<Mutex<Stub>>;

async fn serve(state: Shared) -> String {
    let app = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/billSplit", post(bill_split))
        .route("/api/groups-by-user", post(groups_by_user))
        .route("/api/group-create", post(create_group))
        .route("/api/search-users", get(search_users))
        .route("/api/notifications", post(list_notifications))
        .route("/api/notifications/:id", axum::routing::patch(respond_notification))
        .route("/api/transactions/:gid", get(transactions))
        .route("/api/events", post(create_event))
        .route("/api/events/:gid", get(list_events))
        .route("/api/events/:gid/:eid", axum::routing::delete(delete_event))
        .route("/api/groceries/:gid", get(grocery_list))
        .route("/api/groceryAdd", post(grocery_add))
        .route("/api/groceryAccept", post(grocery_accept))
        .route("/api/groceryRemoveAcceptance", put(grocery_unaccept))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().register_bodies.push(body);
    Json(json!({ "success": true, "message": "User registered successfully" }))
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["identifier"], "a@b.com");
    Json(json!({
        "success": true,
        "message": "Login successful",
        "token": "tok-1",
        "userId": "u1",
    }))
}

fn groups_json(stub: &Stub, user_id: &str) -> Vec<Value> {
    stub.group_members
        .iter()
        .filter(|(_, members)| members.iter().any(|m| m == user_id))
        .map(|(id, members)| {
            json!({
                "id": id,
                "name": format!("group {id}"),
                "address": "1 Main St",
                "members": members
                    .iter()
                    .map(|m| json!({ "id": m, "name": format!("user {m}") }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect()
}

async fn groups_by_user(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let user_id = body["userId"].as_str().unwrap();
    let stub = state.lock().unwrap();
    Json(json!({ "success": true, "groups": groups_json(&stub, user_id) }))
}

async fn create_group(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut stub = state.lock().unwrap();
    let creator = body["creatorId"].as_str().unwrap().to_string();
    let gid = stub.fresh_id();
    stub.group_members.insert(gid.clone(), vec![creator.clone()]);
    for member in body["members"].as_array().unwrap() {
        let uid = member["id"].as_str().unwrap();
        if uid != creator {
            let nid = stub.fresh_id();
            stub.notifications.insert(nid, ("pending".into(), gid.clone()));
        }
    }
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "groups": groups_json(&stub, &creator) })),
    )
}

async fn search_users(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let stub = state.lock().unwrap();
    let users: Vec<Value> = stub
        .users
        .iter()
        .filter(|u| {
            u["username"]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&q)
                || u["email"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&q)
        })
        .cloned()
        .collect();
    Json(json!({ "success": true, "users": users }))
}

async fn list_notifications(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let _user_id = body["userId"].as_str().unwrap();
    let stub = state.lock().unwrap();
    let notes: Vec<Value> = stub
        .notifications
        .iter()
        .filter(|(_, (status, _))| status == "pending")
        .map(|(id, (status, group_id))| {
            json!({
                "id": id,
                "groupId": group_id,
                "senderId": "u9",
                "status": status,
                "createdAt": "2026-03-01T10:00:00",
            })
        })
        .collect();
    Json(json!({ "success": true, "notifications": notes }))
}

async fn respond_notification(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let user_id = body["userId"].as_str().unwrap().to_string();
    let action = body["action"].as_str().unwrap();
    let mut stub = state.lock().unwrap();

    let Some((status, group_id)) = stub.notifications.get(&id).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Invite not found" })),
        );
    };
    if status != "pending" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Invite not found" })),
        );
    }

    let new_status = if action == "accept" { "accepted" } else { "declined" };
    stub.notifications
        .insert(id, (new_status.to_string(), group_id.clone()));
    if new_status == "accepted" {
        let members = stub.group_members.entry(group_id).or_default();
        if !members.contains(&user_id) {
            members.push(user_id);
        }
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "status": new_status })),
    )
}

async fn transactions(State(state): State<Shared>, Path(_gid): Path<String>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().transactions.clone()))
}

async fn bill_split(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut stub = state.lock().unwrap();
    let id = stub.fresh_id();
    let tx = json!({
        "id": id,
        "description": body["description"],
        "amount": body["amount"],
        "initiatorId": body["initiator"],
        "paidBy": "ana@b.com",
        "date": "2026-03-02T09:00:00",
        "splitBetween": body["splitters"],
    });
    stub.transactions.push(tx);
    Json(json!({
        "success": true,
        "message": "Expense added successfully",
        "transactions": stub.transactions.clone(),
    }))
}

async fn list_events(State(state): State<Shared>, Path(_gid): Path<String>) -> Json<Value> {
    let stub = state.lock().unwrap();
    Json(Value::Array(stub.events.values().cloned().collect()))
}

async fn create_event(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut stub = state.lock().unwrap();
    let id = stub.fresh_id();
    stub.events.insert(
        id.clone(),
        json!({
            "_id": id,
            "title": body["title"],
            "start": body["start"],
            "end": body["end"],
            "group_id": body["group_id"],
            "extendedProps": {
                "people": body["people"],
                "description": body["description"],
                "repeat": body["repeat"],
                "created_by": body["created_by"],
            },
        }),
    );
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Event(s) created", "event_ids": [id] })),
    )
}

async fn delete_event(
    State(state): State<Shared>,
    Path((_gid, eid)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    let mut stub = state.lock().unwrap();
    match stub.events.remove(&eid) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "Event deleted" }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Event not found" })),
        ),
    }
}

async fn grocery_list(State(state): State<Shared>, Path(_gid): Path<String>) -> Json<Value> {
    let stub = state.lock().unwrap();
    Json(Value::Array(stub.groceries.values().cloned().collect()))
}

async fn grocery_add(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut stub = state.lock().unwrap();
    let id = stub.fresh_id();
    stub.groceries.insert(
        id.clone(),
        json!({
            "id": id,
            "item": body["item"],
            "quantity": body["quantity"],
            "place": body["place"],
            "requester": body["requester"],
            "date": "2026-03-02T09:00:00",
            "acceptedBy": null,
            "accepter": null,
        }),
    );
    Json(json!({
        "success": true,
        "message": "Grocery added",
        "groceries": stub.groceries.values().cloned().collect::<Vec<_>>(),
    }))
}

async fn grocery_accept(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let mut stub = state.lock().unwrap();
    let Some(item) = stub.groceries.get_mut(&item_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Item not found" })),
        );
    };
    item["acceptedBy"] = body["userId"].clone();
    item["purchaseTime"] = body["purchaseTime"].clone();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "groceries": stub.groceries.values().cloned().collect::<Vec<_>>(),
        })),
    )
}

async fn grocery_unaccept(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let item_id = body["itemId"].as_str().unwrap().to_string();
    let mut stub = state.lock().unwrap();
    let Some(item) = stub.groceries.get_mut(&item_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Item not found" })),
        );
    };
    if item["acceptedBy"] != body["userId"] {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "success": false, "message": "You haven't accepted this item" })),
        );
    }
    item["acceptedBy"] = Value::Null;
    item["purchaseTime"] = Value::Null;
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Acceptance removed" })),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_posts_the_exact_payload() {
    let state: Shared = Shared::default();
    let base = serve(state.clone()).await;
    let client = ApiClient::new(base);

    let message = client
        .register(&RegisterRequest {
            username: "ada".into(),
            email: "a@b.com".into(),
            password: "12345678".into(),
        })
        .await
        .unwrap();

    assert_eq!(message, "User registered successfully");
    let stub = state.lock().unwrap();
    assert_eq!(
        stub.register_bodies,
        vec![json!({
            "username": "ada",
            "email": "a@b.com",
            "password": "12345678",
        })]
    );
}

#[tokio::test]
async fn login_yields_the_backend_identity() {
    let state: Shared = Shared::default();
    let base = serve(state).await;
    let client = ApiClient::new(base);

    let (user_id, token) = client
        .login(&LoginRequest {
            identifier: "a@b.com".into(),
            password: "12345678".into(),
        })
        .await
        .unwrap();

    assert_eq!(user_id, "u1");
    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn expense_round_trips_through_the_ledger() {
    let state: Shared = Shared::default();
    let base = serve(state).await;
    let client = ApiClient::new(base);

    let outcome = client
        .add_expense(&ExpenseRequest {
            group_id: "g1".into(),
            initiator: "u1".into(),
            splitters: vec!["u2".into(), "u3".into()],
            amount: 30.0,
            description: "groceries".into(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.transactions.as_ref().map(Vec::len), Some(1));

    let fetched = client.transactions("g1").await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].description, "groceries");
    assert_eq!(fetched[0].split_between, vec!["u2", "u3"]);

    // each splitter carries half; the initiator is out the full amount
    assert!((net_balance(&fetched, "u2") - 15.0).abs() < 1e-9);
    assert!((net_balance(&fetched, "u1") + 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn accepting_an_invite_joins_the_group() {
    let state: Shared = Shared::default();
    {
        let mut stub = state.lock().unwrap();
        stub.notifications
            .insert("n1".into(), ("pending".into(), "g1".into()));
        stub.group_members.insert("g1".into(), vec!["u9".into()]);
    }
    let base = serve(state).await;
    let client = ApiClient::new(base);

    assert_eq!(client.groups_by_user("u2").await.unwrap().len(), 0);

    let status = client
        .respond_notification("n1", "u2", InviteAction::Accept)
        .await
        .unwrap();
    assert_eq!(status, NotificationStatus::Accepted);

    let groups = client.groups_by_user("u2").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "g1");

    // responded invites leave the pending list
    assert!(client.notifications("u2").await.unwrap().is_empty());
}

#[tokio::test]
async fn declining_twice_is_rejected_without_side_effects() {
    let state: Shared = Shared::default();
    {
        let mut stub = state.lock().unwrap();
        stub.notifications
            .insert("n1".into(), ("pending".into(), "g1".into()));
        stub.group_members.insert("g1".into(), vec!["u9".into()]);
    }
    let base = serve(state.clone()).await;
    let client = ApiClient::new(base);

    let status = client
        .respond_notification("n1", "u2", InviteAction::Decline)
        .await
        .unwrap();
    assert_eq!(status, NotificationStatus::Declined);

    let err = client
        .respond_notification("n1", "u2", InviteAction::Decline)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invite not found"));

    // the decline touched nothing else
    let stub = state.lock().unwrap();
    assert_eq!(stub.group_members["g1"], vec!["u9".to_string()]);
    assert_eq!(stub.notifications["n1"].0, "declined");
}

#[tokio::test]
async fn creating_a_group_invites_members_who_can_accept() {
    let state: Shared = Shared::default();
    {
        let mut stub = state.lock().unwrap();
        stub.users = vec![
            json!({ "id": "u1", "username": "ana", "email": "a@b.com" }),
            json!({ "id": "u2", "username": "ben", "email": "ben@b.com" }),
        ];
    }
    let base = serve(state.clone()).await;
    let client = ApiClient::new(base);

    let found = client.search_users("ben").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "u2");

    let groups = client
        .create_group(&CreateGroupRequest {
            creator_id: "u1".into(),
            group_name: "Flat 7".into(),
            address: "1 Main St".into(),
            notes: String::new(),
            members: vec![MemberRef {
                id: found[0].id.clone(),
            }],
        })
        .await
        .unwrap();
    // the creator starts alone in the new group
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members.len(), 1);

    // the invitee has a pending invite and joins on accept
    let notes = client.notifications("u2").await.unwrap();
    assert_eq!(notes.len(), 1);
    let status = client
        .respond_notification(&notes[0].id, "u2", InviteAction::Accept)
        .await
        .unwrap();
    assert_eq!(status, NotificationStatus::Accepted);
    assert_eq!(client.groups_by_user("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn event_round_trip_and_double_delete() {
    let state: Shared = Shared::default();
    let base = serve(state).await;
    let client = ApiClient::new(base);

    let ids = client
        .create_event(&casa_common::types::EventRequest {
            title: "Dinner".into(),
            start: "2026-03-05T18:00:00".into(),
            end: "2026-03-05T20:00:00".into(),
            people: vec!["u1".into(), "u2".into()],
            description: "pasta night".into(),
            repeat: casa_common::types::Repeat::None,
            group_id: "g1".into(),
            created_by: "u1".into(),
        })
        .await
        .unwrap();
    assert_eq!(ids.len(), 1);

    let events = client.events("g1", None).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Dinner");
    assert_eq!(events[0].props.people, vec!["u1", "u2"]);

    client.delete_event("g1", &ids[0]).await.unwrap();
    assert!(client.events("g1", None).await.unwrap().is_empty());

    let err = client.delete_event("g1", &ids[0]).await.unwrap_err();
    assert!(err.to_string().contains("Event not found"));
}

#[tokio::test]
async fn grocery_claims_are_exclusive_to_the_claimer() {
    let state: Shared = Shared::default();
    let base = serve(state).await;
    let client = ApiClient::new(base);

    let items = client
        .add_grocery(&GroceryRequest {
            group_id: "g1".into(),
            requester: "u1".into(),
            item: "milk".into(),
            place: "corner shop".into(),
            quantity: "2".into(),
            item_id: None,
        })
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    let item_id = items[0].id.clone();
    assert!(items[0].accepted_by.is_none());

    let items = client
        .accept_grocery("g1", &item_id, "u2", Some("2026-03-06T17:00:00"))
        .await
        .unwrap();
    assert_eq!(items[0].accepted_by.as_deref(), Some("u2"));

    // only the claimer may release it
    let err = client
        .unaccept_grocery("g1", &item_id, "u3")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("You haven't accepted this item"));

    client.unaccept_grocery("g1", &item_id, "u2").await.unwrap();
    let items = client.groceries("g1").await.unwrap();
    assert!(items[0].accepted_by.is_none());
}
