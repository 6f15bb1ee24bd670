//! Wire schemas for the casa backend.
//!
//! The backend speaks JSON with camelCase keys and a `success`/`message`
//! envelope on most routes. Every payload the client reads or writes is
//! declared here explicitly; nothing is accessed duck-typed.

use serde::{Deserialize, Serialize};

/// Generic response envelope.
///
/// Calendar routes report failures under `error` instead of `message`;
/// both are carried so one parse covers every route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Ack {
    /// Whatever human-readable text the server attached, if any.
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Denormalized member entry as it appears inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "creatorId", default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Invite,
    Chore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Unread,
    Accepted,
    Declined,
    Read,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Unread => "unread",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Read => "read",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    /// The list route omits the kind for plain invites.
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    pub status: NotificationStatus,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "senderName", default)]
    pub sender_name: Option<String>,
    #[serde(rename = "groupName", default)]
    pub group_name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// The caller's answer to a pending invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteAction {
    Accept,
    Decline,
}

impl InviteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
        }
    }
}

/// One ledger entry: the initiator fronted `amount` and the splitters
/// owe an equal share each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "initiatorId")]
    pub initiator_id: String,
    /// Display name of whoever fronted the money.
    #[serde(rename = "paidBy")]
    pub paid_by: String,
    pub date: String,
    #[serde(rename = "splitBetween")]
    pub split_between: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Repeat {
    #[default]
    None,
    Weekly,
    Biweekly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "group_id")]
    pub group_id: String,
    #[serde(rename = "extendedProps", default)]
    pub props: EventProps,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventProps {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(rename = "created_by", default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: String,
    pub item: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    pub place: String,
    /// User id of whoever asked for the item.
    pub requester: String,
    #[serde(default)]
    pub requester_username: Option<String>,
    pub date: String,
    #[serde(rename = "acceptedBy", default)]
    pub accepted_by: Option<String>,
    /// Username of the accepter, denormalized for display.
    #[serde(default)]
    pub accepter: Option<String>,
}

fn default_quantity() -> String {
    "1".to_string()
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupRequest {
    #[serde(rename = "creatorId")]
    pub creator_id: String,
    #[serde(rename = "groupName")]
    pub group_name: String,
    pub address: String,
    pub notes: String,
    pub members: Vec<MemberRef>,
}

/// Invitees are sent as bare id objects.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRequest {
    /// The backend keys the ledger by group id.
    #[serde(rename = "_id")]
    pub group_id: String,
    pub initiator: String,
    pub splitters: Vec<String>,
    pub amount: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRequest {
    pub title: String,
    pub start: String,
    pub end: String,
    pub people: Vec<String>,
    pub description: String,
    pub repeat: Repeat,
    #[serde(rename = "group_id")]
    pub group_id: String,
    #[serde(rename = "created_by")]
    pub created_by: String,
}

/// Partial event update; only supplied fields go on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.people.is_none()
            && self.repeat.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroceryRequest {
    #[serde(rename = "_id")]
    pub group_id: String,
    pub requester: String,
    pub item: String,
    pub place: String,
    pub quantity: String,
    /// Only set when editing an existing item.
    #[serde(rename = "itemId", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// The group-by-id route returns a trimmed projection, not a full group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDetailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "groupName", default)]
    pub group_name: String,
    #[serde(default)]
    pub members: Vec<MemberName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberName {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub status: Option<NotificationStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Refreshed ledger; absent on older backend builds.
    #[serde(default)]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default)]
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreatedResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "event_ids", default)]
    pub event_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroceriesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub groceries: Vec<GroceryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_parses_camel_case_wire_form() {
        let json = r#"{
            "id": "n1",
            "groupId": "g1",
            "senderId": "u2",
            "status": "pending",
            "createdAt": "2026-03-01T10:00:00"
        }"#;
        let note: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(note.group_id, "g1");
        assert_eq!(note.kind, NotificationKind::Invite);
        assert_eq!(note.status, NotificationStatus::Pending);
        assert!(note.group_name.is_none());
    }

    #[test]
    fn chore_notification_carries_title() {
        let json = r#"{
            "id": "n2",
            "groupId": "g1",
            "senderId": "u2",
            "type": "chore",
            "status": "pending",
            "title": "Dishes",
            "groupName": "Flat 7",
            "createdAt": "2026-03-01T10:00:00"
        }"#;
        let note: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(note.kind, NotificationKind::Chore);
        assert_eq!(note.title.as_deref(), Some("Dishes"));
    }

    #[test]
    fn repeat_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Repeat::Weekly).unwrap(), "\"Weekly\"");
        assert_eq!(serde_json::to_string(&Repeat::None).unwrap(), "\"None\"");
        let r: Repeat = serde_json::from_str("\"Biweekly\"").unwrap();
        assert_eq!(r, Repeat::Biweekly);
    }

    #[test]
    fn expense_request_uses_backend_key_names() {
        let req = ExpenseRequest {
            group_id: "g1".into(),
            initiator: "u1".into(),
            splitters: vec!["u2".into()],
            amount: 9.5,
            description: "pizza".into(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["_id"], "g1");
        assert_eq!(v["splitters"][0], "u2");
    }

    #[test]
    fn grocery_quantity_defaults_to_one() {
        let json = r#"{
            "id": "1",
            "item": "milk",
            "place": "corner shop",
            "requester": "u1",
            "date": "2026-03-01T10:00:00"
        }"#;
        let item: GroceryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, "1");
        assert!(item.accepted_by.is_none());
    }

    #[test]
    fn ack_text_prefers_message_over_error() {
        let a: Ack = serde_json::from_str(r#"{"success":false,"message":"no"}"#).unwrap();
        assert_eq!(a.text(), Some("no"));
        let b: Ack = serde_json::from_str(r#"{"error":"Event not found"}"#).unwrap();
        assert_eq!(b.text(), Some("Event not found"));
    }
}
