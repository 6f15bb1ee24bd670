//! HTTP client for the casa backend.
//!
//! One async method per endpoint, typed bodies from `casa_common`. Every
//! failure path surfaces the server's own message when it sent one.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::json;

use casa_common::config::{CasaConfig, DEFAULT_BASE_URL};
use casa_common::types::*;

const CONNECT: &str = "Failed to reach the casa backend";

/// Client for the casa REST backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Discover the backend base URL.
    ///
    /// Priority:
    /// 1. Explicit --api flag (passed as argument)
    /// 2. $CASA_API environment variable
    /// 3. api.base_url from the config file
    /// 4. http://127.0.0.1:5001 (local development default)
    pub fn discover_base_url(explicit: Option<&str>, config: &CasaConfig) -> String {
        if let Some(url) = explicit {
            return url.to_string();
        }

        if let Ok(url) = std::env::var("CASA_API") {
            if !url.is_empty() {
                return url;
            }
        }

        if let Some(url) = &config.api.base_url {
            return url.clone();
        }

        DEFAULT_BASE_URL.to_string()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check HTTP status, then decode the body. Non-2xx responses are
    /// turned into errors carrying the server's message when present.
    async fn read<T: DeserializeOwned>(what: &'static str, resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<Ack>()
                .await
                .ok()
                .and_then(|a| a.text().map(String::from));
            match detail {
                Some(message) => bail!("{what}: {message}"),
                None => bail!("{what} (HTTP {status})"),
            }
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("{what}: unexpected response body"))
    }

    fn server_said(what: &'static str, message: Option<String>) -> anyhow::Error {
        anyhow::anyhow!("{}", message.unwrap_or_else(|| what.to_string()))
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn register(&self, req: &RegisterRequest) -> Result<String> {
        let url = format!("{}/auth/register", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let ack: Ack = Self::read("Registration failed", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Registration failed", ack.message));
        }
        Ok(ack
            .message
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }

    /// Returns `(user_id, token)` on success.
    pub async fn login(&self, req: &LoginRequest) -> Result<(String, String)> {
        let url = format!("{}/auth/login", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let body: LoginResponse = Self::read("Login failed", resp).await?;
        if !body.success {
            return Err(Self::server_said("Login failed", body.message));
        }
        let user_id = body.user_id.context("Login response missing userId")?;
        let token = body.token.context("Login response missing token")?;
        Ok((user_id, token))
    }

    pub async fn verify_email(&self, token: &str) -> Result<String> {
        let url = format!("{}/auth/verify-email", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "token": token }))
            .send()
            .await
            .context(CONNECT)?;
        let ack: Ack = Self::read("Email verification failed", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Email verification failed", ack.message));
        }
        Ok(ack.message.unwrap_or_else(|| "Email verified".to_string()))
    }

    pub async fn reset_password(&self, email: &str) -> Result<String> {
        let url = format!("{}/auth/reset-password", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "email": email }))
            .send()
            .await
            .context(CONNECT)?;
        let ack: Ack = Self::read("Password reset failed", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Password reset failed", ack.message));
        }
        Ok(ack
            .message
            .unwrap_or_else(|| "Password reset email sent".to_string()))
    }

    pub async fn change_password(&self, token: &str, password: &str) -> Result<String> {
        let url = format!("{}/auth/change-password", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "token": token, "password": password }))
            .send()
            .await
            .context(CONNECT)?;
        let ack: Ack = Self::read("Password change failed", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Password change failed", ack.message));
        }
        Ok(ack
            .message
            .unwrap_or_else(|| "Password changed successfully".to_string()))
    }

    // ------------------------------------------------------------------
    // Groups and users
    // ------------------------------------------------------------------

    pub async fn groups_by_user(&self, user_id: &str) -> Result<Vec<Group>> {
        let url = format!("{}/api/groups-by-user", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .context(CONNECT)?;
        let body: GroupsResponse = Self::read("Failed to fetch groups", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to fetch groups", body.message));
        }
        Ok(body.groups)
    }

    /// Creates the group and returns the creator's refreshed group list.
    pub async fn create_group(&self, req: &CreateGroupRequest) -> Result<Vec<Group>> {
        let url = format!("{}/api/group-create", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let body: GroupsResponse = Self::read("Group creation failed", resp).await?;
        if !body.success {
            return Err(Self::server_said("Group creation failed", body.message));
        }
        Ok(body.groups)
    }

    pub async fn group_detail(&self, group_id: &str) -> Result<GroupDetailResponse> {
        let url = format!("{}/api/groups/{}", self.base_url, group_id);
        let resp = self.client.post(&url).send().await.context(CONNECT)?;
        let body: GroupDetailResponse = Self::read("Failed to fetch group", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to fetch group", body.message));
        }
        Ok(body)
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        let url = format!("{}/api/search-users", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .context(CONNECT)?;
        let body: UsersResponse = Self::read("User search failed", resp).await?;
        if !body.success {
            return Err(Self::server_said("User search failed", body.message));
        }
        Ok(body.users)
    }

    pub async fn group_members(&self, group_id: &str) -> Result<Vec<User>> {
        let url = format!("{}/api/users/{}", self.base_url, group_id);
        let resp = self.client.get(&url).send().await.context(CONNECT)?;
        let body: UsersResponse = Self::read("Failed to fetch group members", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to fetch group members", body.message));
        }
        Ok(body.users)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        let url = format!("{}/api/notifications", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .context(CONNECT)?;
        let body: NotificationsResponse = Self::read("Failed to fetch notifications", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to fetch notifications", body.message));
        }
        Ok(body.notifications)
    }

    /// `pending -> accepted | declined`; the server's answer wins.
    pub async fn respond_notification(
        &self,
        notification_id: &str,
        user_id: &str,
        action: InviteAction,
    ) -> Result<NotificationStatus> {
        let url = format!("{}/api/notifications/{}", self.base_url, notification_id);
        let resp = self
            .client
            .patch(&url)
            .json(&json!({ "userId": user_id, "action": action.as_str() }))
            .send()
            .await
            .context(CONNECT)?;
        let body: RespondResponse = Self::read("Failed to respond to invite", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to respond to invite", body.message));
        }
        body.status.context("Response missing resulting status")
    }

    // ------------------------------------------------------------------
    // Bills
    // ------------------------------------------------------------------

    pub async fn transactions(&self, group_id: &str) -> Result<Vec<Transaction>> {
        let url = format!("{}/api/transactions/{}", self.base_url, group_id);
        let resp = self.client.get(&url).send().await.context(CONNECT)?;
        Self::read("Failed to fetch transactions", resp).await
    }

    pub async fn add_expense(&self, req: &ExpenseRequest) -> Result<ExpenseResponse> {
        let url = format!("{}/auth/billSplit", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let body: ExpenseResponse = Self::read("Failed to create transaction", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to create transaction", body.message));
        }
        Ok(body)
    }

    // ------------------------------------------------------------------
    // Calendar
    // ------------------------------------------------------------------

    pub async fn events(
        &self,
        group_id: &str,
        range: Option<(&str, &str)>,
    ) -> Result<Vec<Event>> {
        let url = format!("{}/api/events/{}", self.base_url, group_id);
        let mut request = self.client.get(&url);
        if let Some((start, end)) = range {
            request = request.query(&[("start", start), ("end", end)]);
        }
        let resp = request.send().await.context(CONNECT)?;
        Self::read("Failed to fetch events", resp).await
    }

    /// Returns the ids of the created occurrence(s); repeating events
    /// expand into a series server-side.
    pub async fn create_event(&self, req: &EventRequest) -> Result<Vec<String>> {
        let url = format!("{}/api/events", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let body: EventCreatedResponse = Self::read("Failed to create event", resp).await?;
        Ok(body.event_ids)
    }

    pub async fn update_event(
        &self,
        group_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<()> {
        let url = format!("{}/api/events/{}/{}", self.base_url, group_id, event_id);
        let resp = self.client.patch(&url).json(patch).send().await.context(CONNECT)?;
        let _: Ack = Self::read("Failed to update event", resp).await?;
        Ok(())
    }

    pub async fn delete_event(&self, group_id: &str, event_id: &str) -> Result<()> {
        let url = format!("{}/api/events/{}/{}", self.base_url, group_id, event_id);
        let resp = self.client.delete(&url).send().await.context(CONNECT)?;
        let _: Ack = Self::read("Failed to delete event", resp).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Groceries
    // ------------------------------------------------------------------

    pub async fn groceries(&self, group_id: &str) -> Result<Vec<GroceryItem>> {
        let url = format!("{}/api/groceries/{}", self.base_url, group_id);
        let resp = self.client.get(&url).send().await.context(CONNECT)?;
        Self::read("Failed to fetch groceries", resp).await
    }

    pub async fn add_grocery(&self, req: &GroceryRequest) -> Result<Vec<GroceryItem>> {
        let url = format!("{}/api/groceryAdd", self.base_url);
        let resp = self.client.post(&url).json(req).send().await.context(CONNECT)?;
        let body: GroceriesResponse = Self::read("Failed to add grocery item", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to add grocery item", body.message));
        }
        Ok(body.groceries)
    }

    pub async fn edit_grocery(&self, req: &GroceryRequest) -> Result<Vec<GroceryItem>> {
        let url = format!("{}/api/groceryEdit", self.base_url);
        let resp = self.client.put(&url).json(req).send().await.context(CONNECT)?;
        let body: GroceriesResponse = Self::read("Failed to edit grocery item", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to edit grocery item", body.message));
        }
        Ok(body.groceries)
    }

    pub async fn delete_grocery(&self, group_id: &str, item_id: &str) -> Result<()> {
        let url = format!("{}/api/groceryDelete", self.base_url);
        let resp = self
            .client
            .delete(&url)
            .json(&json!({ "groupId": group_id, "itemId": item_id }))
            .send()
            .await
            .context(CONNECT)?;
        let ack: Ack = Self::read("Failed to delete grocery item", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Failed to delete grocery item", ack.message));
        }
        Ok(())
    }

    pub async fn accept_grocery(
        &self,
        group_id: &str,
        item_id: &str,
        user_id: &str,
        purchase_time: Option<&str>,
    ) -> Result<Vec<GroceryItem>> {
        let url = format!("{}/api/groceryAccept", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "groupId": group_id,
                "itemId": item_id,
                "userId": user_id,
                "purchaseTime": purchase_time,
            }))
            .send()
            .await
            .context(CONNECT)?;
        let body: GroceriesResponse = Self::read("Failed to claim grocery item", resp).await?;
        if !body.success {
            return Err(Self::server_said("Failed to claim grocery item", body.message));
        }
        Ok(body.groceries)
    }

    pub async fn unaccept_grocery(
        &self,
        group_id: &str,
        item_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let url = format!("{}/api/groceryRemoveAcceptance", self.base_url);
        let resp = self
            .client
            .put(&url)
            .json(&json!({
                "groupId": group_id,
                "itemId": item_id,
                "userId": user_id,
            }))
            .send()
            .await
            .context(CONNECT)?;
        let ack: Ack = Self::read("Failed to release grocery item", resp).await?;
        if !ack.success {
            return Err(Self::server_said("Failed to release grocery item", ack.message));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_resolution_order() {
        let mut config = CasaConfig::default();
        config.api.base_url = Some("http://from-config:5001".into());

        assert_eq!(
            ApiClient::discover_base_url(Some("http://flag:1"), &config),
            "http://flag:1"
        );
        assert_eq!(
            ApiClient::discover_base_url(None, &config),
            "http://from-config:5001"
        );
        assert_eq!(
            ApiClient::discover_base_url(None, &CasaConfig::default()),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = ApiClient::new("http://host:5001//");
        assert_eq!(client.base_url(), "http://host:5001");
    }
}
