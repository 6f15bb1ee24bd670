//! Grocery list views: requests and the claim workflow.

use anyhow::Result;

use casa_common::types::{GroceryItem, GroceryRequest};
use casa_common::ui::{colors, short_date};
use casa_common::validation::{self, parse_event_time};

use crate::client::ApiClient;
use crate::commands::require_session;

pub async fn list(client: &ApiClient, group_id: &str) -> Result<()> {
    require_session()?;
    let items = client.groceries(group_id).await?;
    render_items(&items);
    Ok(())
}

fn render_items(items: &[GroceryItem]) {
    if items.is_empty() {
        println!("The grocery list is empty.");
        return;
    }
    for item in items {
        let requester = item
            .requester_username
            .as_deref()
            .unwrap_or(item.requester.as_str());
        println!(
            "{}  {}{} x{} from {}{}  {}{}{}",
            item.id,
            colors::HEADER,
            item.item,
            item.quantity,
            item.place,
            colors::RESET,
            colors::DIM,
            short_date(&item.date),
            colors::RESET
        );
        match (&item.accepted_by, &item.accepter) {
            (Some(_), Some(name)) => println!("    requested by {requester}, claimed by {name}"),
            (Some(id), None) => println!("    requested by {requester}, claimed by {id}"),
            _ => println!("    requested by {requester}, unclaimed"),
        }
    }
}

pub async fn add(
    client: &ApiClient,
    group_id: &str,
    item: &str,
    place: &str,
    quantity: Option<String>,
) -> Result<()> {
    let session = require_session()?;
    validation::require("item", item)?;
    validation::require("place", place)?;
    let quantity = quantity.unwrap_or_else(|| "1".to_string());

    let items = client
        .add_grocery(&GroceryRequest {
            group_id: group_id.to_string(),
            requester: session.user_id.clone(),
            item: item.to_string(),
            place: place.to_string(),
            quantity,
            item_id: None,
        })
        .await?;

    println!("Grocery added.");
    render_items(&items);
    Ok(())
}

pub async fn edit(
    client: &ApiClient,
    group_id: &str,
    item_id: &str,
    item: &str,
    place: &str,
    quantity: Option<String>,
) -> Result<()> {
    let session = require_session()?;
    validation::require("item", item)?;
    validation::require("place", place)?;
    let quantity = quantity.unwrap_or_else(|| "1".to_string());

    let items = client
        .edit_grocery(&GroceryRequest {
            group_id: group_id.to_string(),
            requester: session.user_id.clone(),
            item: item.to_string(),
            place: place.to_string(),
            quantity,
            item_id: Some(item_id.to_string()),
        })
        .await?;

    println!("Grocery updated.");
    render_items(&items);
    Ok(())
}

pub async fn remove(client: &ApiClient, group_id: &str, item_id: &str) -> Result<()> {
    require_session()?;
    client.delete_grocery(group_id, item_id).await?;
    println!("Item deleted.");
    Ok(())
}

pub async fn claim(
    client: &ApiClient,
    group_id: &str,
    item_id: &str,
    when: Option<String>,
) -> Result<()> {
    let session = require_session()?;
    let when = match when {
        Some(raw) => Some(
            parse_event_time(&raw)?
                .format("%Y-%m-%dT%H:%M:%S")
                .to_string(),
        ),
        None => None,
    };

    let items = client
        .accept_grocery(group_id, item_id, &session.user_id, when.as_deref())
        .await?;

    println!("Claimed. You're picking this one up.");
    render_items(&items);
    Ok(())
}

pub async fn unclaim(client: &ApiClient, group_id: &str, item_id: &str) -> Result<()> {
    let session = require_session()?;
    client
        .unaccept_grocery(group_id, item_id, &session.user_id)
        .await?;
    println!("Claim released.");
    Ok(())
}
