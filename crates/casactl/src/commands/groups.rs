//! Group views: list, create with invitations, detail, member search.

use anyhow::{bail, Result};

use casa_common::balance::{member_balances, net_balance};
use casa_common::types::{CreateGroupRequest, Group, MemberRef};
use casa_common::ui::{colors, money, print_kv, HR};
use casa_common::validation;

use crate::client::ApiClient;
use crate::commands::{find_user, require_session};

const KW: usize = 12;

pub async fn list(client: &ApiClient) -> Result<()> {
    let session = require_session()?;
    let groups = client.groups_by_user(&session.user_id).await?;

    if groups.is_empty() {
        println!("No groups yet. Create one with `casactl groups create`.");
        return Ok(());
    }

    for group in &groups {
        print_group(group);
    }
    Ok(())
}

fn print_group(group: &Group) {
    println!(
        "{}{}{}  {}{}{}",
        colors::HEADER,
        group.name,
        colors::RESET,
        colors::DIM,
        group.id,
        colors::RESET
    );
    if !group.address.is_empty() {
        print_kv("  address", &group.address, KW);
    }
    if !group.members.is_empty() {
        let names: Vec<&str> = group.members.iter().map(|m| m.name.as_str()).collect();
        print_kv("  members", &names.join(", "), KW);
    }
}

pub async fn create(
    client: &ApiClient,
    name: &str,
    address: &str,
    notes: Option<String>,
    invites: Vec<String>,
) -> Result<()> {
    let session = require_session()?;
    validation::require("group name", name)?;
    validation::require("address", address)?;
    if invites.is_empty() {
        bail!("Add at least one member with --invite");
    }

    let mut members: Vec<MemberRef> = Vec::new();
    for query in &invites {
        let user = resolve_invitee(client, query).await?;
        if user.id == session.user_id {
            continue;
        }
        if members.iter().any(|m| m.id == user.id) {
            continue;
        }
        members.push(MemberRef { id: user.id });
    }
    if members.is_empty() {
        bail!("Add at least one member other than yourself");
    }

    let invited = members.len();
    let groups = client
        .create_group(&CreateGroupRequest {
            creator_id: session.user_id.clone(),
            group_name: name.trim().to_string(),
            address: address.trim().to_string(),
            notes: notes.unwrap_or_default(),
            members,
        })
        .await?;

    println!(
        "Created {}{}{} and invited {invited} member(s).",
        colors::HEADER,
        name.trim(),
        colors::RESET
    );
    println!("{}{}{}", colors::DIM, HR, colors::RESET);
    for group in &groups {
        print_group(group);
    }
    Ok(())
}

/// Resolve one --invite query through the user search endpoint.
async fn resolve_invitee(client: &ApiClient, query: &str) -> Result<casa_common::types::User> {
    let mut matches = client.search_users(query).await?;
    if let Some(user) = find_user(query, &matches) {
        return Ok(user.clone());
    }
    match matches.len() {
        0 => bail!("No user matches \"{query}\""),
        1 => Ok(matches.swap_remove(0)),
        n => bail!("\"{query}\" is ambiguous ({n} users match); use an exact id or email"),
    }
}

/// The group menu: members plus the caller's position in the ledger.
pub async fn show(client: &ApiClient, group_id: &str) -> Result<()> {
    let session = require_session()?;
    let detail = client.group_detail(group_id).await?;
    let members = client.group_members(group_id).await?;
    let transactions = client.transactions(group_id).await.unwrap_or_default();

    println!(
        "{}{}{}  {}{}{}",
        colors::HEADER,
        detail.group_name,
        colors::RESET,
        colors::DIM,
        group_id,
        colors::RESET
    );
    let names: Vec<&str> = members.iter().map(|u| u.username.as_str()).collect();
    print_kv("  members", &names.join(", "), KW);

    println!("{}{}{}", colors::DIM, HR, colors::RESET);
    print_kv("balance", &money(net_balance(&transactions, &session.user_id)), KW);

    let breakdown = member_balances(&transactions, &session.user_id);
    for member in &members {
        if member.id == session.user_id {
            continue;
        }
        if let Some(amount) = breakdown.get(&member.id) {
            print_kv(&format!("  {}", member.username), &money(*amount), KW);
        }
    }
    Ok(())
}

pub async fn search(client: &ApiClient, query: &str) -> Result<()> {
    validation::require("query", query)?;
    let users = client.search_users(query).await?;
    if users.is_empty() {
        println!("No users match \"{query}\".");
        return Ok(());
    }
    for user in &users {
        println!(
            "{}  {} ({})",
            user.id,
            user.username,
            user.email
        );
    }
    Ok(())
}
