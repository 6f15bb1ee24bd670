//! Bill ledger views: transaction history and expense entry.

use anyhow::{bail, Result};

use casa_common::balance::net_balance;
use casa_common::types::{ExpenseRequest, Transaction};
use casa_common::ui::{colors, money, print_kv, short_date, HR};
use casa_common::validation;

use crate::client::ApiClient;
use crate::commands::{find_user, require_session};

pub async fn list(client: &ApiClient, group_id: &str) -> Result<()> {
    let session = require_session()?;
    let transactions = client.transactions(group_id).await?;
    render_ledger(&transactions, &session.user_id);
    Ok(())
}

fn render_ledger(transactions: &[Transaction], user_id: &str) {
    if transactions.is_empty() {
        println!("No transactions yet.");
    }
    for tx in transactions {
        // green when you fronted the bill, red when you owe a share
        let color = if tx.initiator_id == user_id {
            colors::OK
        } else {
            colors::ERR
        };
        println!(
            "{}  {color}${:.2}{}  paid by {}  {}{}{}",
            tx.description,
            tx.amount,
            colors::RESET,
            tx.paid_by,
            colors::DIM,
            short_date(&tx.date),
            colors::RESET
        );
    }
    println!("{}{}{}", colors::DIM, HR, colors::RESET);
    print_kv("balance", &money(net_balance(transactions, user_id)), 8);
}

pub async fn add(
    client: &ApiClient,
    group_id: &str,
    amount: f64,
    description: &str,
    split_with: Vec<String>,
) -> Result<()> {
    let session = require_session()?;
    validation::require("description", description)?;
    validation::validate_amount(amount)?;
    if split_with.is_empty() {
        return Err(validation::ValidationError::NoSplitters.into());
    }

    let members = client.group_members(group_id).await?;
    let mut splitters: Vec<String> = Vec::new();
    for query in &split_with {
        let Some(user) = find_user(query, &members) else {
            bail!("\"{query}\" is not a member of this group");
        };
        if !splitters.contains(&user.id) {
            splitters.push(user.id.clone());
        }
    }

    let outcome = client
        .add_expense(&ExpenseRequest {
            group_id: group_id.to_string(),
            initiator: session.user_id.clone(),
            splitters,
            amount,
            description: description.to_string(),
        })
        .await?;

    println!(
        "{}",
        outcome
            .message
            .unwrap_or_else(|| "Expense added successfully".to_string())
    );

    // prefer the ledger the server returned inline, re-fetch otherwise
    let transactions = match outcome.transactions {
        Some(transactions) => transactions,
        None => client.transactions(group_id).await?,
    };
    render_ledger(&transactions, &session.user_id);
    Ok(())
}
