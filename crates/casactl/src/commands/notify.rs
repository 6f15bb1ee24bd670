//! Notification views: pending invites, chore alerts, and the watch loop.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use tokio::time::interval;

use casa_common::types::{InviteAction, Notification, NotificationKind};
use casa_common::ui::colors;

use crate::client::ApiClient;
use crate::commands::require_session;

pub async fn list(client: &ApiClient) -> Result<()> {
    let session = require_session()?;
    let notes = client.notifications(&session.user_id).await?;
    if notes.is_empty() {
        println!("No unread notifications.");
        return Ok(());
    }
    for note in &notes {
        print_note(note);
    }
    Ok(())
}

fn print_note(note: &Notification) {
    match note.kind {
        NotificationKind::Invite => {
            let sender = note.sender_name.as_deref().unwrap_or("Someone");
            let group = note.group_name.as_deref().unwrap_or(note.group_id.as_str());
            println!(
                "{}  {sender} invited you to {}{group}{}",
                note.id,
                colors::HEADER,
                colors::RESET
            );
            println!(
                "    {}casactl notify accept {id}   |   casactl notify decline {id}{}",
                colors::DIM,
                colors::RESET,
                id = note.id
            );
        }
        NotificationKind::Chore => {
            let title = note.title.as_deref().unwrap_or("(untitled)");
            let group = note.group_name.as_deref().unwrap_or(note.group_id.as_str());
            println!(
                "{}  new chore {}{title}{} in {group}",
                note.id,
                colors::HEADER,
                colors::RESET
            );
            println!(
                "    {}casactl notify read {}{}",
                colors::DIM,
                note.id,
                colors::RESET
            );
        }
    }
}

pub async fn respond(client: &ApiClient, notification_id: &str, action: InviteAction) -> Result<()> {
    let session = require_session()?;
    let status = client
        .respond_notification(notification_id, &session.user_id, action)
        .await?;
    println!("Invite {status}.");

    // accepting may have added a group; refresh both lists
    let remaining = client.notifications(&session.user_id).await?;
    let groups = client.groups_by_user(&session.user_id).await?;
    println!(
        "{}{} notification(s) pending. Your groups: {}{}",
        colors::DIM,
        remaining.len(),
        groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        colors::RESET
    );
    Ok(())
}

/// Chore alerts retire through the decline action on the wire.
pub async fn read(client: &ApiClient, notification_id: &str) -> Result<()> {
    let session = require_session()?;
    client
        .respond_notification(notification_id, &session.user_id, InviteAction::Decline)
        .await?;
    println!("Marked read.");
    Ok(())
}

/// Poll for notifications until interrupted, printing only new arrivals.
pub async fn watch(client: &ApiClient, interval_secs: u64) -> Result<()> {
    let session = require_session()?;
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    let mut seen: HashSet<String> = HashSet::new();
    let mut first = true;

    println!(
        "{}Watching notifications every {interval_secs}s; Ctrl-C to stop.{}",
        colors::DIM,
        colors::RESET
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.notifications(&session.user_id).await {
                    Ok(notes) => {
                        for note in &notes {
                            if seen.insert(note.id.clone()) {
                                print_note(note);
                            }
                        }
                        if first && notes.is_empty() {
                            println!("No unread notifications.");
                        }
                        first = false;
                    }
                    Err(err) => {
                        // transient; keep polling
                        eprintln!("{}watch: {err:#}{}", colors::DIM, colors::RESET);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }
    Ok(())
}
