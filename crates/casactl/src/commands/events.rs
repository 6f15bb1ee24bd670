//! Calendar views: list, add, edit, remove.

use anyhow::{bail, Result};
use chrono::NaiveDateTime;

use casa_common::types::{Event, EventPatch, EventRequest, Repeat};
use casa_common::ui::{colors, short_date};
use casa_common::validation::{
    self, parse_event_time, validate_event_description, validate_event_times, validate_event_title,
};

use crate::client::ApiClient;
use crate::commands::{find_user, require_session};

/// Wire format the backend stores for event bounds.
const WIRE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn parse_repeat(value: Option<&str>) -> Result<Repeat> {
    match value {
        None => Ok(Repeat::None),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "none" => Ok(Repeat::None),
            "weekly" => Ok(Repeat::Weekly),
            "biweekly" => Ok(Repeat::Biweekly),
            other => bail!("Unknown repeat \"{other}\" (use weekly or biweekly)"),
        },
    }
}

pub async fn list(
    client: &ApiClient,
    group_id: &str,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    require_session()?;
    let range = match (from, to) {
        (Some(from), Some(to)) => {
            let from = parse_event_time(&from)?.format(WIRE_TIME).to_string();
            let to = parse_event_time(&to)?.format(WIRE_TIME).to_string();
            Some((from, to))
        }
        (None, None) => None,
        _ => bail!("Use --from and --to together"),
    };

    let events = client
        .events(group_id, range.as_ref().map(|(f, t)| (f.as_str(), t.as_str())))
        .await?;

    if events.is_empty() {
        println!("No events.");
        return Ok(());
    }
    for event in &events {
        print_event(event);
    }
    Ok(())
}

fn print_event(event: &Event) {
    println!(
        "{}{}{}  {}{}{}",
        colors::HEADER,
        event.title,
        colors::RESET,
        colors::DIM,
        event.id,
        colors::RESET
    );
    println!("  {} - {}", short_date(&event.start), short_date(&event.end));
    if event.props.repeat != Repeat::None {
        println!("  repeats {:?}", event.props.repeat);
    }
    if !event.props.description.is_empty() {
        println!("  {}", event.props.description);
    }
    if !event.props.people.is_empty() {
        println!(
            "  {}with {}{}",
            colors::DIM,
            event.props.people.join(", "),
            colors::RESET
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn add(
    client: &ApiClient,
    group_id: &str,
    title: &str,
    start: &str,
    end: &str,
    with: Vec<String>,
    description: Option<String>,
    repeat: Option<String>,
) -> Result<()> {
    let session = require_session()?;
    validate_event_title(title)?;
    let description = description.unwrap_or_default();
    validate_event_description(&description)?;
    let start = parse_event_time(start)?;
    let end = parse_event_time(end)?;
    validate_event_times(start, end, now())?;
    let repeat = parse_repeat(repeat.as_deref())?;

    let members = client.group_members(group_id).await?;
    let mut people: Vec<String> = Vec::new();
    for query in &with {
        let Some(user) = find_user(query, &members) else {
            bail!("\"{query}\" is not a member of this group");
        };
        if !people.contains(&user.id) {
            people.push(user.id.clone());
        }
    }
    if people.is_empty() {
        people.push(session.user_id.clone());
    }

    let ids = client
        .create_event(&EventRequest {
            title: title.to_string(),
            start: start.format(WIRE_TIME).to_string(),
            end: end.format(WIRE_TIME).to_string(),
            people,
            description,
            repeat,
            group_id: group_id.to_string(),
            created_by: session.user_id.clone(),
        })
        .await?;

    match ids.len() {
        1 => println!("Event created."),
        n => println!("Event series created ({n} occurrences)."),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn edit(
    client: &ApiClient,
    group_id: &str,
    event_id: &str,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    description: Option<String>,
) -> Result<()> {
    require_session()?;

    if let Some(title) = &title {
        validate_event_title(title)?;
    }
    if let Some(description) = &description {
        validate_event_description(description)?;
    }
    let start_time = start.as_deref().map(parse_event_time).transpose()?;
    let end_time = end.as_deref().map(parse_event_time).transpose()?;
    match (start_time, end_time) {
        (Some(start), Some(end)) => validate_event_times(start, end, now())?,
        (Some(start), None) if start <= now() => {
            return Err(validation::ValidationError::StartNotInFuture.into())
        }
        _ => {}
    }

    let patch = EventPatch {
        title,
        start: start_time.map(|t| t.format(WIRE_TIME).to_string()),
        end: end_time.map(|t| t.format(WIRE_TIME).to_string()),
        description,
        ..EventPatch::default()
    };
    if patch.is_empty() {
        bail!("Nothing to change");
    }

    client.update_event(group_id, event_id, &patch).await?;
    println!("Event updated.");
    Ok(())
}

pub async fn remove(client: &ApiClient, group_id: &str, event_id: &str) -> Result<()> {
    require_session()?;
    client.delete_event(group_id, event_id).await?;
    println!("Event deleted.");
    Ok(())
}
