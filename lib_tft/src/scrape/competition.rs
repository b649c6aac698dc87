//! # Competition Parsers
//!
//! Three inputs feed the competition board:
//! - the competition list page, to find the id of the competition in progress;
//! - the details page, for the prize pool and contestant labels (and a ranking
//!   table used when the JSON endpoint returns nothing);
//! - the rankings JSON endpoint.
//!
//! `scraper::Html` is not `Send`, so every function here parses, extracts owned
//! values and drops the document before returning.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::dom::{text_of, DocumentOrder};
use super::entries::CompetitionEntry;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| selector(".contest-list_item"));
static LIST_STATUS: LazyLock<Selector> = LazyLock::new(|| selector(".contest-list_item__label"));
static LIST_BUTTON: LazyLock<Selector> = LazyLock::new(|| selector(".button-colored"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector(".label"));
static LABEL_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".label_title"));
static LABEL_VALUE: LazyLock<Selector> = LazyLock::new(|| selector(".label_background-block"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("#leaderboardBody"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".*/(\d+)").expect("static regex"));

/// Status text of a running competition.
const IN_PROGRESS: &str = "in progress";
/// Cells per details-page ranking row: position, nickname, return, back, prize.
const COLUMNS: usize = 5;

/// Finds the id of the competition currently in progress on the list page.
///
/// The id is the trailing number of the `onclick` target of the item's button
/// (`location.href='/competition/1234'`).
pub fn find_active_competition(html: &str) -> Option<u64> {
    let doc = Html::parse_document(html);
    let order = DocumentOrder::new(&doc);

    for item in doc.select(&LIST_ITEM) {
        let Some(status) = order.find_next(&item, &LIST_STATUS) else {
            continue;
        };
        if text_of(&status).to_lowercase() != IN_PROGRESS {
            continue;
        }

        let id = order
            .find_next(&item, &LIST_BUTTON)
            .and_then(|button| button.value().attr("onclick"))
            .and_then(|onclick| ID_PATTERN.captures(onclick))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok());
        if id.is_some() {
            return id;
        }
    }
    None
}

/// Values scraped from a competition details page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitionDetails {
    /// "Prize pool" label value.
    pub prize_pool: Option<String>,
    /// "Remaining contestants" label value.
    pub remaining_contestants: Option<String>,
    /// Ranking rows printed on the page itself.
    pub entries: Vec<CompetitionEntry>,
}

/// Parses the details page once and extracts everything the board needs.
///
/// The ranking rows come from the table printed under `#leaderboardBody`.
pub fn parse_competition_details(html: &str) -> CompetitionDetails {
    let doc = Html::parse_document(html);
    CompetitionDetails {
        prize_pool: label_in(&doc, "prize pool"),
        remaining_contestants: label_in(&doc, "remaining contestants"),
        entries: competition_in(&doc),
    }
}

fn label_in(doc: &Html, label: &str) -> Option<String> {
    let order = DocumentOrder::new(doc);
    let wanted = label.to_lowercase();

    for item in doc.select(&LABEL) {
        let Some(title) = order.find_next(&item, &LABEL_TITLE) else {
            continue;
        };
        if text_of(&title).to_lowercase() == wanted {
            return order.find_next(&item, &LABEL_VALUE).map(|value| text_of(&value));
        }
    }
    None
}

fn competition_in(doc: &Html) -> Vec<CompetitionEntry> {
    let Some(body) = doc.select(&BODY).next() else {
        return Vec::new();
    };
    let cells: Vec<String> = body.select(&CELL).map(|td| text_of(&td)).collect();

    cells
        .chunks_exact(COLUMNS)
        .enumerate()
        .map(|(idx, row)| CompetitionEntry {
            rank: idx + 1,
            name: row[1].clone(),
            roi: row[2].clone(),
            back: row[3].clone(),
            prize: row[4].clone(),
        })
        .collect()
}

/// Converts the rankings endpoint answer, `{"data": [{"nickname", "returnPct",
/// "backPct", "prize"}, ...]}`, into rows.
///
/// Anything that is not shaped like that yields no rows.
pub fn parse_rankings(value: &Value) -> Vec<CompetitionEntry> {
    let Some(rows) = value.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .map(|(idx, row)| CompetitionEntry {
            rank: idx + 1,
            name: display(row.get("nickname")),
            roi: display(row.get("returnPct")),
            back: display(row.get("backPct")),
            prize: display(row.get("prize")),
        })
        .collect()
}

/// Strings as they are, numbers and the rest with their JSON text.
fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}
