use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::dom::text_of;
use super::entries::LeaderboardEntry;

static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));

/// Cells per leaderboard row: position, nickname, return, profit.
const COLUMNS: usize = 4;

/// Parses the leaderboard page.
///
/// Every `<td>` of the page is taken in order and grouped by four. The site's
/// own position column is ignored; ranks follow the row order. A trailing
/// incomplete group is dropped.
pub fn parse_leaderboard(html: &str) -> Vec<LeaderboardEntry> {
    let doc = Html::parse_document(html);
    let cells: Vec<String> = doc.select(&CELL).map(|td| text_of(&td)).collect();

    cells
        .chunks_exact(COLUMNS)
        .enumerate()
        .map(|(idx, row)| LeaderboardEntry {
            rank: idx + 1,
            name: row[1].clone(),
            roi: row[2].clone(),
            profit: row[3].clone(),
        })
        .collect()
}
