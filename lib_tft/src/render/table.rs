use tabled::builder::Builder;
use tabled::settings::object::{Cell, Columns};
use tabled::settings::{Alignment, Padding, Style};

use crate::scrape::entries::Ranked;

const HEADERS: [&str; 3] = ["Rank", "Nickname", "Return"];
/// Extra room every column gets beyond its header.
const MIN_PADDING: usize = 2;

/// Lays `entries` out as a header line plus one line per entry.
///
/// Columns are Rank (centered), Nickname and Return (left-aligned), with `gap`
/// spaces between them. A column is as wide as its widest cell, and never
/// narrower than its header plus two.
pub fn ranking_table<R: Ranked>(entries: &[R], gap: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record(HEADERS.map(String::from));
    for entry in entries {
        builder.push_record([entry.rank().to_string(), entry.name().to_string(), entry.roi().to_string()]);
    }

    let mut table = builder.build();
    table
        .with(Style::empty())
        .with(Padding::zero())
        .with(Alignment::left())
        .modify(Columns::first(), Alignment::center())
        .modify(Columns::new(..HEADERS.len() - 1), Padding::new(0, gap, 0, 0))
        // Header padding widens each column to at least the header plus two.
        .modify(Cell::new(0, 0), Padding::new(MIN_PADDING / 2, MIN_PADDING / 2 + gap, 0, 0))
        .modify(Cell::new(0, 1), Padding::new(0, MIN_PADDING + gap, 0, 0))
        .modify(Cell::new(0, 2), Padding::new(0, MIN_PADDING, 0, 0));

    table
        .to_string()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::entries::LeaderboardEntry;

    fn entry(rank: usize, name: &str, roi: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            name: name.to_string(),
            roi: roi.to_string(),
            profit: String::new(),
        }
    }

    fn spaces(n: usize) -> String {
        " ".repeat(n)
    }

    #[test]
    fn header_and_rows_are_aligned() {
        let table = ranking_table(&[entry(1, "alice", "31.20%"), entry(10, "bob", "2%")], 2);
        let lines: Vec<&str> = table.lines().collect();

        // Widths 6, 10, 8: each header plus two.
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!(" Rank{}Nickname{}Return", spaces(3), spaces(4)));
        assert_eq!(lines[1], format!("  1{}alice{}31.20%", spaces(5), spaces(7)));
        assert_eq!(lines[2], format!("  10{}bob{}2%", spaces(4), spaces(9)));
    }

    #[test]
    fn long_names_widen_the_column() {
        let table = ranking_table(&[entry(1, "a_very_long_nickname", "1%")], 1);
        let header = table.lines().next().unwrap();
        assert_eq!(header, format!(" Rank{}Nickname{}Return", spaces(2), spaces(13)));
    }

    #[test]
    fn empty_table_has_only_headers() {
        let table = ranking_table::<LeaderboardEntry>(&[], 3);
        assert_eq!(table, format!(" Rank{}Nickname{}Return", spaces(4), spaces(5)));
    }
}
