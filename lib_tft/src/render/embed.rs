use std::time::SystemTime;

use chrono::{DateTime, Datelike, Month, Utc};

use super::table::ranking_table;
use super::time::time_remaining;
use crate::core::payload::BoardEmbed;
use crate::scrape::entries::{CompetitionEntry, LeaderboardEntry};
use crate::scrape::faq::{FaqArticle, FaqCategory};

/// Image shown under both boards.
pub const TFT_LOGO_URL: &str = "https://leaderboard.thefundedtraderprogram.com/images/TFT_Logo_Small.png";

const LEADERBOARD_TITLE: &str = "The Funded Trader Leaderboard";
const LEADERBOARD_GAP: usize = 6;
const COMPETITION_GAP: usize = 3;
/// Longest embed description Discord accepts.
const DESCRIPTION_LIMIT: usize = 4096;

/// Wraps `text` in a fenced code block tagged `syntax`.
pub fn markdown_block(syntax: &str, text: &str) -> String {
    format!("```{}\n{}```", syntax, text)
}

fn fix(text: &str) -> String {
    markdown_block("fix", text)
}

fn footer(update_minutes: u64) -> String {
    format!("Updated every {} minutes", update_minutes)
}

/// Builds the monthly leaderboard embed. No rows, no embed.
pub fn leaderboard_embed(entries: &[LeaderboardEntry], now: DateTime<Utc>, update_minutes: u64) -> Option<BoardEmbed> {
    let leader = entries.first()?;
    let table = ranking_table(entries, LEADERBOARD_GAP);

    let embed = BoardEmbed::new(LEADERBOARD_TITLE, markdown_block("css", &table))
        .image(TFT_LOGO_URL)
        .field(":clock1: Time Remaining", fix(&time_remaining(now)), false)
        .field(":trophy: Current Leader", fix(&leader.name), false)
        .field(":moneybag: King's/Queen's Profits", fix(&leader.profit), false)
        .footer(footer(update_minutes))
        .timestamp(SystemTime::from(now));
    Some(embed)
}

/// Builds the embed of the competition in progress. No rows, no embed.
pub fn competition_embed(
    entries: &[CompetitionEntry],
    prize_pool: &str,
    remaining_contestants: &str,
    now: DateTime<Utc>,
    update_minutes: u64,
) -> Option<BoardEmbed> {
    let leader = entries.first()?;
    let table = ranking_table(entries, COMPETITION_GAP);
    let month = u8::try_from(now.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or_default();

    let embed = BoardEmbed::new(format!("The {} Competition", month), markdown_block("css", &table))
        .image(TFT_LOGO_URL)
        .field(":trophy: Current Leader", fix(&leader.name), false)
        .field(":moneybag: Prize Pool", fix(prize_pool), false)
        .field(":clock1: Time Remaining", fix(&time_remaining(now)), false)
        .field(":people_hugging: Remaining Contestants", fix(remaining_contestants), false)
        .footer(footer(update_minutes))
        .timestamp(SystemTime::from(now));
    Some(embed)
}

/// Builds the embed of one FAQ category: a linked title and the summary of
/// each article, in page order.
///
/// Articles that would push the body past Discord's limit are left out.
pub fn faq_embed(category: &FaqCategory, articles: &[FaqArticle], base_url: &str) -> BoardEmbed {
    let mut text = String::new();
    let mut length = 0;

    for article in articles {
        let entry = format!(
            "[**{}**]({})\n{}\n\n",
            article.name,
            absolute_url(base_url, &article.url),
            article.description
        );
        let entry_length = entry.chars().count();
        if length + entry_length > DESCRIPTION_LIMIT {
            break;
        }
        length += entry_length;
        text.push_str(&entry);
    }

    BoardEmbed::new(category.name.clone(), text)
}

/// Joins a page link onto `base`. Absolute links are kept as they are.
pub fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 29, 12, 0, 0).unwrap()
    }

    fn leaderboard_rows() -> Vec<LeaderboardEntry> {
        vec![
            LeaderboardEntry {
                rank: 1,
                name: "alice".into(),
                roi: "31.2%".into(),
                profit: "$31,200".into(),
            },
            LeaderboardEntry {
                rank: 2,
                name: "bob".into(),
                roi: "20.0%".into(),
                profit: "$20,000".into(),
            },
        ]
    }

    #[test]
    fn fenced_block() {
        assert_eq!(markdown_block("fix", "alice"), "```fix\nalice```");
    }

    #[test]
    fn leaderboard_layout() {
        let embed = leaderboard_embed(&leaderboard_rows(), now(), 10).unwrap();

        assert_eq!(embed.title, "The Funded Trader Leaderboard");
        assert!(embed.description.starts_with("```css\n"));
        assert!(embed.description.contains("alice"));
        assert_eq!(embed.image_url.as_deref(), Some(TFT_LOGO_URL));
        assert_eq!(embed.footer.as_deref(), Some("Updated every 10 minutes"));
        assert_eq!(embed.timestamp, Some(SystemTime::from(now())));

        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [":clock1: Time Remaining", ":trophy: Current Leader", ":moneybag: King's/Queen's Profits"]
        );
        assert_eq!(embed.fields[0].value, "```fix\n2 days```");
        assert_eq!(embed.fields[1].value, "```fix\nalice```");
        assert_eq!(embed.fields[2].value, "```fix\n$31,200```");
        assert!(embed.fields.iter().all(|f| !f.inline));
    }

    #[test]
    fn competition_layout() {
        let rows = vec![CompetitionEntry {
            rank: 1,
            name: "dave".into(),
            roi: "22%".into(),
            back: "-".into(),
            prize: "$10,000".into(),
        }];
        let embed = competition_embed(&rows, "$50,000", "1,234", now(), 15).unwrap();

        assert_eq!(embed.title, "The March Competition");
        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                ":trophy: Current Leader",
                ":moneybag: Prize Pool",
                ":clock1: Time Remaining",
                ":people_hugging: Remaining Contestants"
            ]
        );
        assert_eq!(embed.fields[1].value, "```fix\n$50,000```");
        assert_eq!(embed.fields[3].value, "```fix\n1,234```");
        assert_eq!(embed.footer.as_deref(), Some("Updated every 15 minutes"));
    }

    #[test]
    fn no_rows_no_embed() {
        assert!(leaderboard_embed(&[], now(), 10).is_none());
        assert!(competition_embed(&[], "$1", "1", now(), 10).is_none());
    }

    fn article(name: &str, url: &str, description: &str) -> FaqArticle {
        FaqArticle {
            name: name.into(),
            url: url.into(),
            description: description.into(),
        }
    }

    #[test]
    fn faq_category_layout() {
        let category = FaqCategory {
            name: "Payouts".into(),
            url: "/en/collections/2-payouts".into(),
        };
        let articles = [
            article("When am I paid?", "/en/articles/20-when", "Every two weeks."),
            article("Fees", "https://help.example/en/articles/21-fees", ""),
        ];

        let embed = faq_embed(&category, &articles, "https://help.thefundedtraderprogram.com/");

        assert_eq!(embed.title, "Payouts");
        assert_eq!(
            embed.description,
            "[**When am I paid?**](https://help.thefundedtraderprogram.com/en/articles/20-when)\nEvery two weeks.\n\n\
             [**Fees**](https://help.example/en/articles/21-fees)\n\n\n"
        );
        assert!(embed.fields.is_empty());
    }

    #[test]
    fn faq_body_stays_under_the_limit() {
        let category = FaqCategory {
            name: "Long".into(),
            url: "/long".into(),
        };
        let summary = "x".repeat(1500);
        let articles: Vec<FaqArticle> = (0..5).map(|i| article(&format!("a{}", i), "/a", &summary)).collect();

        let embed = faq_embed(&category, &articles, "https://help.example");

        assert!(embed.description.chars().count() <= DESCRIPTION_LIMIT);
        assert_eq!(embed.description.matches("[**").count(), 2);
    }

    #[test]
    fn relative_links_join_the_base() {
        assert_eq!(absolute_url("https://h.example/", "/en/a"), "https://h.example/en/a");
        assert_eq!(absolute_url("https://h.example", "en/a"), "https://h.example/en/a");
        assert_eq!(absolute_url("https://h.example", "http://other/a"), "http://other/a");
    }
}
