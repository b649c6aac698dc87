/// A row the ranking table can display.
pub trait Ranked {
    /// 1-based position.
    fn rank(&self) -> usize;
    /// Trader nickname.
    fn name(&self) -> &str;
    /// Return, pre-formatted.
    fn roi(&self) -> &str;
}

/// One row of the monthly leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position in parse order.
    pub rank: usize,
    /// Trader nickname.
    pub name: String,
    /// Return, as shown on the site.
    pub roi: String,
    /// Profit, as shown on the site.
    pub profit: String,
}

/// One row of a competition ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionEntry {
    /// 1-based position in parse order.
    pub rank: usize,
    /// Trader nickname.
    pub name: String,
    /// Return, as shown on the site.
    pub roi: String,
    /// Distance to the qualifying threshold, as shown on the site.
    pub back: String,
    /// Prize for this position.
    pub prize: String,
}

impl Ranked for LeaderboardEntry {
    fn rank(&self) -> usize {
        self.rank
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn roi(&self) -> &str {
        &self.roi
    }
}

impl Ranked for CompetitionEntry {
    fn rank(&self) -> usize {
        self.rank
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn roi(&self) -> &str {
        &self.roi
    }
}
