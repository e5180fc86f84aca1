//! Match statistics tracking.

use std::time::Instant;

use gog_core::{EndReason, Side};

use crate::runner::MatchReport;

/// Current process memory usage in bytes (RSS), where the platform exposes it.
#[cfg(target_os = "linux")]
pub fn get_memory_usage() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(target_os = "linux"))]
pub fn get_memory_usage() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Totals over every match played so far.
#[derive(Debug, Default)]
pub struct SimStats {
    pub games: u64,
    pub player_wins: u64,
    pub opponent_wins: u64,
    /// Matches cut off by the ply limit
    pub unfinished: u64,

    /// Breakdown of how finished matches ended
    pub flag_captured: u64,
    pub flag_home: u64,
    pub contested_arrivals: u64,
    pub forfeits: u64,

    pub total_plies: u64,
    pub longest_match: u64,
    pub challenges: u64,
    pub passes: u64,

    /// For rate calculation
    start_time: Option<Instant>,
    last_log_time: Option<Instant>,
    last_log_games: u64,
}

impl SimStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_log_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record(&mut self, report: &MatchReport) {
        self.games += 1;
        self.total_plies += report.plies as u64;
        self.longest_match = self.longest_match.max(report.plies as u64);
        self.challenges += report.challenges as u64;
        self.passes += report.passes as u64;

        match report.winner {
            Some(Side::Player) => self.player_wins += 1,
            Some(Side::Opponent) => self.opponent_wins += 1,
            None => self.unfinished += 1,
        }
        match report.reason {
            Some(EndReason::FlagCaptured) => self.flag_captured += 1,
            Some(EndReason::FlagHome) => self.flag_home += 1,
            Some(EndReason::ContestedArrival) => self.contested_arrivals += 1,
            Some(EndReason::Forfeit) => self.forfeits += 1,
            None => {}
        }
    }

    pub fn average_plies(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f64 / self.games as f64
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        match self.last_log_time {
            Some(last) => last.elapsed().as_secs() >= interval_secs,
            None => true,
        }
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self) {
        let now = Instant::now();
        let elapsed_total = self.start_time.map(|s| s.elapsed().as_secs()).unwrap_or(0);

        let rate = match self.last_log_time {
            Some(last) if last.elapsed().as_secs_f64() > 0.0 => {
                (self.games - self.last_log_games) as f64 / last.elapsed().as_secs_f64()
            }
            _ => 0.0,
        };

        let mem_str = get_memory_usage()
            .map(|m| format!(" mem={}", format_bytes(m)))
            .unwrap_or_default();

        println!(
            "[{:02}:{:02}:{:02}] games={} rate={:.0}/s avg_plies={:.1}{}",
            elapsed_total / 3600,
            (elapsed_total % 3600) / 60,
            elapsed_total % 60,
            self.games,
            rate,
            self.average_plies(),
            mem_str,
        );
        println!(
            "           results: player={} opponent={} unfinished={}",
            self.player_wins, self.opponent_wins, self.unfinished
        );

        self.last_log_time = Some(now);
        self.last_log_games = self.games;
    }

    /// Print final summary
    pub fn print_summary(&self) {
        println!("Games played: {}", self.games);
        println!("  - Player wins: {}", self.player_wins);
        println!("  - Opponent wins: {}", self.opponent_wins);
        println!("  - Unfinished: {}", self.unfinished);
        println!("Endings:");
        println!("  - Flag captured: {}", self.flag_captured);
        println!("  - Flag home: {}", self.flag_home);
        println!("  - Contested arrival: {}", self.contested_arrivals);
        println!("  - Forfeit: {}", self.forfeits);
        println!("Average plies: {:.1}", self.average_plies());
        println!("Longest match: {} plies", self.longest_match);
        println!("Challenges: {}", self.challenges);
        println!("Opponent passes: {}", self.passes);

        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                println!("Average rate: {:.0} games/sec", self.games as f64 / elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(winner: Option<Side>, reason: Option<EndReason>, plies: usize) -> MatchReport {
        MatchReport {
            seed: 0,
            winner,
            reason,
            plies,
            challenges: 2,
            passes: 0,
        }
    }

    #[test]
    fn test_record_tallies() {
        let mut stats = SimStats::new();
        stats.record(&report(Some(Side::Player), Some(EndReason::FlagHome), 40));
        stats.record(&report(Some(Side::Opponent), Some(EndReason::FlagCaptured), 60));
        stats.record(&report(None, None, 100));

        assert_eq!(stats.games, 3);
        assert_eq!(stats.player_wins, 1);
        assert_eq!(stats.opponent_wins, 1);
        assert_eq!(stats.unfinished, 1);
        assert_eq!(stats.flag_home, 1);
        assert_eq!(stats.flag_captured, 1);
        assert_eq!(stats.longest_match, 100);
        assert_eq!(stats.challenges, 6);
        assert!((stats.average_plies() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
