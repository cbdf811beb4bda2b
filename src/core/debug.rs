//! Rolling statistics over recent planner calls

use std::collections::VecDeque;

use crate::search::{SearchStats, Termination};

#[derive(Debug, Clone, Copy)]
struct Sample {
    expansions: usize,
    generated: usize,
    goal: bool,
    usable: bool,
}

/// Planner statistics tracker
#[derive(Debug)]
pub struct PlannerStats {
    /// Recent samples for averaging
    samples: VecDeque<Sample>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Average expansions per search
    avg_expansions: f32,
    /// Average nodes generated per search
    avg_generated: f32,
    /// Fraction of recent searches that reached the goal
    goal_rate: f32,
    /// Most expansions seen in the window
    max_expansions: usize,
    /// Total searches recorded
    total_searches: u64,
    /// Total searches whose plan was too short to use
    total_unusable: u64,
}

impl PlannerStats {
    /// Create a tracker keeping the last 120 searches
    pub fn new() -> Self {
        Self::with_window(120)
    }

    /// Create a tracker keeping the last `max_samples` searches
    pub fn with_window(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
            avg_expansions: 0.0,
            avg_generated: 0.0,
            goal_rate: 0.0,
            max_expansions: 0,
            total_searches: 0,
            total_unusable: 0,
        }
    }

    /// Record one search
    pub fn record(&mut self, stats: &SearchStats, termination: Termination, usable: bool) {
        self.total_searches += 1;
        if !usable {
            self.total_unusable += 1;
        }

        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample {
            expansions: stats.expansions,
            generated: stats.generated,
            goal: termination == Termination::GoalReached,
            usable,
        });

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.samples.is_empty() {
            return;
        }

        let count = self.samples.len() as f32;
        let mut expansions = 0;
        let mut generated = 0;
        let mut goals = 0;
        let mut max = 0_usize;

        for s in &self.samples {
            expansions += s.expansions;
            generated += s.generated;
            goals += usize::from(s.goal);
            max = max.max(s.expansions);
        }

        self.avg_expansions = expansions as f32 / count;
        self.avg_generated = generated as f32 / count;
        self.goal_rate = goals as f32 / count;
        self.max_expansions = max;
    }

    /// Average expansions per search in the window
    pub fn avg_expansions(&self) -> f32 {
        self.avg_expansions
    }

    /// Average generated nodes per search in the window
    pub fn avg_generated(&self) -> f32 {
        self.avg_generated
    }

    /// Fraction of searches in the window that reached the goal
    pub fn goal_rate(&self) -> f32 {
        self.goal_rate
    }

    /// Most expansions in the window
    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    /// Number of unusable plans in the window
    pub fn recent_unusable(&self) -> usize {
        self.samples.iter().filter(|s| !s.usable).count()
    }

    /// Total searches recorded
    pub fn total_searches(&self) -> u64 {
        self.total_searches
    }

    /// Total unusable plans recorded
    pub fn total_unusable(&self) -> u64 {
        self.total_unusable
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "Searches: {} | Expanded: {:.1} avg (max {}) | Goal: {:.0}% | Unusable: {}",
            self.total_searches,
            self.avg_expansions,
            self.max_expansions,
            self.goal_rate * 100.0,
            self.total_unusable
        )
    }
}

impl Default for PlannerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(expansions: usize, generated: usize) -> SearchStats {
        SearchStats {
            expansions,
            generated,
            ..Default::default()
        }
    }

    #[test]
    fn test_averages() {
        let mut tracker = PlannerStats::new();
        tracker.record(&stats(10, 20), Termination::GoalReached, true);
        tracker.record(&stats(30, 40), Termination::BudgetExhausted, false);

        assert!((tracker.avg_expansions() - 20.0).abs() < 1e-5);
        assert!((tracker.avg_generated() - 30.0).abs() < 1e-5);
        assert!((tracker.goal_rate() - 0.5).abs() < 1e-5);
        assert_eq!(tracker.max_expansions(), 30);
        assert_eq!(tracker.total_unusable(), 1);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut tracker = PlannerStats::with_window(2);
        tracker.record(&stats(100, 0), Termination::FrontierExhausted, false);
        tracker.record(&stats(2, 0), Termination::GoalReached, true);
        tracker.record(&stats(4, 0), Termination::GoalReached, true);

        assert!((tracker.avg_expansions() - 3.0).abs() < 1e-5);
        assert_eq!(tracker.max_expansions(), 4);
        assert_eq!(tracker.recent_unusable(), 0);
        assert_eq!(tracker.total_unusable(), 1);
        assert_eq!(tracker.total_searches(), 3);
    }

    #[test]
    fn test_format_stats() {
        let mut tracker = PlannerStats::new();
        tracker.record(&stats(8, 12), Termination::GoalReached, true);

        let line = tracker.format_stats();
        assert!(line.contains("Searches: 1"));
        assert!(line.contains("Goal: 100%"));
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = PlannerStats::default();
        assert_eq!(tracker.total_searches(), 0);
        assert_eq!(tracker.avg_expansions(), 0.0);
        assert!(tracker.format_stats().contains("Searches: 0"));
    }
}
