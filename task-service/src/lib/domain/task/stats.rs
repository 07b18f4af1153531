use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::project::models::ProjectId;
use crate::domain::task::models::Priority;
use crate::domain::task::models::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentPerformance {
    pub completed_last_week: usize,
    pub total_last_week: usize,
}

/// Aggregate view over one user's tasks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub by_priority: PriorityBreakdown,
    /// Tasks without a project are not counted here.
    pub by_project: HashMap<ProjectId, usize>,
    /// Percentage of completed tasks, rounded to two decimals.
    pub completion_rate: f64,
    pub recent_performance: RecentPerformance,
}

impl TaskStats {
    const RECENT_WINDOW_DAYS: i64 = 7;

    /// Compute statistics as seen at `now`.
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let window_start = now - Duration::days(Self::RECENT_WINDOW_DAYS);
        let mut stats = TaskStats {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            if task.completed {
                stats.completed += 1;
            }

            match task.priority {
                Priority::High => stats.by_priority.high += 1,
                Priority::Medium => stats.by_priority.medium += 1,
                Priority::Low => stats.by_priority.low += 1,
            }

            if let Some(project_id) = task.project_id {
                *stats.by_project.entry(project_id).or_insert(0) += 1;
            }

            if task.completed && task.updated_at >= window_start {
                stats.recent_performance.completed_last_week += 1;
            }
            if task.created_at >= window_start {
                stats.recent_performance.total_last_week += 1;
            }
        }

        stats.pending = stats.total - stats.completed;
        stats.completion_rate = if stats.total == 0 {
            0.0
        } else {
            let rate = stats.completed as f64 / stats.total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        };

        stats
    }
}
