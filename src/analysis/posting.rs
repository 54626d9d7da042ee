use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analysis::metrics::{arg_max, mean};
use crate::{DayOfWeek, Post, PostedTime};

/// Days in the fixed observation window behind `avg_posts_per_day`.
const WINDOW_DAYS: f64 = 7.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostingPatterns {
    pub daily_distribution: BTreeMap<DayOfWeek, usize>,
    pub time_engagement: BTreeMap<PostedTime, f64>,
    pub optimal_day: Option<DayOfWeek>,
    pub optimal_time: Option<PostedTime>,
    pub total_posts: usize,
    pub avg_posts_per_day: f64,
}

impl PostingPatterns {
    pub fn is_empty(&self) -> bool {
        self.total_posts == 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostingPatternAnalyzer;

impl PostingPatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, posts: &[Post]) -> PostingPatterns {
        if posts.is_empty() {
            debug!("no posts to analyze for posting patterns");
            return PostingPatterns::default();
        }

        let mut daily_distribution: BTreeMap<DayOfWeek, usize> = BTreeMap::new();
        let mut bucket_engagement: BTreeMap<PostedTime, Vec<f64>> = BTreeMap::new();

        for post in posts {
            *daily_distribution.entry(post.day_of_week()).or_insert(0) += 1;
            if let Some(bucket) = post.posted_time {
                bucket_engagement
                    .entry(bucket)
                    .or_default()
                    .push(post.engagement() as f64);
            }
        }

        let time_engagement: BTreeMap<PostedTime, f64> = bucket_engagement
            .into_iter()
            .map(|(bucket, values)| (bucket, mean(&values)))
            .collect();

        // BTreeMap iteration follows Monday..Sunday and morning..night, which
        // is the tie-break order.
        let optimal_day = arg_max(daily_distribution.iter().map(|(day, count)| (*day, *count)));
        let optimal_time = arg_max(time_engagement.iter().map(|(bucket, avg)| (*bucket, *avg)));

        PostingPatterns {
            daily_distribution,
            time_engagement,
            optimal_day,
            optimal_time,
            total_posts: posts.len(),
            avg_posts_per_day: posts.len() as f64 / WINDOW_DAYS,
        }
    }
}
