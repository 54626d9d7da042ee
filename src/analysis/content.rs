use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analysis::metrics::{arg_max, mean, median, round_to, sample_std_dev};
use crate::{ContentType, Post};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Absent for a single post.
    pub std: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentPerformance {
    pub distribution: BTreeMap<ContentType, usize>,
    pub engagement_stats: BTreeMap<ContentType, EngagementStats>,
    pub best_performing: Option<ContentType>,
    pub total_content_types: usize,
}

impl ContentPerformance {
    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPerformanceAnalyzer;

impl ContentPerformanceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Works over one profile's posts or a whole corpus. Posts without a
    /// content type are left out of every statistic.
    pub fn analyze<'a, I>(&self, posts: I) -> ContentPerformance
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut groups: BTreeMap<ContentType, Vec<f64>> = BTreeMap::new();
        for post in posts {
            if let Some(content_type) = post.content_type {
                groups
                    .entry(content_type)
                    .or_default()
                    .push(post.engagement() as f64);
            }
        }

        if groups.is_empty() {
            debug!("no content type data available");
            return ContentPerformance::default();
        }

        // Keys iterate alphabetically, so equal means go to the earlier name.
        let best_performing = arg_max(
            groups
                .iter()
                .map(|(content_type, values)| (*content_type, mean(values))),
        );

        let distribution = groups
            .iter()
            .map(|(content_type, values)| (*content_type, values.len()))
            .collect();

        let engagement_stats = groups
            .iter()
            .map(|(content_type, values)| {
                let stats = EngagementStats {
                    count: values.len(),
                    mean: round_to(mean(values), 2),
                    median: round_to(median(values), 2),
                    std: sample_std_dev(values).map(|std| round_to(std, 2)),
                };
                (*content_type, stats)
            })
            .collect();

        ContentPerformance {
            distribution,
            engagement_stats,
            best_performing,
            total_content_types: groups.len(),
        }
    }
}
