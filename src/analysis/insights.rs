use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::aggregate::{CompetitorAggregator, MetricsRow};
use crate::analysis::content::ContentPerformanceAnalyzer;
use crate::analysis::metrics::{arg_max, mean, round_to};
use crate::{CompetitorDataset, Result};

/// Reported when no post in the dataset carries a content type.
pub const UNKNOWN_CONTENT_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub engagement_multiplier: f64,
    pub frequency_multiplier: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            engagement_multiplier: 1.2,
            frequency_multiplier: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformers {
    pub highest_engagement: String,
    pub most_followers: String,
    pub most_active: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Benchmarks {
    pub avg_engagement_rate: f64,
    pub avg_followers: f64,
    pub avg_posting_frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub optimal_content_type: String,
    pub target_engagement_rate: f64,
    pub recommended_posting_frequency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitiveGaps {
    pub engagement_leader_advantage: f64,
    pub follower_leader_advantage: f64,
    pub activity_leader_advantage: f64,
}

/// Cross-competitor findings. Every section is absent when there was nothing
/// to compare.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_performers: Option<TopPerformers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<Benchmarks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitive_gaps: Option<CompetitiveGaps>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.top_performers.is_none()
            && self.benchmarks.is_none()
            && self.recommendations.is_none()
            && self.competitive_gaps.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    config: RecommendationConfig,
    aggregator: CompetitorAggregator,
    content: ContentPerformanceAnalyzer,
}

impl InsightGenerator {
    pub fn new(config: RecommendationConfig) -> Self {
        Self {
            config,
            aggregator: CompetitorAggregator::new(),
            content: ContentPerformanceAnalyzer::new(),
        }
    }

    pub fn generate(&self, dataset: &CompetitorDataset) -> Result<Insights> {
        if dataset.is_empty() {
            debug!("empty dataset, no insights");
            return Ok(Insights::default());
        }
        let rows = self.aggregator.aggregate(dataset)?;
        Ok(self.generate_from_rows(dataset, &rows))
    }

    /// Same as [`generate`](Self::generate) for callers that already hold the
    /// aggregator output for `dataset`.
    pub fn generate_from_rows(&self, dataset: &CompetitorDataset, rows: &[MetricsRow]) -> Insights {
        let leaders = (
            arg_max(rows.iter().map(|row| (row, row.engagement_rate))),
            arg_max(rows.iter().map(|row| (row, row.followers))),
            arg_max(rows.iter().map(|row| (row, row.posts_per_week))),
        );
        let (Some(top_engagement), Some(top_followers), Some(most_active)) = leaders else {
            debug!("no metrics rows, no insights");
            return Insights::default();
        };

        let avg_engagement_rate = column_mean(rows, |row| row.engagement_rate);
        let avg_followers = column_mean(rows, |row| row.followers as f64);
        let avg_posting_frequency = column_mean(rows, |row| row.posts_per_week);

        let optimal_content_type = self
            .content
            .analyze(dataset.all_posts())
            .best_performing
            .map(|content_type| content_type.label().to_string())
            .unwrap_or_else(|| UNKNOWN_CONTENT_TYPE.to_string());

        let frequency = round_to(avg_posting_frequency * self.config.frequency_multiplier, 1);

        Insights {
            top_performers: Some(TopPerformers {
                highest_engagement: top_engagement.username.clone(),
                most_followers: top_followers.username.clone(),
                most_active: most_active.username.clone(),
            }),
            benchmarks: Some(Benchmarks {
                avg_engagement_rate,
                avg_followers,
                avg_posting_frequency,
            }),
            recommendations: Some(Recommendations {
                optimal_content_type,
                target_engagement_rate: round_to(
                    avg_engagement_rate * self.config.engagement_multiplier,
                    2,
                ),
                recommended_posting_frequency: format!("{:.1} posts per week", frequency),
            }),
            // Two decimals; the follower gap is truncated to whole followers.
            competitive_gaps: Some(CompetitiveGaps {
                engagement_leader_advantage: round_to(
                    top_engagement.engagement_rate - avg_engagement_rate,
                    2,
                ),
                follower_leader_advantage: (top_followers.followers as f64 - avg_followers)
                    .trunc(),
                activity_leader_advantage: round_to(
                    most_active.posts_per_week - avg_posting_frequency,
                    2,
                ),
            }),
        }
    }
}

fn column_mean(rows: &[MetricsRow], column: impl Fn(&MetricsRow) -> f64) -> f64 {
    let values: Vec<f64> = rows.iter().map(column).collect();
    mean(&values)
}
