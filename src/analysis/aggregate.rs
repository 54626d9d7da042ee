use serde::Serialize;
use tracing::debug;

use crate::analysis::metrics::{engagement_rate, round_to};
use crate::analysis::posting::PostingPatternAnalyzer;
use crate::{AnalyticsError, CompetitorDataset, ProfileData, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub posts_count: u64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_engagement: f64,
    pub engagement_rate: f64,
    pub follower_following_ratio: f64,
    /// Posts per 1000 followers.
    pub posts_followers_ratio: f64,
    pub posts_per_week: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CompetitorAggregator {
    posting: PostingPatternAnalyzer,
}

impl CompetitorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One row per profile that has posts, in dataset order.
    pub fn aggregate(&self, dataset: &CompetitorDataset) -> Result<Vec<MetricsRow>> {
        let mut rows = Vec::with_capacity(dataset.len());
        for entry in dataset.iter() {
            if entry.posts.is_empty() {
                debug!(username = entry.username(), "skipping profile without posts");
                continue;
            }
            rows.push(self.metrics_for(entry)?);
        }
        Ok(rows)
    }

    fn metrics_for(&self, entry: &ProfileData) -> Result<MetricsRow> {
        let profile = &entry.profile;
        let posts = &entry.posts;
        let count = posts.len() as f64;

        let avg_likes = posts.iter().map(|post| post.likes as f64).sum::<f64>() / count;
        let avg_comments = posts.iter().map(|post| post.comments as f64).sum::<f64>() / count;
        let avg_engagement = posts
            .iter()
            .map(|post| post.engagement() as f64)
            .sum::<f64>()
            / count;

        // Averages are truncated toward zero before the rate is taken.
        let engagement_rate = engagement_rate(
            avg_likes as i64,
            avg_comments as i64,
            to_signed(entry.username(), "followers", profile.followers)?,
        )?;

        let follower_following_ratio = if profile.following == 0 {
            0.0
        } else {
            profile.followers as f64 / profile.following as f64
        };
        let posts_followers_ratio = if profile.followers == 0 {
            0.0
        } else {
            profile.posts_count as f64 / profile.followers as f64 * 1000.0
        };

        let patterns = self.posting.analyze(posts);

        Ok(MetricsRow {
            username: profile.username.clone(),
            followers: profile.followers,
            following: profile.following,
            posts_count: profile.posts_count,
            avg_likes: round_to(avg_likes, 2),
            avg_comments: round_to(avg_comments, 2),
            avg_engagement: round_to(avg_engagement, 2),
            engagement_rate,
            follower_following_ratio: round_to(follower_following_ratio, 2),
            posts_followers_ratio: round_to(posts_followers_ratio, 2),
            posts_per_week: round_to(patterns.avg_posts_per_day * 7.0, 2),
            verified: profile.verified,
        })
    }
}

fn to_signed(username: &str, field: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        AnalyticsError::invalid(
            format!("{}.profile.{}", username, field),
            format!("value {} is out of range", value),
        )
    })
}
