pub mod aggregate;
pub mod content;
pub mod hashtags;
pub mod insights;
pub mod metrics;
pub mod posting;

pub use aggregate::{CompetitorAggregator, MetricsRow};
pub use content::{ContentPerformance, ContentPerformanceAnalyzer, EngagementStats};
pub use hashtags::{
    normalize_hashtag, HashtagAdoption, HashtagAnalyzer, HashtagConfig, HashtagCount,
    HashtagEngagement, HashtagReport,
};
pub use insights::{
    Benchmarks, CompetitiveGaps, InsightGenerator, Insights, RecommendationConfig,
    Recommendations, TopPerformers, UNKNOWN_CONTENT_TYPE,
};
pub use metrics::{engagement_rate, mean, median, round_to, sample_std_dev};
pub use posting::{PostingPatternAnalyzer, PostingPatterns};
