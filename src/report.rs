use serde::Serialize;

use crate::analysis::{
    CompetitorAggregator, ContentPerformance, ContentPerformanceAnalyzer, HashtagAdoption,
    HashtagAnalyzer, HashtagReport, InsightGenerator, Insights, MetricsRow,
    PostingPatternAnalyzer, PostingPatterns,
};
use crate::config::AnalyticsConfig;
use crate::{CompetitorDataset, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAnalysis {
    pub username: String,
    pub posting_patterns: PostingPatterns,
    pub content_performance: ContentPerformance,
    pub hashtags: HashtagReport,
}

/// Everything the analyzers produce for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metrics: Vec<MetricsRow>,
    pub insights: Insights,
    pub profiles: Vec<ProfileAnalysis>,
    pub hashtag_adoption: Vec<HashtagAdoption>,
}

pub fn build_report(dataset: &CompetitorDataset, config: &AnalyticsConfig) -> Result<AnalysisReport> {
    let posting = PostingPatternAnalyzer::new();
    let content = ContentPerformanceAnalyzer::new();
    let hashtags = HashtagAnalyzer::new(config.hashtags.clone());
    let insights = InsightGenerator::new(config.recommendations.clone());

    let metrics = CompetitorAggregator::new().aggregate(dataset)?;
    let insights = insights.generate_from_rows(dataset, &metrics);

    let profiles = dataset
        .iter()
        .map(|entry| ProfileAnalysis {
            username: entry.username().to_string(),
            posting_patterns: posting.analyze(&entry.posts),
            content_performance: content.analyze(&entry.posts),
            hashtags: hashtags.analyze(&entry.posts),
        })
        .collect();

    Ok(AnalysisReport {
        metrics,
        insights,
        profiles,
        hashtag_adoption: hashtags.adoption(dataset),
    })
}
