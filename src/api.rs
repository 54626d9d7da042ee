use competitor_analytics::analysis::{Insights, UNKNOWN_CONTENT_TYPE};
use competitor_analytics::AnalysisReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ApiDemoQuery {
    pub users: Option<String>,
    pub posts: Option<usize>,
    pub seed: Option<u64>,
}

impl ApiDemoQuery {
    pub fn usernames(&self) -> Vec<String> {
        self.users
            .as_deref()
            .unwrap_or(crate::DEFAULT_DEMO_USERS)
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiAnalysisResponse {
    pub request_id: String,
    pub report: AnalysisReport,
    pub warnings: Vec<String>,
}

impl ApiAnalysisResponse {
    pub fn from_report(report: AnalysisReport, request_id: String) -> Self {
        let mut warnings = Vec::new();
        if report.metrics.is_empty() {
            warnings.push("no profile had posts; metrics and insights are empty".to_string());
        }
        if report
            .insights
            .recommendations
            .as_ref()
            .is_some_and(|recommendations| {
                recommendations.optimal_content_type == UNKNOWN_CONTENT_TYPE
            })
        {
            warnings.push("posts carry no content type; optimal content type unknown".to_string());
        }
        Self {
            request_id,
            report,
            warnings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiInsightsResponse {
    pub request_id: String,
    pub insights: Insights,
}
