use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::{CompetitorDataset, Post};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HashtagConfig {
    /// Length of the frequency and engagement rankings.
    pub limit: usize,
    /// Length of the cross-competitor adoption ranking.
    pub adoption_limit: usize,
}

impl Default for HashtagConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            adoption_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagEngagement {
    pub hashtag: String,
    pub avg_engagement: f64,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashtagAdoption {
    pub hashtag: String,
    pub competitors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HashtagReport {
    pub top_by_frequency: Vec<HashtagCount>,
    pub top_by_engagement: Vec<HashtagEngagement>,
    pub total_unique_hashtags: usize,
    pub avg_hashtags_per_post: f64,
}

impl HashtagReport {
    pub fn is_empty(&self) -> bool {
        self.total_unique_hashtags == 0
    }
}

#[derive(Default)]
struct Tally {
    occurrences: usize,
    engagement: f64,
}

#[derive(Debug, Clone)]
pub struct HashtagAnalyzer {
    config: HashtagConfig,
}

impl Default for HashtagAnalyzer {
    fn default() -> Self {
        Self::new(HashtagConfig::default())
    }
}

impl HashtagAnalyzer {
    pub fn new(config: HashtagConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, posts: &[Post]) -> HashtagReport {
        let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
        let mut occurrences = 0usize;

        for post in posts {
            let Some(tags) = post.hashtags.as_ref() else {
                continue;
            };
            let engagement = post.engagement() as f64;
            for tag in tags.iter().filter_map(|tag| normalize_hashtag(tag)) {
                let tally = tallies.entry(tag).or_default();
                tally.occurrences += 1;
                tally.engagement += engagement;
                occurrences += 1;
            }
        }

        if occurrences == 0 {
            debug!(posts = posts.len(), "no hashtag occurrences found");
            return HashtagReport::default();
        }

        let mut top_by_frequency: Vec<HashtagCount> = tallies
            .iter()
            .map(|(hashtag, tally)| HashtagCount {
                hashtag: hashtag.clone(),
                count: tally.occurrences,
            })
            .collect();
        top_by_frequency.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.hashtag.cmp(&b.hashtag))
        });
        top_by_frequency.truncate(self.config.limit);

        let mut top_by_engagement: Vec<HashtagEngagement> = tallies
            .iter()
            .map(|(hashtag, tally)| HashtagEngagement {
                hashtag: hashtag.clone(),
                avg_engagement: tally.engagement / tally.occurrences as f64,
                occurrences: tally.occurrences,
            })
            .collect();
        top_by_engagement.sort_by(|a, b| {
            b.avg_engagement
                .partial_cmp(&a.avg_engagement)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.hashtag.cmp(&b.hashtag))
        });
        top_by_engagement.truncate(self.config.limit);

        HashtagReport {
            top_by_frequency,
            top_by_engagement,
            total_unique_hashtags: tallies.len(),
            avg_hashtags_per_post: occurrences as f64 / posts.len() as f64,
        }
    }

    /// Ranks hashtags by how many competitors used them at least once.
    pub fn adoption(&self, dataset: &CompetitorDataset) -> Vec<HashtagAdoption> {
        let mut competitors: BTreeMap<String, usize> = BTreeMap::new();

        for entry in dataset.iter() {
            let used: BTreeSet<String> = entry
                .posts
                .iter()
                .filter_map(|post| post.hashtags.as_ref())
                .flatten()
                .filter_map(|tag| normalize_hashtag(tag))
                .collect();
            for tag in used {
                *competitors.entry(tag).or_insert(0) += 1;
            }
        }

        let mut ranking: Vec<HashtagAdoption> = competitors
            .into_iter()
            .map(|(hashtag, competitors)| HashtagAdoption {
                hashtag,
                competitors,
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.competitors
                .cmp(&a.competitors)
                .then_with(|| a.hashtag.cmp(&b.hashtag))
        });
        ranking.truncate(self.config.adoption_limit);
        ranking
    }
}

/// Lowercases a token and gives it exactly one leading `#`. Tokens with no
/// text after the marker are dropped.
pub fn normalize_hashtag(token: &str) -> Option<String> {
    let body = token.trim().trim_start_matches('#');
    if body.is_empty() {
        return None;
    }
    Some(format!("#{}", body.to_lowercase()))
}
