//! Conversion of acquisition records into the typed dataset.
//!
//! Input is a JSON object keyed by username. Key order is preserved and
//! becomes dataset order.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::analysis::normalize_hashtag;
use crate::{AnalyticsError, CompetitorDataset, ContentType, Post, PostedTime, Profile, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfileRecord {
    #[serde(default)]
    pub profile: RawProfile,
    #[serde(default)]
    pub posts: Vec<RawPost>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub followers: i64,
    pub following: i64,
    pub posts_count: i64,
    pub verified: bool,
}

/// A post as delivered by the acquisition layer. Any `engagement` field in
/// the source is ignored; engagement is always recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPost {
    pub date: Option<String>,
    #[serde(default)]
    pub content: String,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_time: Option<String>,
}

pub fn parse_dataset(json: &str) -> Result<CompetitorDataset> {
    let records: Map<String, Value> = serde_json::from_str(json)?;
    let mut parsed = Vec::with_capacity(records.len());
    for (username, value) in records {
        let record: RawProfileRecord = serde_json::from_value(value)?;
        parsed.push((username, record));
    }
    dataset_from_records(parsed)
}

/// Validates records in order and stops at the first malformed one.
pub fn dataset_from_records<I>(records: I) -> Result<CompetitorDataset>
where
    I: IntoIterator<Item = (String, RawProfileRecord)>,
{
    let mut dataset = CompetitorDataset::new();
    for (username, record) in records {
        let profile = convert_profile(&username, &record.profile)?;
        let posts = record
            .posts
            .iter()
            .enumerate()
            .map(|(index, raw)| convert_post(&username, index, raw))
            .collect::<Result<Vec<_>>>()?;
        dataset.insert(profile, posts);
    }
    Ok(dataset)
}

/// Inverse of [`parse_dataset`], used to write generated datasets.
pub fn dataset_to_json(dataset: &CompetitorDataset) -> Result<Value> {
    let mut records = Map::new();
    for entry in dataset.iter() {
        let record = RawProfileRecord {
            profile: RawProfile {
                followers: clamp_signed(entry.profile.followers),
                following: clamp_signed(entry.profile.following),
                posts_count: clamp_signed(entry.profile.posts_count),
                verified: entry.profile.verified,
            },
            posts: entry.posts.iter().map(raw_post).collect(),
        };
        records.insert(entry.username().to_string(), serde_json::to_value(record)?);
    }
    Ok(Value::Object(records))
}

/// Lowercased whitespace-separated tokens that start with `#` and carry at
/// least one character after it.
pub fn extract_hashtags(content: &str) -> Vec<String> {
    content
        .split_whitespace()
        .filter(|word| word.starts_with('#') && word.len() > 1)
        .map(|word| word.to_lowercase())
        .collect()
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn convert_profile(username: &str, raw: &RawProfile) -> Result<Profile> {
    Ok(Profile {
        username: username.to_string(),
        followers: non_negative(&profile_field(username, "followers"), raw.followers)?,
        following: non_negative(&profile_field(username, "following"), raw.following)?,
        posts_count: non_negative(&profile_field(username, "posts_count"), raw.posts_count)?,
        verified: raw.verified,
    })
}

fn convert_post(username: &str, index: usize, raw: &RawPost) -> Result<Post> {
    let field = |name: &str| format!("{}.posts[{}].{}", username, index, name);

    let date = raw
        .date
        .as_deref()
        .ok_or_else(|| AnalyticsError::invalid(field("date"), "missing"))?;
    let timestamp = parse_timestamp(date).ok_or_else(|| {
        AnalyticsError::invalid(field("date"), format!("unrecognized timestamp {:?}", date))
    })?;

    let likes = raw
        .likes
        .ok_or_else(|| AnalyticsError::invalid(field("likes"), "missing"))?;
    let comments = raw
        .comments
        .ok_or_else(|| AnalyticsError::invalid(field("comments"), "missing"))?;

    let content_type = raw
        .content_type
        .as_deref()
        .map(|value| {
            ContentType::from_str(value).ok_or_else(|| {
                AnalyticsError::invalid(field("content_type"), format!("unknown value {:?}", value))
            })
        })
        .transpose()?;
    let posted_time = raw
        .posted_time
        .as_deref()
        .map(|value| {
            PostedTime::from_str(value).ok_or_else(|| {
                AnalyticsError::invalid(field("posted_time"), format!("unknown value {:?}", value))
            })
        })
        .transpose()?;

    Ok(Post {
        username: username.to_string(),
        timestamp,
        content: raw.content.clone(),
        likes: non_negative(&field("likes"), likes)?,
        comments: non_negative(&field("comments"), comments)?,
        hashtags: convert_hashtags(&field("hashtags"), raw.hashtags.as_ref()),
        content_type,
        posted_time,
    })
}

/// Anything other than an array of strings counts as no hashtag data.
fn convert_hashtags(field: &str, value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            let tokens: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            match tokens {
                Some(tokens) => Some(tokens.into_iter().filter_map(normalize_hashtag).collect()),
                None => {
                    warn!(field = %field, "discarding hashtag list with non-string entries");
                    None
                }
            }
        }
        Some(_) => {
            warn!(field = %field, "discarding malformed hashtag data");
            None
        }
    }
}

fn raw_post(post: &Post) -> RawPost {
    RawPost {
        date: Some(post.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        content: post.content.clone(),
        likes: Some(clamp_signed(post.likes)),
        comments: Some(clamp_signed(post.comments)),
        hashtags: post
            .hashtags
            .as_ref()
            .map(|tags| Value::Array(tags.iter().cloned().map(Value::String).collect())),
        content_type: post.content_type.map(|value| value.label().to_string()),
        posted_time: post.posted_time.map(|value| value.label().to_string()),
    }
}

fn profile_field(username: &str, name: &str) -> String {
    format!("{}.profile.{}", username, name)
}

fn non_negative(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        AnalyticsError::invalid(field, format!("must be non-negative, got {}", value))
    })
}

fn clamp_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
