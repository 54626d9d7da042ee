pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod report;
pub mod synthetic;

use chrono::{Datelike, NaiveDateTime, Weekday};
use indexmap::IndexMap;
use serde::Serialize;

pub use error::{AnalyticsError, Result};
pub use report::{build_report, AnalysisReport, ProfileAnalysis};

/// Post format. Variants are declared alphabetically; ordered maps and
/// best-performer tie-breaks rely on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Carousel,
    Photo,
    Reel,
    Video,
}

impl ContentType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "carousel" | "album" => Some(ContentType::Carousel),
            "photo" | "image" => Some(ContentType::Photo),
            "reel" => Some(ContentType::Reel),
            "video" => Some(ContentType::Video),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentType::Carousel => "carousel",
            ContentType::Photo => "photo",
            ContentType::Reel => "reel",
            ContentType::Video => "video",
        }
    }
}

/// Coarse time-of-day bucket, ordered morning to night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostedTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PostedTime {
    pub const ALL: [PostedTime; 4] = [
        PostedTime::Morning,
        PostedTime::Afternoon,
        PostedTime::Evening,
        PostedTime::Night,
    ];

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "morning" => Some(PostedTime::Morning),
            "afternoon" => Some(PostedTime::Afternoon),
            "evening" => Some(PostedTime::Evening),
            "night" => Some(PostedTime::Night),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostedTime::Morning => "morning",
            PostedTime::Afternoon => "afternoon",
            PostedTime::Evening => "evening",
            PostedTime::Night => "night",
        }
    }

    /// Representative hour range (inclusive) used when a timestamp has to be
    /// synthesized for a bucket.
    pub fn hour_range(self) -> (u32, u32) {
        match self {
            PostedTime::Morning => (6, 11),
            PostedTime::Afternoon => (12, 16),
            PostedTime::Evening => (17, 20),
            PostedTime::Night => (21, 23),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub username: String,
    pub timestamp: NaiveDateTime,
    pub content: String,
    pub likes: u64,
    pub comments: u64,
    /// `None` when the source carried no usable hashtag collection.
    pub hashtags: Option<Vec<String>>,
    pub content_type: Option<ContentType>,
    pub posted_time: Option<PostedTime>,
}

impl Post {
    pub fn engagement(&self) -> u64 {
        self.likes.saturating_add(self.comments)
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_weekday(self.timestamp.weekday())
    }

    pub fn hashtag_count(&self) -> usize {
        self.hashtags.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub posts_count: u64,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub profile: Profile,
    pub posts: Vec<Post>,
}

impl ProfileData {
    pub fn username(&self) -> &str {
        &self.profile.username
    }
}

/// Competitor profiles keyed by username, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitorDataset {
    entries: IndexMap<String, ProfileData>,
}

impl CompetitorDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a profile. An existing entry with the same username is replaced
    /// in place and keeps its position.
    pub fn insert(&mut self, profile: Profile, posts: Vec<Post>) {
        let username = profile.username.clone();
        self.entries.insert(username, ProfileData { profile, posts });
    }

    pub fn get(&self, username: &str) -> Option<&ProfileData> {
        self.entries.get(username)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileData> {
        self.entries.values()
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every post in the dataset, concatenated in dataset order.
    pub fn all_posts(&self) -> impl Iterator<Item = &Post> {
        self.entries.values().flat_map(|entry| entry.posts.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Formats a value that is already expressed as a percentage.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
