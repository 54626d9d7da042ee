use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::ingest::extract_hashtags;
use crate::{CompetitorDataset, ContentType, Post, PostedTime, Profile};

const WINDOW_DAYS: i64 = 90;

/// Content type mix, weighted toward photos.
const CONTENT_MIX: [(ContentType, f64); 4] = [
    (ContentType::Photo, 0.4),
    (ContentType::Carousel, 0.3),
    (ContentType::Video, 0.2),
    (ContentType::Reel, 0.1),
];

const HASHTAG_POOL: [&str; 23] = [
    "#instagram",
    "#photography",
    "#love",
    "#instagood",
    "#photooftheday",
    "#fashion",
    "#beautiful",
    "#happy",
    "#cute",
    "#followme",
    "#like4like",
    "#nature",
    "#art",
    "#food",
    "#style",
    "#amazing",
    "#beauty",
    "#fitness",
    "#travel",
    "#lifestyle",
    "#motivation",
    "#inspiration",
    "#business",
];

const CAPTIONS: [&str; 6] = [
    "New drop is live",
    "Behind the scenes today",
    "Which one is your favorite?",
    "Weekend plans sorted",
    "Thank you for 10 years",
    "Fresh look for the season",
];

/// Builds a reproducible demo dataset. Each profile gets its own RNG seeded
/// from its username and `seed`, so adding a profile leaves the others
/// unchanged.
pub fn generate_dataset(usernames: &[String], posts_per_profile: usize, seed: u64) -> CompetitorDataset {
    let mut dataset = CompetitorDataset::new();
    for username in usernames {
        let mut rng = StdRng::seed_from_u64(profile_seed(username, seed));
        let profile = generate_profile(username, &mut rng);
        let posts = (0..posts_per_profile)
            .map(|_| generate_post(username, &mut rng))
            .collect();
        dataset.insert(profile, posts);
    }
    dataset
}

fn generate_profile(username: &str, rng: &mut StdRng) -> Profile {
    Profile {
        username: username.to_string(),
        followers: rng.gen_range(10_000..1_000_000),
        following: rng.gen_range(100..5_000),
        posts_count: rng.gen_range(50..2_000),
        verified: rng.gen::<f64>() < 0.2,
    }
}

fn generate_post(username: &str, rng: &mut StdRng) -> Post {
    let posted_time = PostedTime::ALL[rng.gen_range(0..PostedTime::ALL.len())];
    let (start_hour, end_hour) = posted_time.hour_range();
    let timestamp = anchor()
        - Duration::days(rng.gen_range(1..WINDOW_DAYS))
        + Duration::hours(rng.gen_range(start_hour..=end_hour) as i64)
        + Duration::minutes(rng.gen_range(0..60));

    let caption = CAPTIONS[rng.gen_range(0..CAPTIONS.len())];
    let tag_count = rng.gen_range(0..=5);
    let tags: Vec<&str> = HASHTAG_POOL
        .choose_multiple(rng, tag_count)
        .copied()
        .collect();
    let content = if tags.is_empty() {
        caption.to_string()
    } else {
        format!("{} {}", caption, tags.join(" "))
    };

    Post {
        username: username.to_string(),
        timestamp,
        hashtags: Some(extract_hashtags(&content)),
        content,
        likes: rng.gen_range(50..100_000),
        comments: rng.gen_range(5..5_000),
        content_type: Some(sample_content_type(rng)),
        posted_time: Some(posted_time),
    }
}

fn sample_content_type(rng: &mut StdRng) -> ContentType {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for (content_type, weight) in CONTENT_MIX {
        cumulative += weight;
        if roll < cumulative {
            return content_type;
        }
    }
    ContentType::Photo
}

fn anchor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn profile_seed(username: &str, seed: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(seed.to_be_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
