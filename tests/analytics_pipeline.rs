use chrono::{NaiveDate, NaiveDateTime};
use competitor_analytics::analysis::{
    engagement_rate, CompetitorAggregator, ContentPerformanceAnalyzer, HashtagAnalyzer,
    HashtagConfig, InsightGenerator, PostingPatternAnalyzer, RecommendationConfig,
    round_to, UNKNOWN_CONTENT_TYPE,
};
use competitor_analytics::config::AnalyticsConfig;
use competitor_analytics::{
    build_report, CompetitorDataset, ContentType, DayOfWeek, Post, PostedTime, Profile,
};

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

fn post(username: &str, likes: u64, comments: u64) -> Post {
    Post {
        username: username.to_string(),
        // 2024-01-01 is a Monday.
        timestamp: at(2024, 1, 1),
        content: String::new(),
        likes,
        comments,
        hashtags: None,
        content_type: None,
        posted_time: None,
    }
}

fn profile(username: &str, followers: u64, following: u64) -> Profile {
    Profile {
        username: username.to_string(),
        followers,
        following,
        posts_count: 10,
        verified: false,
    }
}

fn scenario_dataset() -> CompetitorDataset {
    let mut dataset = CompetitorDataset::new();
    dataset.insert(
        profile("alpha", 1000, 200),
        vec![post("alpha", 100, 20), post("alpha", 200, 10)],
    );
    dataset.insert(profile("beta", 500, 100), vec![post("beta", 10, 2)]);
    dataset
}

#[test]
fn engagement_rate_handles_zero_followers() {
    assert_eq!(engagement_rate(0, 0, 0).unwrap(), 0.0);
    assert_eq!(engagement_rate(500, 20, 0).unwrap(), 0.0);
    assert!((engagement_rate(100, 50, 1000).unwrap() - 15.0).abs() < 1e-9);
}

#[test]
fn engagement_rate_rejects_negative_arguments() {
    assert!(engagement_rate(-1, 0, 100).unwrap_err().is_invalid_input());
    assert!(engagement_rate(0, -1, 100).unwrap_err().is_invalid_input());
    assert!(engagement_rate(0, 0, -100).unwrap_err().is_invalid_input());
}

#[test]
fn engagement_rate_rounds_halves_away_from_zero() {
    // 1 * 100 / 800 = 0.125 exactly.
    assert_eq!(engagement_rate(1, 0, 800).unwrap(), 0.13);
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(2.5, 0), 3.0);
}

#[test]
fn engagement_rate_is_monotonic() {
    let followers = 3_333;
    let mut previous = 0.0;
    for likes in (0..2_000).step_by(7) {
        let rate = engagement_rate(likes, 13, followers).unwrap();
        assert!(rate >= previous);
        previous = rate;
    }
    previous = 0.0;
    for comments in (0..2_000).step_by(11) {
        let rate = engagement_rate(40, comments, followers).unwrap();
        assert!(rate >= previous);
        previous = rate;
    }
}

#[test]
fn posting_patterns_empty_input_is_empty() {
    let patterns = PostingPatternAnalyzer::new().analyze(&[]);
    assert!(patterns.is_empty());
    assert!(patterns.optimal_day.is_none());
    assert!(patterns.optimal_time.is_none());
    assert_eq!(patterns.avg_posts_per_day, 0.0);
}

#[test]
fn posting_patterns_break_ties_by_weekday_and_bucket_order() {
    // Sunday and Tuesday tie on count; buckets tie on mean engagement.
    let mut sunday = post("a", 10, 0);
    sunday.timestamp = at(2024, 1, 7);
    sunday.posted_time = Some(PostedTime::Night);
    let mut tuesday = post("a", 10, 0);
    tuesday.timestamp = at(2024, 1, 2);
    tuesday.posted_time = Some(PostedTime::Afternoon);

    let patterns = PostingPatternAnalyzer::new().analyze(&[sunday, tuesday]);

    assert_eq!(patterns.optimal_day, Some(DayOfWeek::Tuesday));
    assert_eq!(patterns.optimal_time, Some(PostedTime::Afternoon));
    assert_eq!(patterns.total_posts, 2);
    assert!((patterns.avg_posts_per_day - 2.0 / 7.0).abs() < 1e-12);
}

#[test]
fn posting_patterns_skip_time_engagement_without_buckets() {
    let patterns = PostingPatternAnalyzer::new().analyze(&[post("a", 1, 1), post("a", 2, 2)]);
    assert!(patterns.time_engagement.is_empty());
    assert!(patterns.optimal_time.is_none());
    assert_eq!(patterns.daily_distribution.get(&DayOfWeek::Monday), Some(&2));
    assert_eq!(patterns.optimal_day, Some(DayOfWeek::Monday));
}

#[test]
fn posting_patterns_pick_highest_mean_bucket() {
    let mut morning = post("a", 10, 0);
    morning.posted_time = Some(PostedTime::Morning);
    let mut evening = post("a", 50, 0);
    evening.posted_time = Some(PostedTime::Evening);
    let mut evening_low = post("a", 30, 0);
    evening_low.posted_time = Some(PostedTime::Evening);

    let patterns = PostingPatternAnalyzer::new().analyze(&[morning, evening, evening_low]);

    assert_eq!(patterns.optimal_time, Some(PostedTime::Evening));
    assert!((patterns.time_engagement[&PostedTime::Evening] - 40.0).abs() < 1e-9);
}

#[test]
fn content_performance_computes_statistics() {
    let mut posts = Vec::new();
    for (likes, content_type) in [
        (10, ContentType::Photo),
        (20, ContentType::Photo),
        (60, ContentType::Photo),
        (100, ContentType::Video),
    ] {
        let mut item = post("a", likes, 0);
        item.content_type = Some(content_type);
        posts.push(item);
    }
    posts.push(post("a", 1_000, 0));

    let performance = ContentPerformanceAnalyzer::new().analyze(&posts);

    assert_eq!(performance.total_content_types, 2);
    assert_eq!(performance.distribution[&ContentType::Photo], 3);
    let photo = &performance.engagement_stats[&ContentType::Photo];
    assert_eq!(photo.count, 3);
    assert!((photo.mean - 30.0).abs() < 1e-9);
    assert!((photo.median - 20.0).abs() < 1e-9);
    assert!((photo.std.unwrap() - 26.46).abs() < 1e-9);
    assert!(performance.engagement_stats[&ContentType::Video].std.is_none());
    assert_eq!(performance.best_performing, Some(ContentType::Video));
}

#[test]
fn content_performance_ties_resolve_alphabetically() {
    let mut video = post("a", 40, 0);
    video.content_type = Some(ContentType::Video);
    let mut reel = post("a", 40, 0);
    reel.content_type = Some(ContentType::Reel);

    let performance = ContentPerformanceAnalyzer::new().analyze(&[video, reel]);
    assert_eq!(performance.best_performing, Some(ContentType::Reel));
}

#[test]
fn content_performance_without_types_is_empty() {
    let performance = ContentPerformanceAnalyzer::new().analyze(&[post("a", 1, 1)]);
    assert!(performance.is_empty());
    assert!(performance.best_performing.is_none());
}

#[test]
fn hashtag_rankings_break_ties_alphabetically() {
    let mut first = post("a", 100, 0);
    first.hashtags = Some(vec!["#Travel".to_string(), "#food".to_string()]);
    let mut second = post("a", 20, 0);
    second.hashtags = Some(vec!["#art".to_string(), "#travel".to_string()]);
    let mut third = post("a", 20, 0);
    third.hashtags = Some(vec!["#zen".to_string()]);

    let report = HashtagAnalyzer::default().analyze(&[first, second, third]);

    assert_eq!(report.total_unique_hashtags, 4);
    let frequency: Vec<(&str, usize)> = report
        .top_by_frequency
        .iter()
        .map(|entry| (entry.hashtag.as_str(), entry.count))
        .collect();
    assert_eq!(
        frequency,
        vec![("#travel", 2), ("#art", 1), ("#food", 1), ("#zen", 1)]
    );

    let engagement: Vec<&str> = report
        .top_by_engagement
        .iter()
        .map(|entry| entry.hashtag.as_str())
        .collect();
    assert_eq!(engagement, vec!["#food", "#travel", "#art", "#zen"]);
    assert!((report.top_by_engagement[1].avg_engagement - 60.0).abs() < 1e-9);
}

#[test]
fn hashtag_rankings_respect_limit() {
    let mut item = post("a", 1, 0);
    item.hashtags = Some((0..30).map(|idx| format!("#tag{:02}", idx)).collect());

    let analyzer = HashtagAnalyzer::new(HashtagConfig {
        limit: 20,
        adoption_limit: 10,
    });
    let report = analyzer.analyze(&[item]);

    assert_eq!(report.total_unique_hashtags, 30);
    assert_eq!(report.top_by_frequency.len(), 20);
    assert_eq!(report.top_by_engagement.len(), 20);
    assert_eq!(report.top_by_frequency[0].hashtag, "#tag00");
}

#[test]
fn avg_hashtags_per_post_counts_posts_without_hashtags() {
    let mut tagged = post("a", 5, 0);
    tagged.hashtags = Some(vec!["#one".to_string(), "#two".to_string(), "#three".to_string()]);
    let mut empty = post("a", 5, 0);
    empty.hashtags = Some(Vec::new());
    let absent = post("a", 5, 0);
    let posts = vec![tagged, empty, absent];

    let report = HashtagAnalyzer::default().analyze(&posts);

    let total: usize = posts.iter().map(Post::hashtag_count).sum();
    assert_eq!(report.avg_hashtags_per_post, total as f64 / posts.len() as f64);
    assert_eq!(report.avg_hashtags_per_post, 1.0);
}

#[test]
fn hashtag_report_without_occurrences_is_empty() {
    let report = HashtagAnalyzer::default().analyze(&[post("a", 1, 1)]);
    assert!(report.is_empty());
    assert!(report.top_by_frequency.is_empty());
    assert_eq!(report.avg_hashtags_per_post, 0.0);
}

#[test]
fn hashtag_adoption_counts_competitors_not_occurrences() {
    let tagged = |username: &str, tags: &[&str]| {
        let mut item = post(username, 1, 0);
        item.hashtags = Some(tags.iter().map(|tag| tag.to_string()).collect());
        item
    };

    let mut dataset = CompetitorDataset::new();
    dataset.insert(
        profile("a", 100, 10),
        vec![tagged("a", &["#food", "#food"]), tagged("a", &["#food", "#art"])],
    );
    dataset.insert(profile("b", 100, 10), vec![tagged("b", &["#art", "#Food"])]);
    dataset.insert(profile("c", 100, 10), vec![tagged("c", &["#zen"])]);

    let adoption = HashtagAnalyzer::default().adoption(&dataset);
    let ranking: Vec<(&str, usize)> = adoption
        .iter()
        .map(|entry| (entry.hashtag.as_str(), entry.competitors))
        .collect();
    assert_eq!(ranking, vec![("#art", 2), ("#food", 2), ("#zen", 1)]);
}

#[test]
fn dataset_replaces_profiles_in_place() {
    let mut dataset = scenario_dataset();
    dataset.insert(profile("gamma", 10, 1), Vec::new());
    dataset.insert(profile("alpha", 42, 7), vec![post("alpha", 1, 1)]);

    let usernames: Vec<&str> = dataset.usernames().collect();
    assert_eq!(usernames, vec!["alpha", "beta", "gamma"]);
    assert_eq!(dataset.len(), 3);

    let alpha = dataset.get("alpha").unwrap();
    assert_eq!(alpha.profile.followers, 42);
    assert_eq!(alpha.posts.len(), 1);
    assert!(dataset.get("delta").is_none());
    assert_eq!(dataset.all_posts().count(), 2);
}

#[test]
fn aggregator_skips_profiles_without_posts() {
    let mut dataset = scenario_dataset();
    dataset.insert(profile("gamma", 900, 0), Vec::new());

    let rows = CompetitorAggregator::new().aggregate(&dataset).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].username, "alpha");
    assert_eq!(rows[1].username, "beta");
}

#[test]
fn aggregator_computes_scenario_metrics() {
    let rows = CompetitorAggregator::new()
        .aggregate(&scenario_dataset())
        .unwrap();
    let alpha = &rows[0];

    assert!((alpha.avg_likes - 150.0).abs() < 1e-9);
    assert!((alpha.avg_comments - 15.0).abs() < 1e-9);
    assert!((alpha.avg_engagement - 165.0).abs() < 1e-9);
    assert!((alpha.engagement_rate - 16.5).abs() < 1e-9);
    assert!((alpha.follower_following_ratio - 5.0).abs() < 1e-9);
    assert!((alpha.posts_followers_ratio - 10.0).abs() < 1e-9);
    assert!((alpha.posts_per_week - 2.0).abs() < 1e-9);
    assert!((rows[1].engagement_rate - 2.4).abs() < 1e-9);
}

#[test]
fn aggregator_guards_zero_denominators() {
    let mut dataset = CompetitorDataset::new();
    dataset.insert(profile("solo", 0, 0), vec![post("solo", 10, 10)]);

    let rows = CompetitorAggregator::new().aggregate(&dataset).unwrap();

    assert_eq!(rows[0].engagement_rate, 0.0);
    assert_eq!(rows[0].follower_following_ratio, 0.0);
    assert_eq!(rows[0].posts_followers_ratio, 0.0);
}

#[test]
fn aggregator_truncates_averages_before_rate() {
    let mut dataset = CompetitorDataset::new();
    dataset.insert(
        profile("odd", 100, 10),
        vec![post("odd", 1, 0), post("odd", 2, 1)],
    );

    let rows = CompetitorAggregator::new().aggregate(&dataset).unwrap();

    // avg likes 1.5 -> 1, avg comments 0.5 -> 0.
    assert!((rows[0].engagement_rate - 1.0).abs() < 1e-9);
    assert!((rows[0].avg_likes - 1.5).abs() < 1e-9);
}

#[test]
fn insights_match_scenario() {
    let insights = InsightGenerator::default()
        .generate(&scenario_dataset())
        .unwrap();

    let top = insights.top_performers.as_ref().unwrap();
    assert_eq!(top.highest_engagement, "alpha");
    assert_eq!(top.most_followers, "alpha");
    assert_eq!(top.most_active, "alpha");

    let benchmarks = insights.benchmarks.as_ref().unwrap();
    assert!((benchmarks.avg_engagement_rate - 9.45).abs() < 1e-9);
    assert!((benchmarks.avg_followers - 750.0).abs() < 1e-9);
    assert!((benchmarks.avg_posting_frequency - 1.5).abs() < 1e-9);

    let gaps = insights.competitive_gaps.as_ref().unwrap();
    assert_eq!(gaps.engagement_leader_advantage, 7.05);
    assert_eq!(gaps.follower_leader_advantage, 250.0);
    assert_eq!(gaps.activity_leader_advantage, 0.5);

    let recommendations = insights.recommendations.as_ref().unwrap();
    assert_eq!(recommendations.optimal_content_type, UNKNOWN_CONTENT_TYPE);
    assert!((recommendations.target_engagement_rate - 11.34).abs() < 1e-9);
    assert_eq!(recommendations.recommended_posting_frequency, "1.7 posts per week");
}

#[test]
fn competitive_gaps_serialize_rounded() {
    let insights = InsightGenerator::default()
        .generate(&scenario_dataset())
        .unwrap();
    let json = serde_json::to_string(&insights.competitive_gaps).unwrap();

    assert!(json.contains("\"engagement_leader_advantage\":7.05,"));
    assert!(json.contains("\"follower_leader_advantage\":250.0"));
}

#[test]
fn follower_gap_is_whole_followers() {
    let mut dataset = CompetitorDataset::new();
    dataset.insert(profile("big", 1001, 10), vec![post("big", 1, 0)]);
    dataset.insert(profile("small", 0, 10), vec![post("small", 1, 0)]);

    let insights = InsightGenerator::default().generate(&dataset).unwrap();
    let gaps = insights.competitive_gaps.unwrap();

    // 1001 - 500.5 truncates to 500.
    assert_eq!(gaps.follower_leader_advantage, 500.0);
    assert_eq!(insights.benchmarks.unwrap().avg_followers, 500.5);
}

#[test]
fn benchmarks_are_exact_column_means() {
    let mut dataset = scenario_dataset();
    dataset.insert(
        profile("gamma", 7_777, 33),
        vec![post("gamma", 91, 7), post("gamma", 3, 1), post("gamma", 55, 0)],
    );

    let rows = CompetitorAggregator::new().aggregate(&dataset).unwrap();
    let insights = InsightGenerator::default().generate(&dataset).unwrap();
    let benchmarks = insights.benchmarks.unwrap();

    let count = rows.len() as f64;
    let rate: f64 = rows.iter().map(|row| row.engagement_rate).sum::<f64>() / count;
    let followers: f64 = rows.iter().map(|row| row.followers as f64).sum::<f64>() / count;
    let frequency: f64 = rows.iter().map(|row| row.posts_per_week).sum::<f64>() / count;

    assert_eq!(benchmarks.avg_engagement_rate, rate);
    assert_eq!(benchmarks.avg_followers, followers);
    assert_eq!(benchmarks.avg_posting_frequency, frequency);
}

#[test]
fn insight_leaders_tie_to_earliest_row() {
    let mut dataset = CompetitorDataset::new();
    dataset.insert(profile("first", 1000, 10), vec![post("first", 10, 0)]);
    dataset.insert(profile("second", 1000, 10), vec![post("second", 10, 0)]);

    let insights = InsightGenerator::default().generate(&dataset).unwrap();
    let top = insights.top_performers.unwrap();

    assert_eq!(top.highest_engagement, "first");
    assert_eq!(top.most_followers, "first");
    assert_eq!(top.most_active, "first");
}

#[test]
fn insights_are_soft_empty() {
    let generator = InsightGenerator::default();
    assert!(generator.generate(&CompetitorDataset::new()).unwrap().is_empty());

    let mut dataset = CompetitorDataset::new();
    dataset.insert(profile("quiet", 100, 10), Vec::new());
    let insights = generator.generate(&dataset).unwrap();
    assert!(insights.is_empty());
    assert_eq!(serde_json::to_string(&insights).unwrap(), "{}");
}

#[test]
fn insights_use_corpus_wide_content_type() {
    let mut dataset = CompetitorDataset::new();
    let mut reel = post("a", 500, 0);
    reel.content_type = Some(ContentType::Reel);
    let mut photo = post("b", 50, 0);
    photo.content_type = Some(ContentType::Photo);
    dataset.insert(profile("a", 1000, 10), vec![reel]);
    dataset.insert(profile("b", 1000, 10), vec![photo]);

    let generator = InsightGenerator::new(RecommendationConfig::default());
    let insights = generator.generate(&dataset).unwrap();

    assert_eq!(insights.recommendations.unwrap().optimal_content_type, "reel");
}

#[test]
fn insights_serialize_with_expected_keys() {
    let insights = InsightGenerator::default()
        .generate(&scenario_dataset())
        .unwrap();
    let value = serde_json::to_value(&insights).unwrap();

    for (section, keys) in [
        (
            "top_performers",
            ["highest_engagement", "most_followers", "most_active"],
        ),
        (
            "benchmarks",
            ["avg_engagement_rate", "avg_followers", "avg_posting_frequency"],
        ),
        (
            "recommendations",
            [
                "optimal_content_type",
                "target_engagement_rate",
                "recommended_posting_frequency",
            ],
        ),
        (
            "competitive_gaps",
            [
                "engagement_leader_advantage",
                "follower_leader_advantage",
                "activity_leader_advantage",
            ],
        ),
    ] {
        for key in keys {
            assert!(value[section].get(key).is_some(), "{}.{}", section, key);
        }
    }
}

#[test]
fn analysis_is_idempotent_and_leaves_input_untouched() {
    let dataset = scenario_dataset();
    let snapshot = dataset.clone();
    let config = AnalyticsConfig::default();

    let first = build_report(&dataset, &config).unwrap();
    let second = build_report(&dataset, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(dataset, snapshot);
    assert_eq!(first.metrics.len(), 2);
    assert_eq!(first.profiles.len(), 2);
}
