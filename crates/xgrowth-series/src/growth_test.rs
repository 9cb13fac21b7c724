use chrono::TimeZone;

use super::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

fn sample(offset: TimeDelta, followers: i64, posts: i64) -> Sample {
    Sample {
        timestamp: t0() + offset,
        followers,
        following: None,
        posts,
    }
}

fn hours(h: i64) -> TimeDelta {
    TimeDelta::hours(h)
}

fn three_points() -> Series {
    Series::new(vec![
        sample(hours(0), 100, 10),
        sample(hours(1), 110, 11),
        sample(hours(24), 300, 15),
    ])
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn one_hour_horizon_uses_nearest_older_sample() {
    let report = compute_growth(&three_points(), &[hours(1)], false).unwrap();
    let growth = &report.horizons[0];

    assert_eq!(report.latest.followers, 300);
    assert_eq!(growth.reference, t0() + hours(1));
    assert_eq!(growth.elapsed, hours(23));
    assert_eq!(growth.followers.delta, 190);
    // Scaled by the 23 hours that actually elapsed, not the 1-hour horizon.
    assert_close(growth.followers.rate_per_day, 190.0 * 24.0 / 23.0);
}

#[test]
fn default_horizons_on_three_points() {
    let horizons = [hours(1), hours(6), hours(24), TimeDelta::days(7)];
    let report = compute_growth(&three_points(), &horizons, false).unwrap();
    let references: Vec<_> = report.horizons.iter().map(|g| g.reference).collect();
    assert_eq!(
        references,
        [t0() + hours(1), t0() + hours(1), t0(), t0()]
    );

    let daily = &report.horizons[2].followers;
    assert_eq!(daily.delta, 200);
    assert_close(daily.rate_per_day, 200.0);
    assert_close(daily.rate_per_week(), 1400.0);
}

#[test]
fn ties_go_to_the_more_recent_sample() {
    let series = Series::new(vec![
        sample(hours(1), 10, 0),
        sample(hours(3), 30, 0),
        sample(hours(4), 40, 0),
    ]);
    // Target t0+2h is one hour from both older samples.
    let report = compute_growth(&series, &[hours(2)], false).unwrap();
    assert_eq!(report.horizons[0].reference, t0() + hours(3));
    assert_eq!(report.horizons[0].followers.delta, 10);
}

#[test]
fn never_compares_latest_with_itself() {
    let report = compute_growth(&three_points(), &[TimeDelta::zero()], false).unwrap();
    assert_eq!(report.horizons[0].reference, t0() + hours(1));
}

#[test]
fn drops_are_preserved_as_negative() {
    let series = Series::new(vec![sample(hours(0), 500, 3), sample(hours(12), 480, 2)]);
    let report = compute_growth(&series, &[hours(12)], true).unwrap();
    let growth = &report.horizons[0];
    assert_eq!(growth.followers.delta, -20);
    assert_close(growth.followers.rate_per_day, -40.0);
    let posts = growth.posts.unwrap();
    assert_eq!(posts.delta, -1);
    assert_close(posts.rate_per_day, -2.0);
}

#[test]
fn posts_share_the_followers_reference() {
    let report = compute_growth(&three_points(), &[hours(1)], true).unwrap();
    let posts = report.horizons[0].posts.unwrap();
    assert_eq!(posts.delta, 4);
    assert_close(posts.rate_per_day, 4.0 * 24.0 / 23.0);
}

#[test]
fn posts_omitted_unless_requested() {
    let report = compute_growth(&three_points(), &[hours(1)], false).unwrap();
    assert!(report.horizons[0].posts.is_none());
}

#[test]
fn fewer_than_two_samples_is_insufficient() {
    let empty = Series::default();
    let single = Series::new(vec![sample(hours(0), 1, 0)]);
    for series in [empty, single] {
        assert!(matches!(
            compute_growth(&series, &[hours(1)], false),
            Err(SeriesError::InsufficientData(_))
        ));
    }
}

#[test]
fn duplicate_latest_timestamp_is_skipped_as_reference() {
    let series = Series::new(vec![
        sample(hours(0), 100, 0),
        sample(hours(5), 110, 0),
        sample(hours(5), 111, 0),
    ]);
    let report = compute_growth(&series, &[hours(1), hours(24)], false).unwrap();

    assert_eq!(report.horizons.len(), 2);
    for growth in &report.horizons {
        assert_eq!(growth.reference, t0());
        assert_eq!(growth.elapsed, hours(5));
        assert_eq!(growth.followers.delta, 10);
    }
}

#[test]
fn all_samples_at_latest_timestamp_is_insufficient() {
    let series = Series::new(vec![sample(hours(5), 110, 0), sample(hours(5), 111, 0)]);
    assert!(matches!(
        compute_growth(&series, &[hours(1)], false),
        Err(SeriesError::InsufficientData(_))
    ));
}

#[test]
fn horizon_past_earliest_date_matches_oldest_sample() {
    let report = compute_growth(&three_points(), &[TimeDelta::weeks(99_999_999)], false).unwrap();
    let growth = &report.horizons[0];
    assert_eq!(growth.reference, t0());
    assert_eq!(growth.followers.delta, 200);
}

#[test]
fn report_serializes_durations_as_seconds() {
    let report = compute_growth(&three_points(), &[hours(1)], false).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let growth = &json["horizons"][0];
    assert_eq!(growth["horizon_secs"], 3600);
    assert_eq!(growth["elapsed_secs"], 23 * 3600);
    assert_eq!(growth["followers"]["delta"], 190);
    assert!(growth["posts"].is_null());
    assert_eq!(json["latest"]["followers"], 300);
}
