use std::collections::VecDeque;

use xgrowth_core::LayoutPaths;

use super::*;
use crate::page::HtmlPage;

const GOOD_PAGE: &str = r#"
    <a href="/jack/following" aria-label="678 Following">678 Following</a>
    <a href="/jack/followers" aria-label="12,345 Followers">12.3K Followers</a>"#;

const EMPTY_PAGE: &str = "<html><body><p>Something went wrong.</p></body></html>";

const PROTECTED_PAGE: &str =
    "<html><body><span>These posts are protected</span><a href=\"/x/followers\" aria-label=\"5 Followers\"></a></body></html>";

#[derive(Debug, Clone, Copy)]
enum Step {
    NavigateFails,
    NotFound,
    NeverReady,
    Page(&'static str),
}

/// Plays one scripted step per navigation; the last step repeats.
struct ScriptedDriver {
    script: VecDeque<Step>,
    current: Option<Step>,
    navigations: u32,
}

impl ScriptedDriver {
    fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            current: None,
            navigations: 0,
        }
    }

    /// Fails `failures` times with a rotating mix of transient errors, then
    /// serves a good page.
    fn failing(failures: u32) -> Self {
        let transient = [Step::NavigateFails, Step::NeverReady, Step::Page(EMPTY_PAGE)];
        let mut script: Vec<Step> = (0..failures as usize)
            .map(|i| transient[i % transient.len()])
            .collect();
        script.push(Step::Page(GOOD_PAGE));
        Self::new(script)
    }
}

impl PageDriver for ScriptedDriver {
    type Page = HtmlPage;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.navigations += 1;
        let step = if self.script.len() > 1 {
            self.script.pop_front()
        } else {
            self.script.front().copied()
        };
        self.current = step;
        match step {
            Some(Step::NavigateFails) => Err(DriverError::UnexpectedStatus {
                status: 503,
                url: url.to_owned(),
            }),
            Some(Step::NotFound) => Err(DriverError::NotFound {
                url: url.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    async fn is_ready(&mut self) -> bool {
        matches!(self.current, Some(Step::Page(_)))
    }

    fn snapshot(&self) -> Result<HtmlPage, DriverError> {
        match self.current {
            Some(Step::Page(html)) => Ok(HtmlPage::parse(html)),
            _ => Err(DriverError::NotNavigated),
        }
    }
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        page_load_timeout: Duration::from_millis(20),
        settle_delay: Duration::ZERO,
        retry_delay: Duration::ZERO,
    }
}

fn chain() -> StrategyChain {
    StrategyChain::with_layout(LayoutPaths::default())
}

const URL: &str = "https://x.test/jack";

#[test]
fn detects_block_markers() {
    assert_eq!(
        detect_block("<span>This account doesn\u{2019}t exist</span>"),
        Some(BlockReason::NotFound)
    );
    assert_eq!(
        detect_block("This account doesn't exist"),
        Some(BlockReason::NotFound)
    );
    assert_eq!(
        detect_block("<h1>Account suspended</h1>"),
        Some(BlockReason::Suspended)
    );
    assert_eq!(
        detect_block("These tweets are protected"),
        Some(BlockReason::Protected)
    );
    assert_eq!(detect_block(GOOD_PAGE), None);
}

#[tokio::test]
async fn succeeds_on_first_attempt() {
    let mut driver = ScriptedDriver::new([Step::Page(GOOD_PAGE)]);
    let record = acquire_stats(&mut driver, URL, &chain(), &policy(3))
        .await
        .unwrap();
    assert_eq!(record.followers, Some(12_345));
    assert_eq!(record.following, Some(678));
    assert_eq!(record.posts, None);
    assert_eq!(driver.navigations, 1);
}

#[tokio::test]
async fn recovers_after_transient_failures() {
    let mut driver = ScriptedDriver::failing(2);
    let record = acquire_stats(&mut driver, URL, &chain(), &policy(3))
        .await
        .unwrap();
    assert_eq!(record.followers, Some(12_345));
    assert_eq!(driver.navigations, 3);
}

#[tokio::test]
async fn outcome_depends_only_on_budget_versus_failures() {
    for failures in 0..4u32 {
        for budget in 1..6u32 {
            let mut driver = ScriptedDriver::failing(failures);
            let result = acquire_stats(&mut driver, URL, &chain(), &policy(budget)).await;
            if budget > failures {
                assert!(result.is_ok(), "failures={failures} budget={budget}");
                assert_eq!(driver.navigations, failures + 1);
            } else {
                match result {
                    Err(AcquireError::Exhausted { attempts, .. }) => {
                        assert_eq!(attempts, budget, "failures={failures} budget={budget}");
                    }
                    other => panic!("expected Exhausted, got {other:?}"),
                }
                assert_eq!(driver.navigations, budget);
            }
        }
    }
}

#[tokio::test]
async fn exhausted_carries_last_error() {
    let mut driver = ScriptedDriver::new([Step::NavigateFails, Step::NeverReady]);
    let err = acquire_stats(&mut driver, URL, &chain(), &policy(2))
        .await
        .unwrap_err();
    match err {
        AcquireError::Exhausted {
            attempts,
            last_error,
            ..
        } => {
            assert_eq!(attempts, 2);
            assert!(matches!(last_error, AttemptError::PageLoadTimeout(_)));
        }
        other @ AcquireError::Blocked { .. } => panic!("expected Exhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn page_without_counters_is_retried_as_empty_extraction() {
    let mut driver = ScriptedDriver::new([Step::Page(EMPTY_PAGE)]);
    let err = acquire_stats(&mut driver, URL, &chain(), &policy(3))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AcquireError::Exhausted {
            attempts: 3,
            last_error: AttemptError::EmptyExtraction,
            ..
        }
    ));
    assert_eq!(driver.navigations, 3);
}

#[tokio::test]
async fn block_marker_stops_without_retry() {
    let mut driver = ScriptedDriver::new([Step::Page(PROTECTED_PAGE)]);
    let err = acquire_stats(&mut driver, URL, &chain(), &policy(5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AcquireError::Blocked {
            reason: BlockReason::Protected,
            ..
        }
    ));
    assert_eq!(driver.navigations, 1);
}

#[tokio::test]
async fn missing_profile_is_blocked_not_exhausted() {
    let mut driver = ScriptedDriver::new([Step::NotFound]);
    let err = acquire_stats(&mut driver, URL, &chain(), &policy(3))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AcquireError::Blocked {
            reason: BlockReason::NotFound,
            ..
        }
    ));
    assert_eq!(driver.navigations, 1);
}

#[tokio::test]
async fn zero_budget_still_makes_one_attempt() {
    let mut driver = ScriptedDriver::new([Step::Page(GOOD_PAGE)]);
    assert!(acquire_stats(&mut driver, URL, &chain(), &policy(0))
        .await
        .is_ok());
    assert_eq!(driver.navigations, 1);
}
