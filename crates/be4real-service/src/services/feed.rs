//! Feed service
//!
//! Serves bounded windows of the chronological feed around an optional
//! pivot post.

use std::num::IntErrorKind;

use be4real_core::{FeedCursor, FeedDirection, FeedQuery, Snowflake};
use tracing::{debug, instrument};

use crate::dto::{FeedPage, FeedRequest, PostResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Page size when the caller gives none
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Larger requested pages are clamped to this
pub const MAX_PAGE_LIMIT: i64 = 50;

/// A blank query value counts as absent
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse the raw `limit` parameter
///
/// Missing or blank means the default, oversized values clamp, and anything
/// else that is not a positive integer is rejected.
pub fn parse_limit(raw: Option<&str>) -> ServiceResult<i64> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_PAGE_LIMIT);
    };

    let limit = match raw.parse::<i64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_PAGE_LIMIT,
        Err(_) => return Err(ServiceError::validation("Invalid limit")),
    };

    if limit <= 0 {
        return Err(ServiceError::validation("Invalid limit"));
    }
    Ok(limit.min(MAX_PAGE_LIMIT))
}

fn parse_pivot(name: &str, raw: &str) -> ServiceResult<Snowflake> {
    Snowflake::parse(raw)
        .map_err(|_| ServiceError::validation(format!("Invalid '{name}' post ID")))
}

/// Feed service
pub struct FeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch one window of the feed, newest first
    ///
    /// All parameter checks run before the first repository call.
    #[instrument(skip(self))]
    pub async fn get_page(&self, request: FeedRequest) -> ServiceResult<FeedPage> {
        let before = present(request.before.as_deref());
        let after = present(request.after.as_deref());
        let pivot = match (before, after) {
            (Some(_), Some(_)) => {
                return Err(ServiceError::validation(
                    "Cannot use both 'before' and 'after' params",
                ))
            }
            (Some(before), None) => Some((FeedDirection::Before, parse_pivot("before", before)?)),
            (None, Some(after)) => Some((FeedDirection::After, parse_pivot("after", after)?)),
            (None, None) => None,
        };
        let limit = parse_limit(request.limit.as_deref())?;

        let cursor = match pivot {
            Some((direction, pivot_id)) => {
                let pivot = self
                    .ctx
                    .post_repo()
                    .find_by_id(pivot_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Pivot post", pivot_id.to_string()))?;
                Some(FeedCursor::from_post(direction, &pivot))
            }
            None => None,
        };

        let posts = self
            .ctx
            .post_repo()
            .find_page(FeedQuery { cursor, limit })
            .await?;

        debug!(count = posts.len(), limit, "Feed page served");

        Ok(FeedPage::new(posts.into_iter().map(PostResponse::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ErrorKind;
    use crate::test_support::TestEnv;

    fn request(before: Option<&str>, after: Option<&str>, limit: Option<&str>) -> FeedRequest {
        FeedRequest {
            before: before.map(str::to_string),
            after: after.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    fn ids(page: &FeedPage) -> Vec<String> {
        page.posts.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_PAGE_LIMIT);
        assert_eq!(parse_limit(Some("")).unwrap(), DEFAULT_PAGE_LIMIT);
        assert_eq!(parse_limit(Some("  ")).unwrap(), DEFAULT_PAGE_LIMIT);
        assert_eq!(parse_limit(Some(" 7 ")).unwrap(), 7);
        assert_eq!(parse_limit(Some("7")).unwrap(), 7);
        assert_eq!(parse_limit(Some("50")).unwrap(), 50);
        assert_eq!(parse_limit(Some("1000")).unwrap(), MAX_PAGE_LIMIT);
        assert_eq!(parse_limit(Some("99999999999999999999999")).unwrap(), MAX_PAGE_LIMIT);

        for bad in ["0", "-1", "abc", "2.5", "-99999999999999999999999"] {
            let err = parse_limit(Some(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "limit {bad:?}");
            assert_eq!(err.to_string(), "Invalid limit");
        }
    }

    #[tokio::test]
    async fn test_first_page_is_newest_first() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90, 80, 70, 60]).await;

        let page = FeedService::new(&env.ctx)
            .get_page(request(None, None, Some("3")))
            .await
            .unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(ids(&page), env.ids_of(&posts, &[100, 90, 80]));
    }

    #[tokio::test]
    async fn test_blank_params_count_as_absent() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90, 80]).await;
        let service = FeedService::new(&env.ctx);

        let page = service
            .get_page(request(Some(""), Some(" "), Some("")))
            .await
            .unwrap();
        assert_eq!(ids(&page), env.ids_of(&posts, &[100, 90, 80]));

        // one blank pivot leaves the other in charge
        let pivot = env.ids_of(&posts, &[90]).remove(0);
        let page = service
            .get_page(request(Some(&pivot), Some(""), None))
            .await
            .unwrap();
        assert_eq!(ids(&page), env.ids_of(&posts, &[80]));
    }

    #[tokio::test]
    async fn test_before_pivot_pages_older_posts() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90, 80, 70, 60]).await;
        let pivot = env.id_at(&posts, 80);

        let page = FeedService::new(&env.ctx)
            .get_page(request(Some(&pivot), None, Some("2")))
            .await
            .unwrap();

        assert_eq!(ids(&page), env.ids_of(&posts, &[70, 60]));
    }

    #[tokio::test]
    async fn test_after_pivot_is_descending() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90, 80, 70, 60]).await;
        let pivot = env.id_at(&posts, 80);

        let page = FeedService::new(&env.ctx)
            .get_page(request(None, Some(&pivot), Some("5")))
            .await
            .unwrap();

        assert_eq!(ids(&page), env.ids_of(&posts, &[100, 90]));
    }

    #[tokio::test]
    async fn test_after_newest_is_empty_success() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90]).await;
        let pivot = env.id_at(&posts, 100);

        let page = FeedService::new(&env.ctx)
            .get_page(request(None, Some(&pivot), None))
            .await
            .unwrap();

        assert_eq!(page.count, 0);
        assert!(page.posts.is_empty());
    }

    #[tokio::test]
    async fn test_before_pages_cover_everything_older() {
        let env = TestEnv::new();
        let stamps: Vec<i64> = (1..=12).rev().map(|n| n * 10).collect();
        let posts = env.seed_feed(&stamps).await;
        let service = FeedService::new(&env.ctx);

        let mut seen = Vec::new();
        let mut pivot: Option<String> = None;
        loop {
            let page = service
                .get_page(request(pivot.as_deref(), None, Some("5")))
                .await
                .unwrap();
            if page.posts.is_empty() {
                break;
            }
            assert!(page.posts.windows(2).all(|w| w[0].created_at > w[1].created_at));
            pivot = page.posts.last().map(|p| p.id.clone());
            seen.extend(ids(&page));
        }

        assert_eq!(seen, env.ids_of(&posts, &stamps));
    }

    #[tokio::test]
    async fn test_same_timestamp_ties_break_on_id() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[50, 50, 50]).await;
        let mut expected: Vec<Snowflake> = posts.iter().map(|p| p.id).collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let service = FeedService::new(&env.ctx);
        let first = service.get_page(request(None, None, Some("1"))).await.unwrap();
        assert_eq!(ids(&first), vec![expected[0].to_string()]);

        let rest = service
            .get_page(request(Some(&expected[0].to_string()), None, None))
            .await
            .unwrap();
        assert_eq!(
            ids(&rest),
            vec![expected[1].to_string(), expected[2].to_string()]
        );
    }

    #[tokio::test]
    async fn test_both_pivots_rejected_without_store_access() {
        let env = TestEnv::new();
        let posts = env.seed_feed(&[100, 90]).await;
        let x = env.id_at(&posts, 100);
        let y = env.id_at(&posts, 90);
        let before = env.store.calls();

        let err = FeedService::new(&env.ctx)
            .get_page(request(Some(&x), Some(&y), Some("10")))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(env.store.calls(), before);
    }

    #[tokio::test]
    async fn test_bad_limit_rejected_without_store_access() {
        let env = TestEnv::new();
        let before = env.store.calls();

        for bad in ["0", "-1", "ten"] {
            let err = FeedService::new(&env.ctx)
                .get_page(request(None, None, Some(bad)))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert_eq!(env.store.calls(), before);
    }

    #[tokio::test]
    async fn test_oversized_limit_is_clamped() {
        let env = TestEnv::new();
        let stamps: Vec<i64> = (1..=60).rev().collect();
        env.seed_feed(&stamps).await;

        let page = FeedService::new(&env.ctx)
            .get_page(request(None, None, Some("1000")))
            .await
            .unwrap();
        assert_eq!(page.count, 50);
    }

    #[tokio::test]
    async fn test_pivot_errors() {
        let env = TestEnv::new();
        env.seed_feed(&[100]).await;
        let service = FeedService::new(&env.ctx);

        let err = service
            .get_page(request(Some("not-an-id"), None, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Invalid 'before' post ID");

        let err = service
            .get_page(request(None, Some("424242"), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Pivot post not found");
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let env = TestEnv::new();
        env.seed_feed(&[100]).await;
        env.store.set_failing(true);

        let err = FeedService::new(&env.ctx)
            .get_page(FeedRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
