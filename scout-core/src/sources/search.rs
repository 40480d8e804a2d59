//! Keyword search actor: per-keyword cache over the platform search API.

use super::{Adapters, Memo, VideoPlatform};
use crate::constants::{SEARCH_MAX_RESULTS, SEARCH_TTL};
use crate::error::Result;
use crate::runtime::{Actor, Runtime};
use crate::types::SearchPage;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Keyed by normalized keyword. Memoises the last page for 10 minutes.
pub struct SearchActor {
    keyword: String,
    platform: Arc<dyn VideoPlatform>,
    memo: Option<Memo<SearchPage>>,
}

#[async_trait]
impl Actor for SearchActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "search"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        Ok(Self {
            keyword: key.to_string(),
            platform: deps.platform.clone(),
            memo: None,
        })
    }
}

impl SearchActor {
    pub async fn page(&mut self) -> SearchPage {
        if let Some(page) = self.memo.as_ref().and_then(|m| m.fresh(SEARCH_TTL)) {
            return page;
        }
        match self
            .platform
            .search_videos(&self.keyword, SEARCH_MAX_RESULTS)
            .await
        {
            Ok(page) => {
                self.memo = Some(Memo::new(page.clone()));
                page
            }
            Err(e) => {
                warn!(keyword = %self.keyword, error = %e, "video search failed, returning empty page");
                SearchPage::default()
            }
        }
    }
}

impl Runtime<SearchActor> {
    /// Search results for a keyword; routing failures degrade to an empty page.
    pub async fn page(&self, keyword: &str) -> SearchPage {
        match self
            .call(keyword, |a| Box::pin(async move { a.page().await }))
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(keyword, error = %e, "search actor unavailable");
                SearchPage::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{adapters, test_video, TestSources};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn memoises_within_ttl() {
        let src = Arc::new(TestSources::new());
        src.with_search(
            "rust",
            SearchPage {
                videos: vec![test_video("v1", "Rust tutorial", 100)],
                total_results: 1,
            },
        );
        let rt = Runtime::<SearchActor>::new(adapters(&src));

        let first = rt.page("rust").await;
        let second = rt.page("rust").await;
        assert_eq!(first, second);
        assert_eq!(src.calls.search.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_neutralises_to_empty_page() {
        let src = Arc::new(TestSources::new());
        src.fail("search_videos");
        let rt = Runtime::<SearchActor>::new(adapters(&src));

        let page = rt.page("rust").await;
        assert!(page.videos.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn failure_is_not_memoised() {
        let src = Arc::new(TestSources::new());
        src.fail("search_videos");
        let rt = Runtime::<SearchActor>::new(adapters(&src));
        assert!(rt.page("rust").await.videos.is_empty());

        src.unfail("search_videos");
        src.with_search(
            "rust",
            SearchPage {
                videos: vec![test_video("v1", "Rust tutorial", 100)],
                total_results: 1,
            },
        );
        assert_eq!(rt.page("rust").await.videos.len(), 1);
    }
}
