//! Autocomplete actor: per-keyword, per-provider suggestion cache.

use super::{Adapters, AutocompleteSource, Memo};
use crate::constants::AUTOCOMPLETE_TTL;
use crate::error::{Error, Result};
use crate::runtime::{Actor, Runtime};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Which autocomplete endpoint a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// The video platform's own suggest endpoint.
    Platform,
    /// The general web search engine's suggest endpoint.
    Web,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Platform => "platform",
            Provider::Web => "web",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "platform" => Some(Provider::Platform),
            "web" => Some(Provider::Web),
            _ => None,
        }
    }

    /// Actor key combining provider and keyword.
    pub fn actor_key(self, keyword: &str) -> String {
        format!("{}:{keyword}", self.as_str())
    }
}

/// Keyed by `<provider>:<keyword>`. Memoises suggestions for an hour.
pub struct AutocompleteActor {
    keyword: String,
    source: Arc<dyn AutocompleteSource>,
    memo: Option<Memo<Vec<String>>>,
}

#[async_trait]
impl Actor for AutocompleteActor {
    type Deps = Adapters;

    fn kind() -> &'static str {
        "autocomplete"
    }

    async fn activate(deps: &Adapters, key: &str) -> Result<Self> {
        let (provider, keyword) = key
            .split_once(':')
            .and_then(|(p, k)| Provider::parse(p).map(|p| (p, k)))
            .ok_or_else(|| {
                Error::InvalidInput(format!("malformed autocomplete actor key: {key}"))
            })?;
        let source = match provider {
            Provider::Platform => deps.platform_autocomplete.clone(),
            Provider::Web => deps.web_autocomplete.clone(),
        };
        Ok(Self {
            keyword: keyword.to_string(),
            source,
            memo: None,
        })
    }
}

impl AutocompleteActor {
    pub async fn suggestions(&mut self) -> Vec<String> {
        if let Some(s) = self.memo.as_ref().and_then(|m| m.fresh(AUTOCOMPLETE_TTL)) {
            return s;
        }
        match self.source.suggest(&self.keyword).await {
            Ok(suggestions) => {
                self.memo = Some(Memo::new(suggestions.clone()));
                suggestions
            }
            Err(e) => {
                warn!(keyword = %self.keyword, error = %e, "autocomplete failed, returning no suggestions");
                Vec::new()
            }
        }
    }
}

impl Runtime<AutocompleteActor> {
    pub async fn suggestions(&self, provider: Provider, keyword: &str) -> Vec<String> {
        let key = provider.actor_key(keyword);
        match self
            .call(&key, |a| Box::pin(async move { a.suggestions().await }))
            .await
        {
            Ok(s) => s,
            Err(e) => {
                warn!(keyword, provider = provider.as_str(), error = %e, "autocomplete actor unavailable");
                Vec::new()
            }
        }
    }
}
