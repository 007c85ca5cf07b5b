//! Fetch-then-extract orchestration.
//!
//! A comparison runs the old and new page pipelines concurrently and fails
//! as a unit: if either page cannot be fetched or parsed there is no
//! partial result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use linkdiff_core::Error;

use crate::compare::{self, ComparisonResult};
use crate::extract::{ExtractConfig, ExtractionResult, LinkRecord, extract_page};
use crate::fetch::{Fetcher, parse_page_url};

/// One fetched and extracted page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    /// URL as requested
    pub url: String,
    /// URL after redirects; links are resolved against it
    pub final_url: String,
    pub fetched_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

/// Link inventory of one side of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
    pub url: String,
    pub final_url: String,
    pub title: String,
    pub links: Vec<LinkRecord>,
}

impl From<PageReport> for PageLinks {
    fn from(report: PageReport) -> Self {
        Self { url: report.url, final_url: report.final_url, title: report.result.title, links: report.result.links }
    }
}

/// Result of comparing an old site's page with its new counterpart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteComparison {
    pub old: PageLinks,
    pub new: PageLinks,
    #[serde(flatten)]
    pub comparison: ComparisonResult,
}

/// Validate, fetch and extract a single page.
pub async fn open_page(fetcher: &dyn Fetcher, url: &str, config: &ExtractConfig) -> Result<PageReport, Error> {
    let url = required_url("url", url)?;
    fetch_and_extract(fetcher, &url, config).await
}

/// Fetch both pages concurrently and compare their link inventories.
///
/// Both URLs are validated before anything is fetched.
pub async fn compare_sites(
    fetcher: &dyn Fetcher, old_url: &str, new_url: &str, config: &ExtractConfig,
) -> Result<SiteComparison, Error> {
    let old_url = required_url("old_url", old_url)?;
    let new_url = required_url("new_url", new_url)?;

    let (old, new) = tokio::try_join!(
        fetch_and_extract(fetcher, &old_url, config),
        fetch_and_extract(fetcher, &new_url, config),
    )?;

    let comparison = compare::compare(&old.result, &new.result);
    tracing::info!(
        old = %old.final_url,
        new = %new.final_url,
        shared = comparison.shared.len(),
        missing = comparison.missing.len(),
        similarity = comparison.similarity,
        "compared sites"
    );

    Ok(SiteComparison { old: old.into(), new: new.into(), comparison })
}

fn required_url(field: &str, value: &str) -> Result<Url, Error> {
    if value.trim().is_empty() {
        return Err(Error::MissingInput(format!("{field} is required")));
    }
    Ok(parse_page_url(value)?)
}

async fn fetch_and_extract(fetcher: &dyn Fetcher, url: &Url, config: &ExtractConfig) -> Result<PageReport, Error> {
    let response = fetcher.fetch(url).await?;
    let result = extract_page(&response.text(), &response.final_url, config)?;

    tracing::info!(
        url = %response.final_url,
        status = response.status.as_u16(),
        content_type = response.content_type.as_deref().unwrap_or(""),
        links = result.links.len(),
        sections = result.sections.len(),
        words = result.word_count,
        fetch_ms = response.fetch_ms,
        "extracted page"
    );

    Ok(PageReport {
        url: response.url.to_string(),
        final_url: response.final_url.to_string(),
        fetched_at: response.fetched_at,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages; unknown URLs fail like an unreachable host.
    #[derive(Default)]
    struct StaticFetcher {
        pages: HashMap<String, String>,
        redirects: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        fn with_redirect(mut self, from: &str, to: &str) -> Self {
            self.redirects.insert(from.to_string(), to.to_string());
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
            self.requested.lock().unwrap().push(url.to_string());

            let target = self.redirects.get(url.as_str()).map(String::as_str).unwrap_or(url.as_str());
            let html = self
                .pages
                .get(target)
                .ok_or_else(|| Error::FetchFailed(format!("no route to {target}")))?;

            let mut response = FetchResponse::from_html(Url::parse(target).unwrap(), html.clone());
            response.url = url.clone();
            Ok(response)
        }
    }

    const OLD_PAGE: &str = r#"<html><head><title>Old</title></head><body>
        <a href="/x">A</a> <a href="/y">B</a>
    </body></html>"#;

    const NEW_PAGE: &str = r#"<html><head><title>New</title></head><body>
        <a href="/x">A</a> <a href="/z">C</a>
    </body></html>"#;

    #[tokio::test]
    async fn test_open_page() {
        let fetcher = StaticFetcher::default().with_page("https://old.site/", OLD_PAGE);

        let report = open_page(&fetcher, "old.site", &ExtractConfig::default()).await.unwrap();
        assert_eq!(report.url, "https://old.site/");
        assert_eq!(report.result.title, "Old");
        assert_eq!(report.result.links.len(), 2);
        assert_eq!(report.result.word_count, 2);
    }

    #[tokio::test]
    async fn test_open_page_resolves_against_final_url() {
        let fetcher = StaticFetcher::default()
            .with_redirect("https://old.site/", "https://new.site/home")
            .with_page("https://new.site/home", NEW_PAGE);

        let report = open_page(&fetcher, "https://old.site/", &ExtractConfig::default()).await.unwrap();
        assert_eq!(report.url, "https://old.site/");
        assert_eq!(report.final_url, "https://new.site/home");
        assert_eq!(report.result.links[0].url, "https://new.site/x");
    }

    #[tokio::test]
    async fn test_open_page_missing_input() {
        let fetcher = StaticFetcher::default();
        let err = open_page(&fetcher, "   ", &ExtractConfig::default()).await.unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_open_page_invalid_url() {
        let fetcher = StaticFetcher::default();
        let err = open_page(&fetcher, "ftp://old.site/file", &ExtractConfig::default()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_open_page_parse_failure() {
        let fetcher = StaticFetcher::default().with_page("https://blank.site/", "   ");
        let err = open_page(&fetcher, "https://blank.site/", &ExtractConfig::default()).await.unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_compare_sites() {
        let fetcher = StaticFetcher::default()
            .with_page("https://old.site/", OLD_PAGE)
            .with_page("https://new.site/", OLD_PAGE);

        let result = compare_sites(&fetcher, "https://old.site/", "https://new.site/", &ExtractConfig::default())
            .await
            .unwrap();

        // Same paths on different hosts are different links.
        assert_eq!(result.comparison.similarity, 0);
        assert_eq!(result.comparison.missing.len(), 2);
        assert_eq!(result.old.title, "Old");
    }

    #[tokio::test]
    async fn test_compare_sites_same_host_scenario() {
        let fetcher = StaticFetcher::default()
            .with_page("https://site.com/old", OLD_PAGE)
            .with_page("https://site.com/new", NEW_PAGE);

        let result = compare_sites(&fetcher, "https://site.com/old", "https://site.com/new", &ExtractConfig::default())
            .await
            .unwrap();

        let urls = |links: &[LinkRecord]| links.iter().map(|l| l.url.clone()).collect::<Vec<_>>();
        assert_eq!(urls(&result.comparison.shared), vec!["https://site.com/x"]);
        assert_eq!(urls(&result.comparison.missing), vec!["https://site.com/y"]);
        assert_eq!(result.comparison.similarity, 50);
        assert_eq!(result.old.links.len(), 2);
        assert_eq!(result.new.title, "New");

        let mut requested = fetcher.requested();
        requested.sort();
        assert_eq!(requested, vec!["https://site.com/new", "https://site.com/old"]);
    }

    #[tokio::test]
    async fn test_compare_sites_fails_fast() {
        let fetcher = StaticFetcher::default().with_page("https://site.com/old", OLD_PAGE);

        let err = compare_sites(&fetcher, "https://site.com/old", "https://gone.site/", &ExtractConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FetchFailed(msg) if msg.contains("gone.site")));
    }

    #[tokio::test]
    async fn test_compare_sites_validates_before_fetching() {
        let fetcher = StaticFetcher::default().with_page("https://site.com/old", OLD_PAGE);

        let err = compare_sites(&fetcher, "https://site.com/old", "", &ExtractConfig::default()).await.unwrap_err();
        assert!(matches!(&err, Error::MissingInput(msg) if msg == "new_url is required"));
        assert!(fetcher.requested().is_empty());

        let err = compare_sites(&fetcher, " ", "https://site.com/old", &ExtractConfig::default()).await.unwrap_err();
        assert!(matches!(&err, Error::MissingInput(msg) if msg.starts_with("old_url")));
    }

    #[test]
    fn test_site_comparison_json_shape() {
        let page = PageLinks {
            url: "https://a.com/".into(),
            final_url: "https://a.com/".into(),
            title: "A".into(),
            links: Vec::new(),
        };
        let comparison = SiteComparison {
            old: page.clone(),
            new: page,
            comparison: ComparisonResult { shared: Vec::new(), missing: Vec::new(), similarity: 0 },
        };

        let json = serde_json::to_value(&comparison).unwrap();
        assert!(json.get("old").is_some());
        assert!(json.get("new").is_some());
        assert_eq!(json["similarity"], 0);
        assert!(json["shared"].as_array().unwrap().is_empty());
    }
}
