//! Package and distribution discovery
//!
//! Two levels of the registry are walked here. The index page yields
//! packages: its anchors may be relative, so each href is resolved against
//! the response's final URL (redirects are honored that way). A package's
//! own page yields distributions: registries serve those hrefs absolute, so
//! they are taken as-is. The size probe is a HEAD request that reads the
//! Content-Length header and drops any body unread.

use crate::crawler::anchors::extract_anchors;
use crate::crawler::fetcher::RequestGate;
use crate::{Result, SounderError};
use reqwest::header::CONTENT_LENGTH;

/// A package listed on the registry index
///
/// Identity is the URL; the value is immutable once discovered and owned by
/// the crawl unit working on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Link text of the index anchor, i.e. the package name
    pub name: String,

    /// Absolute URL of the package's page
    pub url: String,
}

/// A downloadable artifact belonging to a package
///
/// Holds a read-only back-reference to its parent; a distribution never
/// outlives the unit that discovered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution<'a> {
    /// The package this artifact belongs to
    pub package: &'a Package,

    /// Link text of the package-page anchor, i.e. the artifact filename
    pub name: String,

    /// Download URL, verbatim from the anchor
    pub url: String,
}

/// Fetches the registry index and resolves every anchor into a package
///
/// Hrefs are joined against the final response URL, so an index served
/// behind a redirect still produces correct absolute package URLs. Any
/// failure aborts discovery entirely; there is no partial package list.
pub async fn discover_packages(gate: &RequestGate, index_url: &str) -> Result<Vec<Package>> {
    let response = gate.get(index_url).await?;
    let base = response.url().clone();
    let body = response.bytes().await.map_err(|source| SounderError::Fetch {
        url: index_url.to_string(),
        source,
    })?;

    let anchors = extract_anchors(&body);
    let mut packages = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let resolved = base
            .join(&anchor.href)
            .map_err(|source| SounderError::UrlResolution {
                href: anchor.href.clone(),
                base: base.to_string(),
                source,
            })?;

        packages.push(Package {
            name: anchor.text,
            url: resolved.into(),
        });
    }

    Ok(packages)
}

/// Fetches a package's page and maps every anchor to a distribution
pub async fn discover_distributions<'a>(
    gate: &RequestGate,
    package: &'a Package,
) -> Result<Vec<Distribution<'a>>> {
    let response = gate.get(&package.url).await?;
    let body = response.bytes().await.map_err(|source| SounderError::Fetch {
        url: package.url.clone(),
        source,
    })?;

    Ok(extract_anchors(&body)
        .into_iter()
        .map(|anchor| Distribution {
            package,
            name: anchor.text,
            url: anchor.href,
        })
        .collect())
}

/// Probes a distribution's byte size with a HEAD request
///
/// Returns the Content-Length header as an integer, or -1 when the server
/// does not report one. The header is read directly rather than through
/// `Response::content_length()`, which reqwest omits for bodies it
/// transparently decompresses.
pub async fn probe_size(gate: &RequestGate, url: &str) -> Result<i64> {
    let response = gate.head(url).await?;

    let size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(-1);

    // Response dropped here; the body, if any, is never read.
    Ok(size)
}
