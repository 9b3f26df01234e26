// ABOUTME: Async client refreshing the plan preview panel from the console endpoint.
// ABOUTME: Options/builder configuration with the page's historical control selectors as defaults.

//! Plan preview refresh.
//!
//! One fire-and-forget POST: the selected plan descriptor and fabric go to
//! the endpoint, and the returned HTML fragment replaces the preview
//! target's content verbatim (the server's output is trusted, nothing is
//! sanitized here).
//!
//! A failed request is swallowed deliberately: the preview simply does not
//! update, and the only trace is a warn-level event. There is also no
//! cancellation or supersede tracking; a caller issuing a second refresh
//! before the first completes gets last-response-wins by arrival order.
//! Both are documented behaviors of the console, kept as-is.

use std::time::Duration;

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConsoleError, Result};
use crate::matchers;

/// Configuration options for the preview client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub http_client: Option<reqwest::Client>,
    /// Name of the radio group carrying the selected plan descriptor.
    pub plan_input_name: String,
    /// Selector of the max-parallel-steps input.
    pub max_parallel_selector: String,
    /// Selector of the preview container receiving the fragment.
    pub preview_selector: String,
    /// Placeholder markup spliced into the target while the request runs.
    pub spinner_html: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Deckhand/0.1".to_string(),
            http_client: None,
            plan_input_name: "planDetails".to_string(),
            max_parallel_selector: "#maxParallelStepsCount".to_string(),
            preview_selector: "#plan-preview".to_string(),
            spinner_html: None,
        }
    }
}

/// Builder for constructing `PreviewClient` instances.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Override the plan radio-group name.
    pub fn plan_input_name(mut self, name: impl Into<String>) -> Self {
        self.opts.plan_input_name = name.into();
        self
    }

    /// Override the max-parallel-steps input selector.
    pub fn max_parallel_selector(mut self, selector: impl Into<String>) -> Self {
        self.opts.max_parallel_selector = selector.into();
        self
    }

    /// Override the preview target selector.
    pub fn preview_selector(mut self, selector: impl Into<String>) -> Self {
        self.opts.preview_selector = selector.into();
        self
    }

    /// Splice this markup into the target while the request is in flight.
    pub fn spinner_html(mut self, html: impl Into<String>) -> Self {
        self.opts.spinner_html = Some(html.into());
        self
    }

    /// Build the PreviewClient with the configured options.
    pub fn build(self) -> PreviewClient {
        PreviewClient::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a refresh attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// The fragment was fetched and spliced into the target.
    Refreshed,
    /// No plan is selected; no request was issued.
    NothingSelected,
    /// The request failed (transport error or non-2xx) and was swallowed.
    RequestFailed,
}

impl std::fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RefreshOutcome::Refreshed => "refreshed",
            RefreshOutcome::NothingSelected => "nothing_selected",
            RefreshOutcome::RequestFailed => "request_failed",
        };
        write!(f, "{}", s)
    }
}

/// Client for refreshing the plan preview panel.
#[derive(Debug, Clone)]
pub struct PreviewClient {
    opts: Options,
    http: reqwest::Client,
}

impl PreviewClient {
    /// Create a client, building an HTTP client unless one was injected.
    pub fn new(opts: Options) -> Self {
        let http = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .build()
                .expect("failed to build HTTP client")
        });
        Self { opts, http }
    }

    /// Create a ClientBuilder for fluent configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Refreshes the preview target from `endpoint`.
    ///
    /// Requires a selected plan: when the radio group yields no value the
    /// call returns `NothingSelected` without touching the network. The
    /// max-parallel-steps parameter is included only when the control holds
    /// a positive integer; anything else means unbounded and the parameter
    /// is omitted.
    ///
    /// A missing preview target or an unusable endpoint is a caller error
    /// and propagates; a failed request is not, and resolves to
    /// `RequestFailed`.
    pub async fn refresh_preview(
        &self,
        doc: &Document,
        endpoint: &str,
        fabric: &str,
    ) -> Result<RefreshOutcome> {
        const OP: &str = "RefreshPreview";

        let parsed = Url::parse(endpoint).map_err(|e| {
            ConsoleError::invalid_url(endpoint, OP, Some(anyhow::anyhow!("malformed URL: {}", e)))
        })?;
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConsoleError::invalid_url(
                endpoint,
                OP,
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        // Resolve the target before any network activity so a bad reference
        // fails fast instead of after a round trip.
        let target_matcher = matchers::compile(&self.opts.preview_selector, OP)?;
        let target = doc
            .select_matcher(&target_matcher)
            .iter()
            .next()
            .ok_or_else(|| ConsoleError::not_found(&self.opts.preview_selector, OP, None))?;

        let Some(plan_json) = self.selected_plan(doc) else {
            tracing::debug!(
                plan_group = %self.opts.plan_input_name,
                "no plan selected, skipping preview refresh"
            );
            return Ok(RefreshOutcome::NothingSelected);
        };

        let max_parallel = self.max_parallel_steps(doc);

        if let Some(spinner) = &self.opts.spinner_html {
            target.set_html(spinner.as_str());
        }

        let mut form: Vec<(&str, String)> =
            vec![("fabric", fabric.to_string()), ("json", plan_json)];
        if let Some(count) = max_parallel {
            form.push(("maxParallelStepsCount", count.to_string()));
        }

        match self.http.post(parsed).form(&form).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    target.set_html(body.as_str());
                    Ok(RefreshOutcome::Refreshed)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "preview refresh failed reading response body");
                    Ok(RefreshOutcome::RequestFailed)
                }
            },
            Ok(response) => {
                tracing::warn!(status = %response.status(), "preview refresh rejected by server");
                Ok(RefreshOutcome::RequestFailed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "preview refresh request failed");
                Ok(RefreshOutcome::RequestFailed)
            }
        }
    }

    /// The value of the checked radio in the plan group, when non-empty.
    fn selected_plan(&self, doc: &Document) -> Option<String> {
        let css = format!("input[name=\"{}\"]", self.opts.plan_input_name);
        let matcher = dom_query::Matcher::new(&css).ok()?;
        doc.select_matcher(&matcher)
            .iter()
            .find(|input| input.attr("checked").is_some())
            .and_then(|input| input.attr("value"))
            .map(|v| v.to_string())
            .filter(|v| !v.is_empty())
    }

    /// The max-parallel-steps bound, when the control holds a positive
    /// integer. Missing control, non-numeric text, and values at or below
    /// zero all mean unbounded.
    fn max_parallel_steps(&self, doc: &Document) -> Option<i64> {
        let matcher = dom_query::Matcher::new(&self.opts.max_parallel_selector).ok()?;
        let control = doc.select_matcher(&matcher).iter().next()?;
        let value = control.attr("value")?;
        let count = value.trim().parse::<i64>().ok()?;
        (count > 0).then_some(count)
    }
}

/// Convenience accessor used by tests and the CLI to read the current
/// preview markup.
pub fn preview_html(doc: &Document, selector: &str) -> Result<String> {
    let matcher = matchers::compile(selector, "PreviewHtml")?;
    let target: Selection<'_> = doc
        .select_matcher(&matcher)
        .iter()
        .next()
        .ok_or_else(|| ConsoleError::not_found(selector, "PreviewHtml", None))?;
    Ok(target.inner_html().to_string())
}
