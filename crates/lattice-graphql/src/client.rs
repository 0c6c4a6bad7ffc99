// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP implementation of [`MutationEndpoint`].
//!
//! Every document is POSTed as `{"query": ...}` to `<address>/graphql/<branch>`
//! with `?at=<rfc3339>` when the context pins a time.

use async_trait::async_trait;
use lattice_app_core::ClientConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::time::Duration;
use tracing::debug;

use crate::context::MutationContext;
use crate::endpoint::{MutationEndpoint, MutationError};

/// Longest response body kept in an [`MutationError::Http`].
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Json>,
    #[serde(default)]
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

impl From<reqwest::Error> for MutationError {
    fn from(err: reqwest::Error) -> Self {
        MutationError::Transport(err.to_string())
    }
}

/// GraphQL-over-HTTP client for the platform API.
#[derive(Clone)]
pub struct GraphqlClient {
    http: reqwest::Client,
    base: Url,
    api_token: Option<String>,
}

impl GraphqlClient {
    /// Build a client from config. A timeout is only set when configured;
    /// otherwise the transport default applies.
    pub fn new(config: &ClientConfig) -> Result<Self, MutationError> {
        let base = Url::parse(config.base_address())
            .map_err(|err| MutationError::Transport(format!("bad address {:?}: {err}", config.address)))?;
        if base.cannot_be_a_base() {
            return Err(MutationError::Transport(format!(
                "address {:?} cannot carry a path",
                config.address
            )));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base,
            api_token: config.api_token.clone(),
        })
    }

    /// Endpoint URL for `ctx`.
    pub fn endpoint_url(&self, ctx: &MutationContext) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("graphql").push(&ctx.branch);
        }
        if let Some(at) = &ctx.at {
            url.query_pairs_mut().append_pair("at", &at.to_rfc3339());
        }
        url
    }
}

#[async_trait]
impl MutationEndpoint for GraphqlClient {
    async fn execute(&self, ctx: &MutationContext, document: &str) -> Result<Json, MutationError> {
        let url = self.endpoint_url(ctx);
        debug!(%url, branch = %ctx.branch, "graphql request");

        let mut request = self.http.post(url).json(&GraphqlRequest { query: document });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // GraphQL servers often put validation errors in a 4xx body; prefer those.
            if let Ok(parsed) = serde_json::from_str::<GraphqlResponse>(&body) {
                if !parsed.errors.is_empty() {
                    return Err(join_errors(&parsed.errors));
                }
            }
            return Err(MutationError::Http {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let parsed: GraphqlResponse =
            serde_json::from_str(&body).map_err(|err| MutationError::Decode(err.to_string()))?;
        if !parsed.errors.is_empty() {
            return Err(join_errors(&parsed.errors));
        }
        parsed
            .data
            .ok_or_else(|| MutationError::Decode("response has neither data nor errors".into()))
    }
}

fn join_errors(errors: &[GraphqlErrorEntry]) -> MutationError {
    MutationError::Graphql(
        errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::context::Timestamp;

    fn client(address: &str) -> GraphqlClient {
        GraphqlClient::new(&ClientConfig {
            address: address.to_string(),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn url_scopes_branch_and_time() {
        let c = client("http://localhost:8000/");
        let ctx = MutationContext::new("feature/ipam")
            .at("2024-05-01T12:00:00Z".parse::<Timestamp>().unwrap());
        assert_eq!(
            c.endpoint_url(&ctx).as_str(),
            "http://localhost:8000/graphql/feature%2Fipam?at=2024-05-01T12%3A00%3A00Z"
        );
        assert_eq!(
            c.endpoint_url(&MutationContext::new("main")).as_str(),
            "http://localhost:8000/graphql/main"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://example.test/api");
        assert_eq!(
            c.endpoint_url(&MutationContext::new("main")).as_str(),
            "https://example.test/api/graphql/main"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
