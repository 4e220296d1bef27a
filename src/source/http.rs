//! HTTP client for the page service.

use super::TreeSource;
use crate::config::SourceConfig;
use crate::error::ApiError;
use crate::reorder::OrderScope;
use crate::tree::node::{ChildSummary, NodeDetail};
use crate::types::NodeId;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a NodeId>,
    ordered_ids: &'a [NodeId],
}

/// `TreeSource` backed by the page service REST endpoints.
pub struct HttpTreeSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTreeSource {
    pub fn new(config: &SourceConfig) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::ConfigError(
                "source.base_url must be set for the HTTP page source".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn node_url(&self, id: &NodeId) -> String {
        format!("{}/api/note/getNote/{}", self.base_url, id)
    }

    fn reorder_url(&self, scope: &OrderScope) -> String {
        match scope {
            OrderScope::Section(_) => format!("{}/api/note/reorderRootNotes", self.base_url),
            OrderScope::Parent(_) => format!("{}/api/note/reorderChildren", self.base_url),
        }
    }

    /// GET a node; 403/404 read as inaccessible.
    async fn get_node(&self, id: &NodeId) -> Result<Option<NodeDetail>, ApiError> {
        let response = self.client.get(self.node_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                warn!(node_id = %id, status = %response.status(), "Node not accessible, skipping");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.json::<NodeDetail>().await?)),
            status => Err(ApiError::RequestFailed(format!(
                "GET {} returned {}",
                self.node_url(id),
                status
            ))),
        }
    }
}

#[async_trait]
impl TreeSource for HttpTreeSource {
    async fn fetch_children(&self, parent: &NodeId) -> Result<Option<Vec<ChildSummary>>, ApiError> {
        debug!(parent = %parent, "Fetching children");
        let detail = self.get_node(parent).await.map_err(|e| ApiError::FetchChildrenFailed {
            parent: parent.clone(),
            message: e.to_string(),
        })?;
        Ok(detail.map(|d| d.child_summaries()))
    }

    async fn fetch_node(&self, id: &NodeId) -> Result<Option<NodeDetail>, ApiError> {
        debug!(node_id = %id, "Fetching node detail");
        self.get_node(id).await.map_err(|e| ApiError::FetchNodeFailed {
            node: id.clone(),
            message: e.to_string(),
        })
    }

    async fn persist_order(&self, scope: &OrderScope, ordered: &[NodeId]) -> Result<(), ApiError> {
        let body = ReorderBody {
            parent_id: scope.parent(),
            ordered_ids: ordered,
        };
        let response = self
            .client
            .put(self.reorder_url(scope))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::PersistFailed {
                scope: scope.to_string(),
                message: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(ApiError::PersistFailed {
                scope: scope.to_string(),
                message: format!("service returned {}", response.status()),
            });
        }
        Ok(())
    }
}
