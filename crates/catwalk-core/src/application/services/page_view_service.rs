//! Page View Service - one request from raw documents to view data.
//!
//! 1. Complete the node's custom data
//! 2. Complete the page's tastic data
//! 3. Resolve the streams the completed page uses

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::{
    application::services::{PageDataCompletionService, StreamData, StreamService},
    domain::{Context, Node, Page, ParameterMap},
    error::CatwalkResult,
};

/// Everything a renderer needs for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub node: Node,
    pub page: Page,
    pub data: StreamData,
}

/// Runs completion and stream resolution for a request.
pub struct PageViewService {
    completion: PageDataCompletionService,
    streams: StreamService,
}

impl PageViewService {
    pub fn new(completion: PageDataCompletionService, streams: StreamService) -> Self {
        Self {
            completion,
            streams,
        }
    }

    pub fn streams(&self) -> &StreamService {
        &self.streams
    }

    pub fn completion(&self) -> &PageDataCompletionService {
        &self.completion
    }

    #[instrument(skip_all, fields(node_id = %node.node_id, page_id = %page.page_id))]
    pub async fn build(
        &self,
        mut node: Node,
        mut page: Page,
        context: &Context,
        tastic_field_data: &Map<String, Value>,
        parameter_map: ParameterMap,
    ) -> CatwalkResult<PageView> {
        self.completion.complete_node_data(&mut node, context);
        self.completion
            .complete_page_data(&mut page, &node, context, tastic_field_data)?;

        let data = self
            .streams
            .get_stream_data(&node, context, parameter_map, Some(&page))
            .await?;

        info!(streams = data.len(), "Page view built");
        Ok(PageView { node, page, data })
    }
}
