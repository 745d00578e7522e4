use super::Dispatcher;
use crate::tools::catalog;
use anyhow::Result;
use fsmcp_protocol::ResultEnvelope;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler};
use std::sync::Arc;

/// MCP front end over a [`Dispatcher`].
#[derive(Clone)]
pub struct FsToolService {
    dispatcher: Arc<Dispatcher>,
}

impl FsToolService {
    pub fn new() -> Result<Self> {
        Ok(Self::with_dispatcher(Dispatcher::new()?))
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Tool failures travel as `is_error` results, never as protocol errors.
pub(crate) fn to_call_tool_result(envelope: ResultEnvelope) -> CallToolResult {
    let content = vec![Content::text(envelope.text())];
    if envelope.is_error() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl ServerHandler for FsToolService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(catalog::tool_instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        async move { Ok(ListToolsResult::with_all_items(catalog::mcp_tools())) }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_
    {
        async move {
            let envelope = self
                .dispatcher
                .dispatch(&request.name, request.arguments.as_ref())
                .await;
            Ok(to_call_tool_result(envelope))
        }
    }
}
