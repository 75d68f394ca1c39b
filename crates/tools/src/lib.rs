//! Built-in tool implementations for AgentWire.
//!
//! The default set mirrors what the worker needs to hold a conversation:
//! `respond` streams text to the user, `terminate` ends the run, and
//! `web_search` gathers information.

pub mod respond;
pub mod terminate;
pub mod web_search;

pub use respond::RespondTool;
pub use terminate::TerminateTool;
pub use web_search::WebSearchTool;

use agentwire_core::tool::ToolRouter;

/// Create a default tool router with all built-in tools.
pub fn default_router() -> ToolRouter {
    let mut router = ToolRouter::new();
    router.register(Box::new(RespondTool));
    router.register(Box::new(TerminateTool));
    router.register(Box::new(WebSearchTool));
    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_router_has_core_tools() {
        let router = default_router();
        for name in ["respond", "terminate", "web_search"] {
            assert!(router.contains(name), "missing tool: {name}");
        }
    }
}
