//! Tool selection.

use fuse_config::ChatSettings;
use serde_json::{Value, json};

/// Stateless chat tool.
pub const CHAT_TOOL: &str = "chat";

/// Chat tool that keeps server-side history keyed by session id.
pub const MEMORY_TOOL: &str = "conversation_with_memory";

/// A tool name with the arguments to send it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool: &'static str,
    pub arguments: Value,
}

/// Pick the tool and arguments for one user message.
///
/// Memory mode sends the session id and no model; otherwise the model is sent
/// and the session id is not.
pub fn select_tool(message: &str, session_id: &str, settings: &ChatSettings) -> ToolInvocation {
    if settings.use_memory {
        ToolInvocation {
            tool: MEMORY_TOOL,
            arguments: json!({
                "message": message,
                "sessionId": session_id,
                "provider": settings.provider.as_str(),
            }),
        }
    } else {
        ToolInvocation {
            tool: CHAT_TOOL,
            arguments: json!({
                "message": message,
                "provider": settings.provider.as_str(),
                "model": settings.model,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuse_config::Provider;

    #[test]
    fn test_memory_mode() {
        let settings = ChatSettings::new("http://x").with_memory(true);
        let invocation = select_tool("hi", "session-1", &settings);

        assert_eq!(invocation.tool, "conversation_with_memory");
        assert_eq!(
            invocation.arguments,
            json!({"message": "hi", "sessionId": "session-1", "provider": "openai"})
        );
    }

    #[test]
    fn test_plain_chat_mode() {
        let settings = ChatSettings::new("http://x")
            .with_provider(Provider::Anthropic)
            .with_memory(false);
        let invocation = select_tool("hi", "session-1", &settings);

        assert_eq!(invocation.tool, "chat");
        assert_eq!(
            invocation.arguments,
            json!({"message": "hi", "provider": "anthropic", "model": "claude-3-sonnet-20240229"})
        );
        assert!(invocation.arguments.get("sessionId").is_none());
    }
}
