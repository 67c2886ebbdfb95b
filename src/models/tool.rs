use serde::Serialize;

/// Tool definition advertised to the conversational dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    /// The dispatcher must stop the caller from interrupting while the call
    /// is in flight. Advertised up front since the tool result arrives too
    /// late to act on.
    pub disallow_interruptions: bool,
}
