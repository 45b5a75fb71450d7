//! 状态定义：UI 投影
//!
//! UI 只持有轻量的 UiState（阶段、历史、锁、错误）；完整会话状态由编排器维护并投影到 UiState。

use serde::Serialize;

/// 对话历史中的一条记录（用户提问或最终回答）
#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

/// 历史记录角色
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum HistoryRole {
    User,
    Agent,
    System,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Agent,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::System,
            content: content.into(),
        }
    }
}

/// UI 看到的「投影」状态，轻量且易于渲染
#[derive(Clone, Debug, Serialize)]
pub struct UiState {
    pub phase: AgentPhase,
    pub history: Vec<HistoryEntry>,
    /// 正在执行的工具名（Acting 阶段）
    pub active_tool: Option<String>,
    pub input_locked: bool,
    pub error_message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            phase: AgentPhase::Idle,
            history: Vec::new(),
            active_tool: None,
            input_locked: false,
            error_message: None,
        }
    }
}

/// 会话阶段（UI 投影用）
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum AgentPhase {
    Idle,
    /// 拉取插件清单并构建索引
    LoadingPlugins,
    Thinking,
    Acting,
    Error,
}
