//! 会话事件：循环向前端推送的进度通知（可选通道）

/// 循环进度事件；编排器将其投影为 UI 阶段
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// 开始一轮思考（组装 prompt 并调用模型）
    Thinking { step: usize },
    /// 即将调用工具
    ToolCall { tool: String },
    /// 工具返回观察结果（预览截断）
    Observation { tool: String, preview: String },
}
