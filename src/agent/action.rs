//! 解析结果的值类型：下一步动作或最终回答
//!
//! 解析后不可变；log 保留产生它的原始模型输出，Prompt 组装时按原样拼入 scratchpad。

/// 一次工具调用：工具名、自然语言输入、产生它的原始输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    pub log: String,
}

/// 终态：最终回答与产生它的原始输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFinish {
    pub answer: String,
    pub log: String,
}

/// 一次补全解析出的步骤
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    Action(AgentAction),
    Finish(AgentFinish),
}
