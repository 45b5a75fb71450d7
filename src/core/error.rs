//! Agent 错误类型
//!
//! 所有内部失败都向上传播并终止当前会话，不做本地恢复；
//! 唯一的非错误边界是循环的最大迭代数（软限制，见 agent::loop_）。

use thiserror::Error;

/// 一次会话中可能出现的错误（清单拉取、索引、解析、工具、LLM 等）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 插件清单不可达或格式错误；对整个会话致命，不保留部分目录
    #[error("Plugin fetch failed: {0}")]
    Fetch(String),

    /// 嵌入或相似度查询失败
    #[error("Similarity index error: {0}")]
    Index(String),

    /// 模型输出既不含 Final Answer 也不匹配 Action/Action Input 格式；携带原始文本
    #[error("Could not parse model output: `{0}`")]
    Parse(String),

    /// 解析出的工具不在本轮可用集合中
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Cancelled by user")]
    Cancelled,
}
