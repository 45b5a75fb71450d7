//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient：complete 接收完整 prompt 与停止序列，
//! 返回一次补全文本。循环以 "\nObservation:" 作为停止序列，让模型在动作后停笔。

use async_trait::async_trait;

/// LLM 客户端 trait：单次补全（prompt in, text out）
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 补全 prompt；stop 为停止序列，模型输出到任一序列即截止
    async fn complete(&self, prompt: &str, stop: &[String]) -> Result<String, String>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
