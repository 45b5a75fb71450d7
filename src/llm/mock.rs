//! Mock LLM 与嵌入器（用于测试，无需 API）
//!
//! MockLlmClient 按脚本依次返回补全文本，耗尽后回落到固定 Final Answer；
//! MockEmbedder 用字母频率直方图生成确定性向量，便于离线验证相似度检索。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{EmbeddingProvider, LlmClient};

/// Mock 客户端：依次弹出脚本中的补全文本
#[derive(Debug, Default)]
pub struct MockLlmClient {
    scripted: Mutex<VecDeque<String>>,
}

impl MockLlmClient {
    pub fn new(outputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            scripted: Mutex::new(outputs.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str, _stop: &[String]) -> Result<String, String> {
        let mut scripted = self.scripted.lock().map_err(|e| e.to_string())?;
        Ok(scripted
            .pop_front()
            .unwrap_or_else(|| "Thought: I now know the final answer\nFinal Answer: (mock)".to_string()))
    }
}

/// 确定性嵌入器：26 维小写字母频率，L2 归一化
#[derive(Debug, Default)]
pub struct MockEmbedder;

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String> {
        let mut v = vec![0.0f32; 26];
        for c in text.chars().flat_map(|c| c.to_lowercase()) {
            if c.is_ascii_lowercase() {
                v[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }
}
