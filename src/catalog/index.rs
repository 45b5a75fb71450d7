//! 插件相似度索引
//!
//! build 时将每份清单的描述嵌入为定长向量；query 对查询文本做同样嵌入，
//! 按余弦相似度返回最近的 k 个插件标识（近者在前）。会话内构建一次，只读，
//! 不支持增量更新与删除。

use std::sync::Arc;

use crate::catalog::PluginManifest;
use crate::core::AgentError;
use crate::llm::EmbeddingProvider;

/// 内存向量索引：(插件标识, 向量) 列表 + 嵌入提供方
pub struct PluginIndex {
    entries: Vec<(String, Vec<f32>)>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl PluginIndex {
    /// 嵌入每份清单的 description_for_model 并建立索引；
    /// 空向量或维度不一致视为索引失败（对会话致命）
    pub async fn build(
        manifests: &[PluginManifest],
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, AgentError> {
        let mut entries = Vec::with_capacity(manifests.len());
        let mut dim = None;

        for manifest in manifests {
            let vector = embedder
                .embed(&manifest.description_for_model)
                .await
                .map_err(AgentError::Index)?;
            if vector.is_empty() {
                return Err(AgentError::Index(format!(
                    "empty embedding for plugin {}",
                    manifest.name_for_model
                )));
            }
            match dim {
                None => dim = Some(vector.len()),
                Some(d) if d != vector.len() => {
                    return Err(AgentError::Index(format!(
                        "embedding dimension mismatch for plugin {}: {} != {}",
                        manifest.name_for_model,
                        vector.len(),
                        d
                    )));
                }
                _ => {}
            }
            entries.push((manifest.name_for_model.clone(), vector));
        }

        Ok(Self { entries, embedder })
    }

    /// 返回与 text 最相似的 k 个插件标识，近者在前；相同分数保持目录顺序
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<String>, AgentError> {
        let query_vec = self.embedder.embed(text).await.map_err(AgentError::Index)?;
        if query_vec.is_empty() {
            return Err(AgentError::Index("empty query embedding".to_string()));
        }

        let mut scored: Vec<(f32, &str)> = self
            .entries
            .iter()
            .map(|(name, vector)| (cosine_similarity(&query_vec, vector), name.as_str()))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, name)| name.to_string())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 余弦相似度
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockEmbedder;

    fn manifest(name: &str, description: &str) -> PluginManifest {
        PluginManifest::from_json(
            "test",
            &serde_json::json!({
                "name_for_model": name,
                "description_for_model": description,
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_query_returns_nearest_first() {
        let manifests = vec![
            manifest("shopping", "compare prices of shirts and products"),
            manifest("schools", "rankings and ratings of schools"),
            manifest("language", "translate and learn foreign languages"),
        ];
        let index = PluginIndex::build(&manifests, Arc::new(MockEmbedder))
            .await
            .unwrap();
        assert_eq!(index.len(), 3);

        let top = index
            .query("rankings and ratings of schools", 2)
            .await
            .unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], "schools");
    }

    #[tokio::test]
    async fn test_k_larger_than_catalog() {
        let manifests = vec![manifest("only", "the only plugin here")];
        let index = PluginIndex::build(&manifests, Arc::new(MockEmbedder))
            .await
            .unwrap();
        let all = index.query("anything", 4).await.unwrap();
        assert_eq!(all, vec!["only".to_string()]);
    }
}
