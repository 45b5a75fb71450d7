//! Toolkit 解析：插件清单 -> 可调用工具列表
//!
//! 每份清单的操作按声明顺序展开为工具；映射在会话内稳定，
//! 构造时一次性展开全部清单（等价于按清单记忆化），resolve 仅做查表。

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;

use crate::catalog::PluginManifest;
use crate::tools::{HttpOperationTool, Tool};

/// 解析器：插件标识 -> 该插件的工具列表（Arc 共享，重复 resolve 返回同一批句柄）
pub struct ToolResolver {
    toolkits: HashMap<String, Vec<Arc<dyn Tool>>>,
}

impl ToolResolver {
    /// 展开全部清单；client 与结果大小限制由全部工具共享
    pub fn new(manifests: &[PluginManifest], client: Client, max_result_chars: usize) -> Self {
        let toolkits = manifests
            .iter()
            .map(|m| {
                (
                    m.name_for_model.clone(),
                    Self::expand(m, &client, max_result_chars),
                )
            })
            .collect();
        Self { toolkits }
    }

    /// 从现成的工具列表构建（测试或非 HTTP 工具来源）
    pub fn from_toolkits(toolkits: HashMap<String, Vec<Arc<dyn Tool>>>) -> Self {
        Self { toolkits }
    }

    /// 纯展开：一个操作一个工具，保持声明顺序
    fn expand(
        manifest: &PluginManifest,
        client: &Client,
        max_result_chars: usize,
    ) -> Vec<Arc<dyn Tool>> {
        manifest
            .operations
            .iter()
            .map(|op| {
                Arc::new(HttpOperationTool::new(
                    &manifest.name_for_model,
                    op,
                    client.clone(),
                    max_result_chars,
                )) as Arc<dyn Tool>
            })
            .collect()
    }

    /// 按插件标识取工具列表；未知标识返回空列表（索引只会返回已建索引的标识）
    pub fn resolve(&self, plugin_name: &str) -> Vec<Arc<dyn Tool>> {
        self.toolkits.get(plugin_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> PluginManifest {
        serde_json::from_value(serde_json::json!({
            "name_for_model": "Speak",
            "description_for_model": "Learn languages",
            "operations": [
                {"operation_id": "translate", "description": "Translate text", "url": "https://api.speak.com/translate"},
                {"operation_id": "explainPhrase", "description": "Explain a phrase", "url": "https://api.speak.com/explain"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_expand_preserves_declaration_order() {
        let resolver = ToolResolver::new(&[manifest()], Client::new(), 100);
        let tools = resolver.resolve("Speak");
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Speak.translate", "Speak.explainPhrase"]);
    }

    #[test]
    fn test_resolve_is_memoized() {
        let resolver = ToolResolver::new(&[manifest()], Client::new(), 100);
        let a = resolver.resolve("Speak");
        let b = resolver.resolve("Speak");
        assert!(Arc::ptr_eq(&a[0], &b[0]));
    }

    #[test]
    fn test_unknown_plugin_is_empty() {
        let resolver = ToolResolver::new(&[manifest()], Client::new(), 100);
        assert!(resolver.resolve("nope").is_empty());
    }
}
