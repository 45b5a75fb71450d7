//! 插件清单：远程 API 的自然语言描述 + 可调用操作列表
//!
//! 清单 JSON 至少包含 name_for_model、description_for_model 与 operations；
//! 拉取后不可变，生命周期为一次会话。

use serde::Deserialize;

use crate::core::AgentError;

/// 一份插件清单：唯一标识、供模型阅读的描述、声明的操作列表（保持声明顺序）
#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    /// 唯一标识（相似度索引与 Toolkit 解析都以它为键）
    pub name_for_model: String,
    /// 自然语言描述，嵌入后用于相似度检索
    pub description_for_model: String,
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

/// 清单中声明的一个可调用操作
#[derive(Debug, Clone, Deserialize)]
pub struct OperationSpec {
    pub operation_id: String,
    /// 供模型理解的操作描述
    pub description: String,
    /// HTTP 方法，缺省 GET
    #[serde(default = "default_method")]
    pub method: String,
    pub url: String,
    /// GET 的查询参数名 / POST 的 JSON 字段名，缺省 "input"
    #[serde(default)]
    pub input_param: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl PluginManifest {
    /// 从 JSON 文本解析；字段缺失或格式错误返回 Fetch 错误（对会话致命）
    pub fn from_json(source: &str, body: &str) -> Result<Self, AgentError> {
        let manifest: PluginManifest = serde_json::from_str(body)
            .map_err(|e| AgentError::Fetch(format!("{}: {}", source, e)))?;
        if manifest.name_for_model.trim().is_empty() {
            return Err(AgentError::Fetch(format!(
                "{}: empty name_for_model",
                source
            )));
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let body = r#"{
            "name_for_model": "KlarnaProducts",
            "description_for_model": "Search and compare prices of products.",
            "operations": [
                {
                    "operation_id": "productsUsingGET",
                    "description": "Search for products",
                    "url": "https://www.klarna.com/us/shopping/public/openai/v0/products",
                    "input_param": "q"
                },
                {
                    "operation_id": "track",
                    "description": "Track an order",
                    "method": "POST",
                    "url": "https://www.klarna.com/track"
                }
            ]
        }"#;
        let m = PluginManifest::from_json("test", body).unwrap();
        assert_eq!(m.name_for_model, "KlarnaProducts");
        assert_eq!(m.operations.len(), 2);
        assert_eq!(m.operations[0].method, "GET");
        assert_eq!(m.operations[0].input_param.as_deref(), Some("q"));
        assert_eq!(m.operations[1].method, "POST");
        assert!(m.operations[1].input_param.is_none());
    }

    #[test]
    fn test_parse_manifest_without_operations() {
        let body = r#"{"name_for_model": "speak", "description_for_model": "Learn languages"}"#;
        let m = PluginManifest::from_json("test", body).unwrap();
        assert!(m.operations.is_empty());
    }

    #[test]
    fn test_malformed_manifest_is_fetch_error() {
        let err = PluginManifest::from_json("test", "not json").unwrap_err();
        assert!(matches!(err, AgentError::Fetch(_)));

        let err = PluginManifest::from_json(
            "test",
            r#"{"name_for_model": " ", "description_for_model": "x"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AgentError::Fetch(_)));
    }
}
