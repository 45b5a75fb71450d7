//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `NECTAR__*` 覆盖（双下划线表示嵌套，
//! 如 `NECTAR__RETRIEVAL__TOP_K=2`）。API 凭证不在配置中：由用户在界面输入，仅存活一次会话。

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
    #[serde(default)]
    pub plugins: PluginsSection,
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub http: HttpSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            llm: LlmSection::default(),
            retrieval: RetrievalSection::default(),
            plugins: PluginsSection::default(),
            agent: AgentSection::default(),
            http: HttpSection::default(),
        }
    }
}

/// [app] 段：应用名
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [llm] 段：补全模型与可选 base_url（OpenAI 兼容端点）
/// 模型调用不设本地超时，超时责任在被调用服务一侧
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// [retrieval] 段：嵌入模型与每轮选取的插件数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSection {
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// 相似度检索返回的插件数 k
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            top_k: default_top_k(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_top_k() -> usize {
    4
}

/// [plugins] 段：清单地址列表，每个地址返回一份插件清单 JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PluginsSection {
    #[serde(default = "default_manifest_urls")]
    pub manifest_urls: Vec<String>,
}

impl Default for PluginsSection {
    fn default() -> Self {
        Self {
            manifest_urls: default_manifest_urls(),
        }
    }
}

fn default_manifest_urls() -> Vec<String> {
    vec![
        "https://api.speak.com/.well-known/ai-plugin.json".into(),
        "https://www.klarna.com/.well-known/ai-plugin.json".into(),
        "https://schooldigger.com/.well-known/ai-plugin.json".into(),
    ]
}

/// [agent] 段：循环迭代上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    /// Thinking -> Acting 循环的最大次数，超出后软停止并返回最后输出
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_max_iterations() -> usize {
    3
}

/// [http] 段：清单拉取与工具调用的超时、结果大小限制
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
    /// 工具观察结果保留的最大字符数，超出截断
    #[serde(default = "default_max_result_chars")]
    pub max_result_chars: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            tool_timeout_secs: default_tool_timeout_secs(),
            max_result_chars: default_max_result_chars(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_tool_timeout_secs() -> u64 {
    30
}

fn default_max_result_chars() -> usize {
    8000
}

/// 从 config 目录加载配置，环境变量 NECTAR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 最后叠加环境变量 NECTAR__*（双下划线表示嵌套键）
pub fn load_config() -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("NECTAR")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.retrieval.top_k, 4);
        assert_eq!(cfg.agent.max_iterations, 3);
        assert_eq!(cfg.plugins.manifest_urls.len(), 3);
        assert_eq!(cfg.http.max_result_chars, 8000);
    }
}
