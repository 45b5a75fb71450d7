//! 插件清单加载器
//!
//! 按固定地址列表逐个 GET 并解析清单；任一地址不可达或格式错误即整体失败，
//! 不保留部分目录，也不重试。每次会话重新拉取。

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;

use crate::catalog::PluginManifest;
use crate::core::AgentError;

/// 清单加载器：带超时的 reqwest 客户端
pub struct CatalogLoader {
    client: Client,
}

impl CatalogLoader {
    pub fn new(fetch_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(fetch_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// 拉取并解析全部清单；标识重复视同格式错误（索引与 Toolkit 都以标识为键）
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<PluginManifest>, AgentError> {
        let mut manifests = Vec::with_capacity(urls.len());
        let mut seen = HashSet::new();

        for url in urls {
            let manifest = self.fetch_one(url).await?;
            if !seen.insert(manifest.name_for_model.clone()) {
                return Err(AgentError::Fetch(format!(
                    "duplicate plugin identifier: {}",
                    manifest.name_for_model
                )));
            }
            tracing::info!(
                plugin = %manifest.name_for_model,
                operations = manifest.operations.len(),
                "manifest loaded"
            );
            manifests.push(manifest);
        }

        Ok(manifests)
    }

    async fn fetch_one(&self, url: &str) -> Result<PluginManifest, AgentError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AgentError::Fetch(format!("{}: {}", url, e)))?;
        if !resp.status().is_success() {
            return Err(AgentError::Fetch(format!("{}: HTTP {}", url, resp.status())));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| AgentError::Fetch(format!("{}: {}", url, e)))?;
        PluginManifest::from_json(url, &body)
    }
}
