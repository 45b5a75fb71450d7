//! HTTP 操作工具：一份清单操作对应一个可调用工具
//!
//! GET 将输入作为查询参数发送，POST 发送单字段 JSON 体；
//! HTML 响应用 html2text 提取可读文本，超过 max_result_chars 时截断并追加 ...[truncated]。

use std::time::Duration;

use async_trait::async_trait;
use html2text::from_read;
use reqwest::Client;

use crate::catalog::OperationSpec;
use crate::tools::Tool;

/// 绑定到一个清单操作的调用句柄
pub struct HttpOperationTool {
    name: String,
    description: String,
    method: String,
    url: String,
    input_param: String,
    client: Client,
    max_result_chars: usize,
}

/// 简易去除 HTML 标签（html2text 失败时的回退）
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut prev_whitespace = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                let is_whitespace = c.is_whitespace();
                if is_whitespace && prev_whitespace {
                    continue;
                }
                prev_whitespace = is_whitespace;
                out.push(if is_whitespace { ' ' } else { c });
            }
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// 判断内容是否像 HTML（需提取可读文本）
fn looks_like_html(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("<!")
        || s.starts_with("<html")
        || s.starts_with("<HTML")
        || (s.len() > 20
            && s.contains('<')
            && (s.contains("</") || s.contains("<meta") || s.contains("<head") || s.contains("<title")))
}

/// 去除前导 BOM（reqwest 的编码嗅探通常已处理，这里兜底），避免 HTML 检测失败
fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{FEFF}')
}

/// 超过 limit 字符时截断并追加提示
fn truncate_chars(s: String, limit: usize) -> String {
    if s.chars().count() > limit {
        s.chars().take(limit).collect::<String>() + "\n...[truncated]"
    } else {
        s
    }
}

impl HttpOperationTool {
    /// 从清单操作构建；工具名为 "{plugin}.{operation_id}"，在一次会话内唯一
    pub fn new(
        plugin_name: &str,
        op: &OperationSpec,
        client: Client,
        max_result_chars: usize,
    ) -> Self {
        Self {
            name: format!("{}.{}", plugin_name, op.operation_id),
            description: op.description.clone(),
            method: op.method.to_uppercase(),
            url: op.url.clone(),
            input_param: op.input_param.clone().unwrap_or_else(|| "input".to_string()),
            client,
            max_result_chars,
        }
    }

    pub fn shared_client(timeout_secs: u64) -> Client {
        Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default()
    }

    fn readable(&self, body: String) -> String {
        let body = if looks_like_html(&body) {
            match from_read(body.as_bytes(), 120) {
                Ok(text) if !text.trim().is_empty() => text,
                _ => strip_html_tags(&body),
            }
        } else {
            body
        };
        truncate_chars(body, self.max_result_chars)
    }
}

#[async_trait]
impl Tool for HttpOperationTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        tracing::info!(tool = %self.name, method = %self.method, "tool invoke");

        let request = match self.method.as_str() {
            "POST" => self
                .client
                .post(&self.url)
                .json(&serde_json::json!({ &self.input_param: input })),
            _ => self
                .client
                .get(&self.url)
                .query(&[(self.input_param.as_str(), input)]),
        };

        let resp = request
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("Read body: {}", e))?;

        Ok(self.readable(strip_bom(&body).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(method: &str) -> OperationSpec {
        serde_json::from_value(serde_json::json!({
            "operation_id": "search",
            "description": "Search things",
            "method": method,
            "url": "https://example.com/api",
        }))
        .unwrap()
    }

    #[test]
    fn test_tool_naming() {
        let tool = HttpOperationTool::new("Klarna", &op("get"), Client::new(), 100);
        assert_eq!(tool.name(), "Klarna.search");
        assert_eq!(tool.description(), "Search things");
        assert_eq!(tool.method, "GET");
        assert_eq!(tool.input_param, "input");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html><body>x</body></html>"));
        assert!(looks_like_html("<html lang=\"en\"><head></head></html>"));
        assert!(!looks_like_html(r#"{"products": []}"#));
    }

    #[test]
    fn test_truncate_chars() {
        let s = "a".repeat(10);
        assert_eq!(truncate_chars(s.clone(), 10), s);
        let cut = truncate_chars("a".repeat(12), 10);
        assert!(cut.starts_with(&"a".repeat(10)));
        assert!(cut.ends_with("...[truncated]"));
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<p>hello   <b>world</b></p>"), "hello world");
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{FEFF}<html>x</html>"), "<html>x</html>");
        assert_eq!(strip_bom("plain text body"), "plain text body");
        assert!(looks_like_html(strip_bom("\u{FEFF}<!DOCTYPE html><html></html>")));
    }
}
