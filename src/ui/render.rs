//! 界面渲染
//!
//! 根据 UiState（phase、history、error）与两个输入缓冲绘制：标题栏显示阶段，
//! 主体为对话历史（按角色着色、按宽度换行），底部为查询输入框、掩码凭证输入框
//! 与提交控件（未就绪时呈禁用态）。

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::{submission_ready, AgentPhase, HistoryRole, UiState};

/// 单条消息在 UI 中显示的最大字符数，超过折叠避免刷屏
const MAX_DISPLAY_CHARS: usize = 600;

/// 输入焦点：Tab 在三者间循环
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFocus {
    #[default]
    Query,
    ApiKey,
    Send,
}

/// 对过长内容做折叠：保留前 N 字 + 省略提示
fn truncate_for_display(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= MAX_DISPLAY_CHARS {
        return content.to_string();
    }
    let head: String = chars.iter().take(MAX_DISPLAY_CHARS).collect();
    format!("{}\n... [已省略，共 {} 字]", head, chars.len())
}

/// 将内容按宽度换行，支持 UTF-8（按字符数，避免在 UTF-8 中间截断）
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    for para in s.split('\n') {
        let mut line = String::new();
        for ch in para.chars() {
            if line.chars().count() >= width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn phase_title(state: &UiState) -> String {
    let phase_str: String = match &state.phase {
        AgentPhase::Idle => "空闲".to_string(),
        AgentPhase::LoadingPlugins => "加载插件…".to_string(),
        AgentPhase::Thinking => "思考中…".to_string(),
        AgentPhase::Acting => state
            .active_tool
            .as_deref()
            .map(|t| format!("执行: {}", t))
            .unwrap_or_else(|| "执行中…".to_string()),
        AgentPhase::Error => "错误".to_string(),
    };
    format!(" Nectar │ {} ", phase_str)
}

/// 绘制一帧：上方对话区，下方查询输入、凭证输入与提交控件；
/// 将 (总行数, 可视高度) 写入 out 供外部 clamp 滚动
#[allow(clippy::too_many_arguments)]
pub fn draw(
    f: &mut Frame,
    state: &UiState,
    query_buffer: &str,
    key_buffer: &str,
    focus: InputFocus,
    conversation_scroll: usize,
    out: &mut (usize, usize),
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let conv_area = chunks[0];
    let content_width = conv_area.width.saturating_sub(2) as usize;

    let block = Block::default()
        .title(phase_title(state))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    // 对话内容：每条消息先截断，再按宽度换行；消息之间空行分隔
    let mut text_lines: Vec<Line> = Vec::new();
    for (idx, entry) in state.history.iter().enumerate() {
        if idx > 0 {
            text_lines.push(Line::from(Span::raw("")));
        }
        let (prefix, color) = match entry.role {
            HistoryRole::User => ("You ", Color::Cyan),
            HistoryRole::Agent => ("Bot ", Color::Green),
            HistoryRole::System => ("Sys ", Color::Gray),
        };
        let display_text = truncate_for_display(&entry.content);
        for (i, line) in wrap_text(&display_text, content_width.max(40)).into_iter().enumerate() {
            let pref = if i == 0 { prefix } else { "    " };
            text_lines.push(Line::from(vec![
                Span::styled(pref, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(line),
            ]));
        }
    }

    let content_height = conv_area.height.saturating_sub(2) as usize;
    let total_lines = text_lines.len();
    let max_scroll = total_lines.saturating_sub(content_height);
    let scroll_offset = conversation_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(text_lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset as u16, 0));
    f.render_widget(paragraph, conv_area);

    // 查询输入框
    let query_title = if let Some(err) = &state.error_message {
        format!(" 错误: {} ", err.chars().take(48).collect::<String>())
    } else if state.input_locked {
        " 等待回复… ".to_string()
    } else {
        " 查询 ".to_string()
    };
    let query_border = if state.error_message.is_some() {
        Color::Red
    } else if focus == InputFocus::Query {
        Color::Blue
    } else {
        Color::DarkGray
    };
    let hint = " Tab 切换焦点 │ Enter 提交 │ Ctrl+L 清空 │ Ctrl+Q 退出 ";
    let query_block = Block::default()
        .title(query_title)
        .title_bottom(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(query_border));
    let query_input = Paragraph::new(query_buffer)
        .block(query_block)
        .style(if state.input_locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        });
    f.render_widget(query_input, chunks[1]);

    // 凭证输入框（掩码显示）与提交控件
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(chunks[2]);

    let key_border = if focus == InputFocus::ApiKey {
        Color::Blue
    } else {
        Color::DarkGray
    };
    let masked = "•".repeat(key_buffer.chars().count());
    let key_input = Paragraph::new(masked).block(
        Block::default()
            .title(" OpenAI API Key ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(key_border)),
    );
    f.render_widget(key_input, bottom[0]);

    // 凭证不以 sk- 开头或查询为空时，提交控件呈禁用态（不提示错误）
    let ready = submission_ready(query_buffer, key_buffer) && !state.input_locked;
    let send_style = if ready {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let send_border = if focus == InputFocus::Send && ready {
        Color::Green
    } else {
        Color::DarkGray
    };
    let send = Paragraph::new(Line::from(Span::styled("  提交  ", send_style))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(send_border)),
    );
    f.render_widget(send, bottom[1]);

    out.0 = total_lines;
    out.1 = content_height;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_by_chars() {
        let lines = wrap_text("abcdef", 3);
        assert_eq!(lines, vec!["abc", "def"]);
        // 多字节字符按字符数换行
        let lines = wrap_text("你好世界", 2);
        assert_eq!(lines, vec!["你好", "世界"]);
    }

    #[test]
    fn test_truncate_for_display() {
        let short = "hi";
        assert_eq!(truncate_for_display(short), "hi");
        let long = "x".repeat(MAX_DISPLAY_CHARS + 1);
        assert!(truncate_for_display(&long).contains("已省略"));
    }
}
