//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx 与键盘事件：Tab 在查询框 / 凭证框 / 提交控件间
//! 切换焦点，Enter 在提交就绪（凭证以 sk- 开头且查询非空）时发送 Submit，否则不动作。
//! 提交后立即清空凭证缓冲，每帧用 draw 渲染 UiState 与输入缓冲。

use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossterm::event::KeyCode;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use crate::core::{submission_ready, Command, UiState};
use crate::ui::render::{draw, InputFocus};

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    state_rx: watch::Receiver<UiState>,
    cmd_tx: tokio::sync::mpsc::UnboundedSender<Command>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = super::event::EventHandler::new(cmd_tx);
    let mut query_buffer = String::new();
    let mut key_buffer = String::new();
    let mut focus = InputFocus::Query;
    let mut conversation_scroll = 0usize;
    let mut last_history_len = 0usize;

    loop {
        let state = state_rx.borrow().clone();

        if state.history.len() != last_history_len {
            last_history_len = state.history.len();
            conversation_scroll = usize::MAX;
        }

        if let Ok(Some(ev)) = event_handler.poll() {
            match ev {
                super::event::AppEvent::Command(cmd) => {
                    if matches!(cmd, Command::Quit) {
                        break;
                    }
                }
                super::event::AppEvent::Key(key) if !state.input_locked => {
                    match key.code {
                        KeyCode::Enter => {
                            // 提交未就绪时 Enter 不动作（控件禁用，无错误提示）
                            if submission_ready(&query_buffer, &key_buffer) {
                                let query = query_buffer.trim().to_string();
                                let api_key = std::mem::take(&mut key_buffer);
                                query_buffer.clear();
                                event_handler.send_submit(query, api_key);
                            }
                        }
                        KeyCode::Tab => {
                            focus = match focus {
                                InputFocus::Query => InputFocus::ApiKey,
                                InputFocus::ApiKey => InputFocus::Send,
                                InputFocus::Send => InputFocus::Query,
                            };
                        }
                        KeyCode::BackTab => {
                            focus = match focus {
                                InputFocus::Query => InputFocus::Send,
                                InputFocus::ApiKey => InputFocus::Query,
                                InputFocus::Send => InputFocus::ApiKey,
                            };
                        }
                        KeyCode::Backspace => {
                            match focus {
                                InputFocus::Query => {
                                    query_buffer.pop();
                                }
                                InputFocus::ApiKey => {
                                    key_buffer.pop();
                                }
                                InputFocus::Send => {}
                            }
                        }
                        KeyCode::Char(c) => match focus {
                            InputFocus::Query => query_buffer.push(c),
                            InputFocus::ApiKey => key_buffer.push(c),
                            InputFocus::Send => {}
                        },
                        KeyCode::Up => {
                            conversation_scroll = conversation_scroll.saturating_sub(1);
                        }
                        KeyCode::Down => {
                            conversation_scroll = conversation_scroll.saturating_add(1);
                        }
                        KeyCode::PageUp => {
                            conversation_scroll = conversation_scroll.saturating_sub(10);
                        }
                        KeyCode::PageDown => {
                            conversation_scroll = conversation_scroll.saturating_add(10);
                        }
                        KeyCode::Home => {
                            conversation_scroll = 0;
                        }
                        KeyCode::End => {
                            conversation_scroll = usize::MAX;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let mut scroll_info = (0usize, 0usize);
        terminal.draw(|f| {
            draw(
                f,
                &state,
                &query_buffer,
                &key_buffer,
                focus,
                conversation_scroll,
                &mut scroll_info,
            );
        })?;
        let (total_lines, viewport_height) = scroll_info;
        let max_scroll = total_lines.saturating_sub(viewport_height);
        conversation_scroll = conversation_scroll.min(max_scroll);

        tokio::task::yield_now().await;
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
