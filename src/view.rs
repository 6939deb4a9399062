//! 终端展示：上传表单、素材列表和提示
//!
//! `render_*` 只返回纯文本，颜色和光标控制由 [`TerminalNotifier`] 与 [`ProgressLine`] 负责。

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use crate::assets::{AssetRecord, QueryState};
use crate::nav::{MENU, MENU_LABEL};
use crate::notify::{Level, Notification, Notifier};
use crate::utils::{progress_bar, round_percentage, BAR_WIDTH};

/// 加载中显示的占位行数
pub const SKELETON_ROWS: usize = 5;

pub const ASSETS_TITLE: &str = "Assets";
pub const ASSETS_INTRO: &str =
    "This is the analysis page for the uploaded video and images. Detected brand exposure time in seconds";

pub fn render_heading(title: &str) -> String {
    format!("{}\n{}", title, "=".repeat(title.chars().count()))
}

pub fn render_skeleton() -> String {
    let mut out = String::new();
    for _ in 0..SKELETON_ROWS {
        let _ = writeln!(out, "{}", "░".repeat(24));
        let _ = writeln!(out, "  {}", "░".repeat(40));
    }
    out
}

pub fn render_asset_cards(assets: &[AssetRecord]) -> String {
    if assets.is_empty() {
        return "No assets yet\n".to_string();
    }

    let mut out = String::new();
    for asset in assets {
        let _ = writeln!(out, "{}", asset.name);
        let _ = writeln!(out, "  {}", asset.description);
    }
    out
}

pub fn render_asset_list(state: &QueryState<Vec<AssetRecord>>) -> String {
    match state {
        QueryState::Loading => render_skeleton(),
        QueryState::Error(message) => format!("Error: {}\n", message),
        QueryState::Success(assets) => render_asset_cards(assets),
    }
}

/// `[#####-----] Uploading... 50%`
pub fn render_progress(percentage: f64) -> String {
    format!(
        "{} Uploading... {}%",
        progress_bar(percentage, BAR_WIDTH),
        round_percentage(percentage)
    )
}

pub fn render_menu(current_path: &str) -> String {
    let mut out = format!("{}\n", MENU_LABEL);
    for item in MENU.iter() {
        let marker = if item.is_active(current_path) { ">" } else { " " };
        let _ = write!(out, "{} {:<14} {}", marker, item.title, item.path);
        if let Some(command) = item.command {
            let _ = write!(out, "  (brandscope {})", command);
        }
        out.push('\n');
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    match notification.level {
        Level::Success => format!("✓ {}", notification.message),
        Level::Error => format!("✗ {}", notification.message),
    }
}

/// 终端上才显示加载占位，返回是否已绘制
pub fn draw_skeleton() -> io::Result<bool> {
    let mut stderr = io::stderr();
    if !stderr.is_terminal() {
        return Ok(false);
    }
    execute!(stderr, Print(render_skeleton()))?;
    Ok(true)
}

pub fn clear_skeleton() -> io::Result<()> {
    execute!(
        io::stderr(),
        MoveUp((SKELETON_ROWS * 2) as u16),
        MoveToColumn(0),
        Clear(ClearType::FromCursorDown)
    )
}

/// 彩色输出到 stderr
///
/// 与 [`ProgressLine`] 共享光标状态：进度行未收尾时先换行。
#[derive(Debug, Default, Clone)]
pub struct TerminalNotifier {
    line_open: Arc<AtomicBool>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 与本通知器共用同一行状态的进度行
    pub fn progress_line(&self) -> ProgressLine {
        ProgressLine { open: self.line_open.clone() }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let text = render_notification(&notification);
        let styled = match notification.level {
            Level::Success => text.green(),
            Level::Error => text.red(),
        };

        let mut stderr = io::stderr();
        if self.line_open.swap(false, Ordering::SeqCst) {
            let _ = queue!(stderr, Print("\n"));
        }
        let _ = execute!(stderr, Print(styled), Print("\n"));
    }
}

/// 原地刷新的上传进度行
#[derive(Debug, Default)]
pub struct ProgressLine {
    open: Arc<AtomicBool>,
}

impl ProgressLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn draw(&mut self, percentage: f64) -> io::Result<()> {
        let mut stderr = io::stderr();
        queue!(
            stderr,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(render_progress(percentage))
        )?;
        stderr.flush()?;
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn finish(&mut self) -> io::Result<()> {
        if self.open.swap(false, Ordering::SeqCst) {
            execute!(io::stderr(), Print("\n"))?;
        }
        Ok(())
    }
}
