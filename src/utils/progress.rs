/// 进度条宽度
pub const BAR_WIDTH: usize = 30;

/// 格式化字节数
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const UNIT_SIZE: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= UNIT_SIZE && unit_index < UNITS.len() - 1 {
        size /= UNIT_SIZE;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// 百分比取整，限制在 [0, 100]
pub fn round_percentage(percentage: f64) -> u8 {
    percentage.clamp(0.0, 100.0).round() as u8
}

/// 绘制固定宽度的进度条
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
