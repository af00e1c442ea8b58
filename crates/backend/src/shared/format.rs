const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Response size for the access log: bytes below 1 KB, otherwise one decimal
/// in the largest fitting binary unit.
///
/// ```
/// use backend::shared::format::human_size;
/// assert_eq!(human_size(512), "512 B");
/// assert_eq!(human_size(1536), "1.5 KB");
/// ```
pub fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
