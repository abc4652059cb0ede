use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use xsm_core::restore::MoveReport;
use xsm_core::sessions::{SessionListing, WindowRecord};

fn border(left: &str, mid: &str, right: &str, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(mid), right)
}

fn row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| truncate(cell, *width))
        .collect();
    format!("│ {} │", padded.join(" │ "))
}

/// Column width: widest cell (or header), clamped to `min..=max`.
fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>, max: usize) -> usize {
    cells
        .map(UnicodeWidthStr::width)
        .chain(std::iter::once(header.width()))
        .max()
        .unwrap_or(0)
        .min(max)
}

fn print_table(headers: &[&str], rows: &[Vec<String>], max_widths: &[usize]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            column_width(header, rows.iter().map(|r| r[i].as_str()), max_widths[i])
        })
        .collect();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    println!("{}", border("┌", "┬", "┐", &widths));
    println!("{}", row(&header_cells, &widths));
    println!("{}", border("├", "┼", "┤", &widths));
    for cells in rows {
        println!("{}", row(cells, &widths));
    }
    println!("{}", border("└", "┴", "┘", &widths));
}

/// Print the windows recorded in a session
pub fn print_records_table(records: &[WindowRecord]) {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.window_id.to_string(),
                r.desktop_number.to_string(),
                r.window_title.clone(),
                r.application_name.clone(),
                r.command_line.join(" "),
            ]
        })
        .collect();

    print_table(
        &["Window", "Desktop", "Title", "App", "Command"],
        &rows,
        &[10, 7, 40, 20, 40],
    );
    println!("\nTotal: {} window(s)", records.len());
}

/// Print the sessions found in the sessions directory
pub fn print_sessions_table(sessions: &[SessionListing]) {
    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|s| match &s.summary {
            Ok(summary) => vec![
                s.name.clone(),
                summary.window_count.to_string(),
                summary
                    .session_create_time
                    .map(|t| {
                        t.with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M:%S")
                            .to_string()
                    })
                    .unwrap_or_else(|| "-".to_string()),
            ],
            Err(message) => vec![s.name.clone(), "-".to_string(), format!("unreadable: {}", message)],
        })
        .collect();

    print_table(&["Session", "Windows", "Created"], &rows, &[30, 7, 40]);
    println!("\nTotal: {} session(s)", sessions.len());
}

/// Print per-record move outcomes of a restore or move run
pub fn print_moves_table(moves: &[MoveReport]) {
    let rows: Vec<Vec<String>> = moves
        .iter()
        .map(|m| {
            vec![
                m.record.window_title.clone(),
                m.record.application_name.clone(),
                m.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
                m.record.desktop_number.to_string(),
                m.outcome.label().to_string(),
            ]
        })
        .collect();

    print_table(&["Title", "App", "Pid", "Desktop", "Result"], &rows, &[40, 20, 8, 7, 14]);
}

/// Fit `s` into `max_width` terminal columns, padding or cutting with "...".
pub fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        return format!("{}{}", s, " ".repeat(max_width - width));
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    let dots = max_width.min(3);
    format!("{}{}{}", out, ".".repeat(dots), " ".repeat(max_width - used - dots))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short     ");
        assert_eq!(truncate("this-is-a-very-long-string", 10), "this-is...");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_edge_cases() {
        assert_eq!(truncate("", 5), "     ");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 2), "..");
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        // Each CJK character takes two columns
        assert_eq!(truncate("日本語", 6), "日本語");
        assert_eq!(truncate("日本語のタイトル", 8), "日本... ");
        assert_eq!(truncate("日本語", 8).width(), 8);
    }

    #[test]
    fn test_border() {
        assert_eq!(border("┌", "┬", "┐", &[1, 2]), "┌───┬────┐");
    }

    #[test]
    fn test_column_width_is_clamped() {
        let cells = ["a", "a much longer cell"];
        assert_eq!(column_width("Hdr", cells.iter().copied(), 100), 18);
        assert_eq!(column_width("Hdr", cells.iter().copied(), 5), 5);
        assert_eq!(column_width("Header", std::iter::empty(), 100), 6);
    }
}
