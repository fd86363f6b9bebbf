//! Number, percent and name formatting for report cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker shown instead of a percentage when a cost appeared from zero.
pub const APPEARED_MARKER: &str = "+NEW";

/// Display rewrites for well-known module paths, applied in order.
pub const NAME_REWRITES: &[(&str, &str)] = &[
    ("github.com/hajimehoshi/ebiten/v2/", "ebiten/"),
    ("github.com/ebitenui/ebitenui/", "ebitenui/"),
    ("github.com/bytearena/ecs.", "ecs."),
    ("github.com/golang/freetype/", "freetype/"),
    ("golang.org/x/sys/windows.", "windows."),
];

/// Default maximum display width for function names.
pub const DEFAULT_MAX_NAME_LEN: usize = 55;

/// Format milliseconds: `850ms`, `12,345ms`.
#[must_use]
pub fn format_ms(ms: f64) -> String {
    let rounded = format!("{ms:.0}");
    if ms >= 1000.0 {
        format!("{}ms", group_thousands(&rounded))
    } else {
        format!("{rounded}ms")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format the change from `old` to `new` as a signed integer percent.
///
/// A zero baseline renders [`APPEARED_MARKER`] (or `0%` if nothing changed).
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_change(old: f64, new: f64) -> String {
    if old == 0.0 {
        if new == 0.0 {
            return "0%".to_string();
        }
        return APPEARED_MARKER.to_string();
    }
    let pct = ((new - old) / old) * 100.0;
    let sign = if pct > 0.0 { "+" } else { "" };
    format!("{sign}{pct:.0}%")
}

/// Shorten a function name for display.
///
/// Strips `own_prefix`, rewrites [`NAME_REWRITES`], then truncates to
/// `max_len` columns. Display only; matching always uses the full name.
#[must_use]
pub fn shorten_name(name: &str, own_prefix: &str, max_len: usize) -> String {
    let mut short = if own_prefix.is_empty() {
        name.to_string()
    } else {
        name.replace(own_prefix, "")
    };
    for (from, to) in NAME_REWRITES {
        short = short.replace(from, to);
    }
    truncate_name(&short, max_len)
}

/// Truncate to fit within `max_len` visible columns, ending in `...`.
///
/// Handles wide characters correctly using `unicode-width`.
#[must_use]
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if UnicodeWidthStr::width(name) <= max_len {
        return name.to_string();
    }

    if max_len <= 3 {
        return take_columns(name, max_len);
    }

    let mut s = take_columns(name, max_len - 3);
    s.push_str("...");
    s
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut w = 0;
    let mut s = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if w + cw > columns {
            break;
        }
        w += cw;
        s.push(c);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms_small() {
        assert_eq!(format_ms(0.0), "0ms");
        assert_eq!(format_ms(999.0), "999ms");
        assert_eq!(format_ms(120.4), "120ms");
    }

    #[test]
    fn test_format_ms_grouped() {
        assert_eq!(format_ms(1000.0), "1,000ms");
        assert_eq!(format_ms(16_140.0), "16,140ms");
        assert_eq!(format_ms(1_234_567.0), "1,234,567ms");
    }

    #[test]
    fn test_format_ms_negative_stays_ungrouped() {
        assert_eq!(format_ms(-250.0), "-250ms");
        assert_eq!(format_ms(-1500.0), "-1500ms");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(100.0, 135.0), "+35%");
        assert_eq!(format_change(200.0, 100.0), "-50%");
        assert_eq!(format_change(100.0, 100.0), "0%");
    }

    #[test]
    fn test_format_change_zero_baseline() {
        assert_eq!(format_change(0.0, 5.0), "+NEW");
        assert_eq!(format_change(0.0, 0.0), "0%");
    }

    #[test]
    fn test_shorten_strips_known_prefixes() {
        assert_eq!(
            shorten_name("game_main/world.(*Map).Update", "game_main/", 55),
            "world.(*Map).Update"
        );
        assert_eq!(
            shorten_name(
                "github.com/hajimehoshi/ebiten/v2/internal/ui.(*context).updateFrame",
                "game_main/",
                80
            ),
            "ebiten/internal/ui.(*context).updateFrame"
        );
        assert_eq!(
            shorten_name("github.com/bytearena/ecs.(*Manager).Query", "game_main/", 55),
            "ecs.(*Manager).Query"
        );
    }

    #[test]
    fn test_shorten_truncates_long_names() {
        let long = format!("main.{}", "x".repeat(80));
        let short = shorten_name(&long, "game_main/", 55);
        assert_eq!(UnicodeWidthStr::width(short.as_str()), 55);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_truncate_name_wide_chars() {
        assert_eq!(truncate_name("日本語日本語", 7), "日本...");
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("abcdef", 2), "ab");
        assert_eq!(truncate_name("abc", 0), "");
    }
}
