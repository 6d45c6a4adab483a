//! Bar layout and status-line escape parsing. The actual drawing calls go
//! through an external drawable capability; this module only derives the
//! geometry and decoded draw commands that capability is driven with.
use crate::geometry::Rect;

/// One decoded segment of the status string.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusToken {
    Text(String),
    SetForeground { hex: String },
    SetBackground { hex: String },
    ResetColors,
    AdvanceX(i32),
    Rect { x: i32, y: i32, w: i32, h: i32 },
}

/// Parse a status string's inline escapes: `^c#RRGGBB^`, `^b#RRGGBB^`, `^d^`,
/// `^f<N>^`, `^r<x>,<y>,<w>,<h>^`. Malformed escapes are passed through as
/// literal text rather than aborting the whole parse.
pub fn parse_status(status: &str) -> Vec<StatusToken> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let bytes = status.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'^' {
            if let Some(end) = status[i + 1..].find('^') {
                let body = &status[i + 1..i + 1 + end];
                if let Some(tok) = parse_escape_body(body) {
                    if !text.is_empty() {
                        tokens.push(StatusToken::Text(std::mem::take(&mut text)));
                    }
                    tokens.push(tok);
                    i = i + 1 + end + 1;
                    continue;
                }
            }
        }
        let ch = status[i..].chars().next().unwrap();
        text.push(ch);
        i += ch.len_utf8();
    }
    if !text.is_empty() {
        tokens.push(StatusToken::Text(text));
    }
    tokens
}

fn parse_escape_body(body: &str) -> Option<StatusToken> {
    if let Some(hex) = body.strip_prefix('c') {
        return Some(StatusToken::SetForeground { hex: hex.to_string() });
    }
    if let Some(hex) = body.strip_prefix('b') {
        return Some(StatusToken::SetBackground { hex: hex.to_string() });
    }
    if body == "d" {
        return Some(StatusToken::ResetColors);
    }
    if let Some(n) = body.strip_prefix('f') {
        return n.parse().ok().map(StatusToken::AdvanceX);
    }
    if let Some(rest) = body.strip_prefix('r') {
        let parts: Vec<&str> = rest.split(',').collect();
        if parts.len() == 4 {
            if let (Ok(x), Ok(y), Ok(w), Ok(h)) =
                (parts[0].parse(), parts[1].parse(), parts[2].parse(), parts[3].parse())
            {
                return Some(StatusToken::Rect { x, y, w, h });
            }
        }
        return None;
    }
    None
}

/// The embedded systray icons' total reserved width, which shrinks the
/// status area without this crate implementing the `_NET_SYSTEM_TRAY_S0`
/// manager protocol itself.
#[derive(Debug, Clone, Default)]
pub struct Systray {
    pub icon_widths: Vec<i32>,
    pub spacing: i32,
}

impl Systray {
    pub fn reserved_width(&self) -> i32 {
        if self.icon_widths.is_empty() {
            return 0;
        }
        self.icon_widths.iter().sum::<i32>() + self.spacing * (self.icon_widths.len() as i32 + 1)
    }
}

/// A left-to-right division of the bar into its sections.
#[derive(Debug, Clone, Copy)]
pub struct BarLayout {
    pub tags: Rect,
    pub layout_symbol: Rect,
    pub title: Rect,
    pub status: Rect,
}

/// Lay out the bar given its full rect, the rendered width of the tag cells
/// and layout symbol (already measured by the drawable capability), and the
/// status text's measured width plus any reserved systray width.
pub fn layout_bar(bar: Rect, tags_w: i32, symbol_w: i32, status_w: i32, systray_w: i32) -> BarLayout {
    let tags = Rect::new(bar.x, bar.y, tags_w, bar.h);
    let layout_symbol = Rect::new(tags.x + tags.w, bar.y, symbol_w, bar.h);
    let status_total = status_w + systray_w;
    let status = Rect::new(bar.x + bar.w - status_total, bar.y, status_total, bar.h);
    let title_x = layout_symbol.x + layout_symbol.w;
    let title_w = (status.x - title_x).max(0);
    let title = Rect::new(title_x, bar.y, title_w, bar.h);
    BarLayout { tags, layout_symbol, title, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_and_reset_and_advance_escapes() {
        let tokens = parse_status("^c#ff0000^hi^d^^f10^there");
        assert_eq!(
            tokens,
            vec![
                StatusToken::SetForeground { hex: "#ff0000".into() },
                StatusToken::Text("hi".into()),
                StatusToken::ResetColors,
                StatusToken::AdvanceX(10),
                StatusToken::Text("there".into()),
            ]
        );
    }

    #[test]
    fn parses_rect_escape() {
        let tokens = parse_status("^r10,2,30,4^");
        assert_eq!(tokens, vec![StatusToken::Rect { x: 10, y: 2, w: 30, h: 4 }]);
    }

    #[test]
    fn unmatched_caret_is_passed_through_as_text() {
        let tokens = parse_status("plain ^ text");
        assert_eq!(tokens, vec![StatusToken::Text("plain ^ text".into())]);
    }

    #[test]
    fn systray_width_includes_spacing_on_both_sides() {
        let tray = Systray { icon_widths: vec![16, 16], spacing: 2 };
        assert_eq!(tray.reserved_width(), 16 + 16 + 2 * 3);
    }

    #[test]
    fn bar_layout_gives_title_the_remaining_middle_space() {
        let layout = layout_bar(Rect::new(0, 0, 1920, 23), 200, 40, 300, 50);
        assert_eq!(layout.title.x, 240);
        assert_eq!(layout.title.w, 1920 - 240 - 350);
    }
}
