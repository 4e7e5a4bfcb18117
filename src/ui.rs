//! Terminal rendering
//!
//! One render pass per key event: wrap the visible buffer lines into the
//! viewport, colour JSON tokens with a single scan per line, overlay the
//! cursor block, and finish with the mode/status bar and the command
//! line. Also hosts the side-by-side diff printer used by `--diff`.

use crossterm::style::Stylize;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::diff::{DiffResult, DiffTag};
use crate::editor::{Editor, Mode};
use crate::json;
use crate::primitives::display_width::{char_width, str_width};
use crate::primitives::wrap;

const GUTTER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::DIM);
const RECORD_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::DIM);
const TILDE_STYLE: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::DIM);

fn mode_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Normal => Color::Green,
        Mode::Insert => Color::Blue,
        Mode::Command => Color::Red,
    };
    Style::new()
        .fg(Color::White)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// `(line_number_width, record_number_width, total_prefix_width)`.
/// The record gutter is zero-width outside JSONL mode.
fn gutter_widths(editor: &Editor) -> (usize, usize, usize) {
    let ln_width = editor.lines.len().to_string().len().max(3);
    if !editor.jsonl {
        return (ln_width, 0, ln_width + 1);
    }
    let rec_count = json::record_numbers(&editor.lines)
        .into_iter()
        .max()
        .unwrap_or(0);
    let rec_width = rec_count.max(1).to_string().len().max(2);
    (ln_width, rec_width, rec_width + 1 + ln_width + 1)
}

/// Per-char syntax styles for one line of JSON text.
///
/// Strings before the first unquoted colon are keys (cyan), after it
/// values (green); brackets bold, numbers yellow, keywords magenta.
fn line_styles(line: &str) -> Vec<Style> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }

    let default = Style::new().fg(Color::White);
    let mut styles = vec![default; n];
    let mut is_in_str = vec![false; n];

    let mut in_str = false;
    let mut first_colon: Option<usize> = None;
    let mut prev = '\0';
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '"' && prev != '\\' {
            in_str = !in_str;
            is_in_str[i] = true;
        } else if in_str {
            is_in_str[i] = true;
        } else if ch == ':' && first_colon.is_none() {
            first_colon = Some(i);
        }
        prev = ch;
    }

    for (i, &ch) in chars.iter().enumerate() {
        if matches!(ch, '{' | '}' | '[' | ']') {
            styles[i] = default.add_modifier(Modifier::BOLD);
        } else if is_in_str[i] {
            let is_key = first_colon.map_or(true, |colon| i < colon);
            styles[i] = Style::new().fg(if is_key { Color::Cyan } else { Color::Green });
        } else if matches!(ch, '0'..='9' | '.' | '-' | '+' | 'e' | 'E') {
            styles[i] = Style::new().fg(Color::Yellow);
        }
    }

    // Keywords outside strings.
    for kw in ["true", "false", "null"] {
        let kw_chars: Vec<char> = kw.chars().collect();
        let mut start = 0;
        while start + kw_chars.len() <= n {
            let found = (start..=n - kw_chars.len())
                .find(|&p| chars[p..p + kw_chars.len()] == kw_chars[..]);
            let Some(p) = found else { break };
            for j in p..p + kw_chars.len() {
                if !is_in_str[j] {
                    styles[j] = Style::new().fg(Color::Magenta);
                }
            }
            start = p + 1;
        }
    }

    styles
}

/// Render one editor session into `area`: wrapped content rows, gutters,
/// the mode/status bar, and the command line.
pub fn render_editor(frame: &mut Frame, area: Rect, editor: &mut Editor) {
    if area.height < 3 || area.width < 10 {
        frame.render_widget(Paragraph::new("(too small)"), area);
        return;
    }
    let width = area.width as usize;
    let content_height = area.height as usize - 2;
    let (ln_width, rec_width, prefix_w) = gutter_widths(editor);
    let avail = width.saturating_sub(prefix_w).max(1);

    editor.set_viewport_rows(content_height);
    editor.ensure_cursor_visible(avail);

    let records = if editor.jsonl {
        Some(json::record_numbers(&editor.lines))
    } else {
        None
    };

    let mut rows: Vec<Line> = Vec::with_capacity(content_height + 2);
    let mut rows_used = 0;
    let mut line_idx = editor.scroll_top;

    while rows_used < content_height && line_idx < editor.lines.len() {
        let line = editor.lines[line_idx].clone();
        let chars: Vec<char> = line.chars().collect();
        let is_cursor_line = line_idx == editor.cursor_row;

        let mut segs = wrap::segments(&line, avail);
        // An end-of-line cursor may need one extra wrap row for its block.
        if is_cursor_line && editor.cursor_col >= chars.len() && !chars.is_empty() {
            let (ls, le) = segs[segs.len() - 1];
            let last_w: usize = chars[ls..le].iter().copied().map(char_width).sum();
            if last_w + 1 > avail {
                segs.push((chars.len(), chars.len()));
            }
        }

        let styles = line_styles(&line);
        let seg_count = segs.len();
        for (si, &(s_start, s_end)) in segs.iter().enumerate() {
            if rows_used >= content_height {
                break;
            }
            let mut spans: Vec<Span> = Vec::new();
            if si == 0 {
                spans.push(Span::styled(
                    format!("{:>ln_width$} ", line_idx + 1),
                    GUTTER_STYLE,
                ));
                if let Some(records) = &records {
                    let rec = records[line_idx];
                    if rec > 0 {
                        spans.push(Span::styled(format!("{rec:>rec_width$} "), RECORD_STYLE));
                    } else {
                        spans.push(Span::raw(" ".repeat(rec_width + 1)));
                    }
                }
            } else {
                spans.push(Span::raw(" ".repeat(prefix_w)));
            }

            // Batch runs of identically styled chars into one span.
            let mut col = s_start;
            while col < s_end {
                if is_cursor_line && col == editor.cursor_col {
                    spans.push(Span::styled(
                        chars[col].to_string(),
                        styles[col].add_modifier(Modifier::REVERSED),
                    ));
                    col += 1;
                    continue;
                }
                let sty = styles[col];
                let mut end = col + 1;
                while end < s_end
                    && styles[end] == sty
                    && !(is_cursor_line && end == editor.cursor_col)
                {
                    end += 1;
                }
                spans.push(Span::styled(chars[col..end].iter().collect::<String>(), sty));
                col = end;
            }
            // Cursor block past the last char (insert append position).
            if is_cursor_line && editor.cursor_col >= chars.len() && si == seg_count - 1 {
                spans.push(Span::styled(" ", Style::new().add_modifier(Modifier::REVERSED)));
            }
            rows.push(Line::from(spans));
            rows_used += 1;
        }
        line_idx += 1;
    }

    while rows_used < content_height {
        rows.push(Line::styled(
            format!("{:>width$}", "~", width = prefix_w.saturating_sub(1)),
            TILDE_STYLE,
        ));
        rows_used += 1;
    }

    rows.push(status_line(editor, width));
    if editor.mode() == Mode::Command {
        rows.push(Line::styled(
            format!(":{}", editor.command_buffer),
            Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    } else {
        rows.push(Line::raw(""));
    }

    frame.render_widget(Paragraph::new(Text::from(rows)), area);
}

fn status_line(editor: &Editor, width: usize) -> Line<'static> {
    let mode = editor.mode();
    let mode_label = format!(" {} ", mode.name());
    let mut spans = vec![Span::styled(mode_label.clone(), mode_style(mode))];

    let mut used = str_width(&mode_label);
    if editor.read_only {
        spans.push(Span::styled(
            " RO ",
            Style::new()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
        used += 4;
    }
    if let Some(pending) = editor.pending {
        let text = format!("  {pending}");
        used += str_width(&text);
        spans.push(Span::styled(
            text,
            Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let status = format!("  {}", editor.status);
    let pos = format!(
        " Ln {}/{}, Col {} ",
        editor.cursor_row + 1,
        editor.lines.len(),
        editor.cursor_col + 1
    );
    let spacer = width
        .saturating_sub(used)
        .saturating_sub(str_width(&status))
        .saturating_sub(str_width(&pos));
    spans.push(Span::raw(status));
    if spacer > 0 {
        spans.push(Span::raw(" ".repeat(spacer)));
    }
    spans.push(Span::styled(pos, Style::new().add_modifier(Modifier::BOLD)));
    Line::from(spans)
}

// -- Diff printing ---------------------------------------------------------

fn tag_marker(tag: DiffTag) -> char {
    match tag {
        DiffTag::Equal => ' ',
        DiffTag::Insert => '+',
        DiffTag::Delete => '-',
        DiffTag::Replace => '~',
    }
}

/// Print an aligned diff side by side on stdout, coloured per tag.
pub fn print_diff(result: &DiffResult) {
    let left_width = result
        .left_lines
        .iter()
        .map(|l| str_width(l))
        .max()
        .unwrap_or(0)
        .clamp(8, 80);

    for i in 0..result.len() {
        let left = &result.left_lines[i];
        let right = &result.right_lines[i];
        let tag = result.left_tags[i];
        let pad = left_width.saturating_sub(str_width(left));
        let row = format!(
            "{} {left}{} | {} {right}",
            tag_marker(tag),
            " ".repeat(pad),
            tag_marker(result.right_tags[i]),
        );
        match tag {
            DiffTag::Equal => println!("{row}"),
            DiffTag::Delete => println!("{}", row.red()),
            DiffTag::Insert => println!("{}", row.green()),
            DiffTag::Replace => println!("{}", row.yellow()),
        }
    }
    println!("{} hunk(s)", result.hunks.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_of(styles: &[Style], i: usize) -> Option<Color> {
        styles[i].fg
    }

    #[test]
    fn test_key_and_value_strings_differ() {
        let line = r#"    "key": "value","#;
        let styles = line_styles(line);
        assert_eq!(color_of(&styles, 5), Some(Color::Cyan));
        assert_eq!(color_of(&styles, 12), Some(Color::Green));
    }

    #[test]
    fn test_brackets_bold_numbers_yellow() {
        let line = r#"{"a": 42}"#;
        let styles = line_styles(line);
        assert!(styles[0].add_modifier.contains(Modifier::BOLD));
        assert_eq!(color_of(&styles, 6), Some(Color::Yellow));
        assert!(styles[8].add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_keywords_outside_strings_only() {
        let styles = line_styles(r#""x": true"#);
        assert_eq!(color_of(&styles, 5), Some(Color::Magenta));
        // Inside a string the keyword keeps its string colour.
        let styles = line_styles(r#""true""#);
        assert_eq!(color_of(&styles, 1), Some(Color::Cyan));
    }

    #[test]
    fn test_gutter_widths_jsonl() {
        let editor = Editor::new("{\"a\":1}\n{\"b\":2}", false, true);
        let (ln, rec, prefix) = gutter_widths(&editor);
        assert_eq!(ln, 3);
        assert_eq!(rec, 2);
        assert_eq!(prefix, rec + 1 + ln + 1);
    }
}
