//! Flatten a [`VisualTree`] into styled terminal lines for the preview pane.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{
    Alignment, InlineSpan, InlineStyle, LineType, RenderedLine, VisualNode, VisualTree,
};
use crate::diagram::{DiagramDisplay, DiagramSet, ERROR_LABEL, PLACEHOLDER_TEXT, Raster};

const CODE_RIGHT_PADDING: usize = 3;
/// Frame overhead of a code box: `│ ` + padding + ` │`.
const FRAME_OVERHEAD: usize = 4 + CODE_RIGHT_PADDING;
const QUOTE_PREFIX: &str = "│ ";

/// Lay out `tree` at `width` columns. Diagram slots draw the current state
/// held by `diagrams`.
pub fn layout(tree: &VisualTree, diagrams: &DiagramSet, width: u16) -> Vec<RenderedLine> {
    let _scope = tracing::info_span!(target: "perf", "document.layout").entered();
    let mut lines = Vec::new();
    let width = usize::from(width.max(1));
    for node in &tree.nodes {
        layout_block(node, diagrams, width, &mut lines);
    }
    trim_trailing_empty(&mut lines);
    lines
}

fn layout_block(
    node: &VisualNode,
    diagrams: &DiagramSet,
    width: usize,
    lines: &mut Vec<RenderedLine>,
) {
    match node {
        VisualNode::Heading { level, children } => {
            // Keep headings visually separated with two rows above.
            if !lines.is_empty() {
                ensure_trailing_empty_lines(lines, 2);
            }
            let prefix = format!("{} ", "#".repeat(usize::from(*level)));
            let continuation = " ".repeat(prefix.len());
            let spans: Vec<InlineSpan> = inline_segments(children).into_iter().flatten().collect();
            push_wrapped(
                lines,
                &spans,
                width,
                &prefix,
                &continuation,
                LineType::Heading(*level),
            );
            push_empty(lines);
        }

        VisualNode::Paragraph(children) => {
            for segment in inline_segments(children) {
                push_wrapped(lines, &segment, width, "", "", LineType::Paragraph);
            }
            push_empty(lines);
        }

        VisualNode::List {
            ordered,
            start,
            items,
        } => {
            layout_list(*ordered, *start, items, diagrams, width, 1, lines);
            push_empty(lines);
        }

        VisualNode::BlockQuote(children) => {
            let mut inner = Vec::new();
            let inner_width = width.saturating_sub(display_width(QUOTE_PREFIX)).max(1);
            for child in children {
                layout_block(child, diagrams, inner_width, &mut inner);
            }
            trim_trailing_empty(&mut inner);
            for line in inner {
                lines.push(prefix_line(line, QUOTE_PREFIX, LineType::BlockQuote));
            }
            push_empty(lines);
        }

        VisualNode::CodeBlock { language, code } => {
            let body: Vec<Vec<InlineSpan>> = code.lines().map(plain_spans).collect();
            lines.extend(framed(
                language.as_deref().unwrap_or("code"),
                &body,
                width,
                LineType::CodeBlock,
            ));
            push_empty(lines);
        }

        VisualNode::Diagram { index, source } => {
            layout_diagram(diagrams.display(*index, source), source, width, lines);
        }

        VisualNode::HorizontalRule => {
            lines.push(RenderedLine::new(
                "─".repeat(width),
                LineType::HorizontalRule,
            ));
            push_empty(lines);
        }

        VisualNode::Table { alignments, rows } => {
            for line in render_table(rows, alignments, width) {
                lines.push(RenderedLine::new(line, LineType::Table));
            }
            push_empty(lines);
        }

        VisualNode::HtmlBlock(html) => {
            for raw in html.lines() {
                push_wrapped(lines, &plain_spans(raw), width, "", "", LineType::Paragraph);
            }
            push_empty(lines);
        }

        VisualNode::ListItem { .. } => {
            layout_list(false, 1, std::slice::from_ref(node), diagrams, width, 1, lines);
        }

        VisualNode::TableRow { .. } | VisualNode::TableCell(_) => {
            layout_block(
                &VisualNode::Paragraph(node.children().to_vec()),
                diagrams,
                width,
                lines,
            );
        }

        inline => {
            layout_block(
                &VisualNode::Paragraph(vec![inline.clone()]),
                diagrams,
                width,
                lines,
            );
        }
    }
}

fn layout_list(
    ordered: bool,
    start: usize,
    items: &[VisualNode],
    diagrams: &DiagramSet,
    width: usize,
    depth: usize,
    lines: &mut Vec<RenderedLine>,
) {
    let number_width = (start + items.len().saturating_sub(1)).to_string().len();

    for (index, item) in items.iter().enumerate() {
        let VisualNode::ListItem { task, children } = item else {
            layout_block(item, diagrams, width, lines);
            continue;
        };
        let marker = match task {
            Some(true) => "✓ ".to_string(),
            Some(false) => "□ ".to_string(),
            None if ordered => format!("{:>number_width$}. ", start + index),
            None => "• ".to_string(),
        };
        let indent = " ".repeat(display_width(&marker));
        let inner_width = width.saturating_sub(indent.len()).max(1);
        let line_type = LineType::ListItem(depth);

        let mut inner: Vec<RenderedLine> = Vec::new();
        let mut paragraphs = 0usize;
        for child in children {
            match child {
                VisualNode::Paragraph(inlines) => {
                    if paragraphs > 0 {
                        inner.push(RenderedLine::new(String::new(), line_type));
                    }
                    for segment in inline_segments(inlines) {
                        push_wrapped(&mut inner, &segment, inner_width, "", "", line_type);
                    }
                    paragraphs += 1;
                }
                VisualNode::List {
                    ordered,
                    start,
                    items,
                } => {
                    layout_list(
                        *ordered,
                        *start,
                        items,
                        diagrams,
                        inner_width,
                        depth + 1,
                        &mut inner,
                    );
                }
                other => {
                    layout_block(other, diagrams, inner_width, &mut inner);
                    trim_trailing_empty(&mut inner);
                }
            }
        }
        if inner.is_empty() {
            inner.push(RenderedLine::new(String::new(), line_type));
        }

        for (row, line) in inner.into_iter().enumerate() {
            let prefix = if row == 0 { &marker } else { &indent };
            lines.push(prefix_line(line, prefix, line_type));
        }
    }
}

fn layout_diagram(
    display: DiagramDisplay<'_>,
    source: &str,
    width: usize,
    lines: &mut Vec<RenderedLine>,
) {
    match display {
        DiagramDisplay::Blank => return,
        DiagramDisplay::Disabled => {
            let body: Vec<Vec<InlineSpan>> = source.lines().map(plain_spans).collect();
            lines.extend(framed("mermaid", &body, width, LineType::CodeBlock));
        }
        DiagramDisplay::Pending => {
            lines.push(RenderedLine::new(
                format!("  {PLACEHOLDER_TEXT}"),
                LineType::Diagram,
            ));
        }
        DiagramDisplay::Failed { message } => {
            let content_width = width.saturating_sub(FRAME_OVERHEAD).max(1);
            let mut body = Vec::new();
            for raw in message.lines() {
                body.extend(wrap_spans(&plain_spans(raw), content_width, "", ""));
            }
            body.push(Vec::new());
            // Source is shown verbatim; long lines continue on the next row.
            for raw in source.trim_end().lines() {
                body.extend(hard_wrap(raw, content_width).iter().map(|row| plain_spans(row)));
            }
            lines.extend(framed(ERROR_LABEL, &body, width, LineType::DiagramError));
        }
        DiagramDisplay::Rendered { raster: Some(raster) } => {
            lines.extend(raster_lines(raster));
        }
        DiagramDisplay::Rendered { raster: None } => {
            lines.push(RenderedLine::new(
                "  [mermaid diagram]".to_string(),
                LineType::Diagram,
            ));
        }
    }
    push_empty(lines);
}

/// One line per raster row; runs of identical cells share a span.
fn raster_lines(raster: &Raster) -> Vec<RenderedLine> {
    raster
        .rows
        .iter()
        .map(|row| {
            let mut spans: Vec<InlineSpan> = Vec::new();
            let mut run = 0usize;
            for (i, cell) in row.iter().enumerate() {
                run += 1;
                if row.get(i + 1) == Some(cell) {
                    continue;
                }
                let style = InlineStyle {
                    fg: Some(cell.top),
                    bg: Some(cell.bottom),
                    ..InlineStyle::default()
                };
                spans.push(InlineSpan::new("▀".repeat(run), style));
                run = 0;
            }
            RenderedLine::with_spans("▀".repeat(row.len()), LineType::Diagram, spans)
        })
        .collect()
}

/// Draw `body` inside a box with `label` in the top border.
fn framed(
    label: &str,
    body: &[Vec<InlineSpan>],
    width: usize,
    line_type: LineType,
) -> Vec<RenderedLine> {
    let max_content = width.saturating_sub(FRAME_OVERHEAD).max(1);
    let label = format!(" {label} ");
    let content_width = body
        .iter()
        .map(|spans| display_width(&spans_to_string(spans)))
        .max()
        .unwrap_or(0)
        .max(display_width(&label).saturating_sub(2 + CODE_RIGHT_PADDING))
        .min(max_content);
    let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;

    let visible_label = truncate_text(&label, frame_inner_width);
    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(RenderedLine::new(
        format!(
            "┌{}{}┐",
            visible_label,
            "─".repeat(frame_inner_width.saturating_sub(display_width(&visible_label)))
        ),
        line_type,
    ));

    for spans in body {
        let trimmed = truncate_spans(spans, content_width);
        let used = display_width(&spans_to_string(&trimmed));
        let padding = " ".repeat(content_width.saturating_sub(used) + CODE_RIGHT_PADDING);

        let mut line_spans = vec![InlineSpan::new("│ ".to_string(), InlineStyle::default())];
        line_spans.extend(trimmed);
        line_spans.push(InlineSpan::new(format!("{padding} │"), InlineStyle::default()));
        out.push(RenderedLine::with_spans(
            spans_to_string(&line_spans),
            line_type,
            line_spans,
        ));
    }

    out.push(RenderedLine::new(
        format!("└{}┘", "─".repeat(frame_inner_width)),
        line_type,
    ));
    out
}

/// Prepend `prefix` to a line. Plain lines adopt `container` as their type;
/// lines with their own styling (code, headings, diagrams) keep it.
fn prefix_line(line: RenderedLine, prefix: &str, container: LineType) -> RenderedLine {
    let line_type = match line.line_type() {
        LineType::Paragraph | LineType::Empty => container,
        other => *other,
    };
    let mut spans = vec![InlineSpan::new(prefix.to_string(), InlineStyle::default())];
    match line.spans() {
        Some(existing) => spans.extend(existing.iter().cloned()),
        None if !line.content().is_empty() => {
            spans.push(InlineSpan::new(line.content().to_string(), InlineStyle::default()));
        }
        None => {}
    }
    RenderedLine::with_spans(spans_to_string(&spans), line_type, spans)
}

/// Inline spans split at hard line breaks.
fn inline_segments(nodes: &[VisualNode]) -> Vec<Vec<InlineSpan>> {
    let mut segments = vec![Vec::new()];
    collect_spans(nodes, InlineStyle::default(), &mut segments);
    segments
}

fn collect_spans(nodes: &[VisualNode], style: InlineStyle, segments: &mut Vec<Vec<InlineSpan>>) {
    for node in nodes {
        match node {
            VisualNode::Text(text) => push_span(segments, text.clone(), style),
            VisualNode::InlineCode(code) => {
                let code_style = InlineStyle {
                    code: true,
                    emphasis: false,
                    strong: false,
                    strikethrough: false,
                    ..style
                };
                push_span(segments, code.clone(), code_style);
            }
            VisualNode::Emphasis(children) => {
                collect_spans(children, InlineStyle { emphasis: true, ..style }, segments);
            }
            VisualNode::Strong(children) => {
                collect_spans(children, InlineStyle { strong: true, ..style }, segments);
            }
            VisualNode::Strikethrough(children) => {
                let next = InlineStyle {
                    strikethrough: true,
                    ..style
                };
                collect_spans(children, next, segments);
            }
            VisualNode::Link { children, .. } => {
                collect_spans(children, InlineStyle { link: true, ..style }, segments);
            }
            VisualNode::Image { url, alt } => {
                let label = if alt.is_empty() { url } else { alt };
                push_span(segments, format!("[Image: {label}]"), style);
            }
            VisualNode::SoftBreak => push_span(segments, " ".to_string(), style),
            VisualNode::LineBreak => segments.push(Vec::new()),
            other => collect_spans(other.children(), style, segments),
        }
    }
}

fn push_span(segments: &mut [Vec<InlineSpan>], text: String, style: InlineStyle) {
    if let Some(last) = segments.last_mut() {
        last.push(InlineSpan::new(text, style));
    }
}

fn plain_spans(text: &str) -> Vec<InlineSpan> {
    vec![InlineSpan::new(text.to_string(), InlineStyle::default())]
}

fn push_wrapped(
    lines: &mut Vec<RenderedLine>,
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
    line_type: LineType,
) {
    for line_spans in wrap_spans(spans, width, prefix_first, prefix_next) {
        let content = spans_to_string(&line_spans);
        lines.push(RenderedLine::with_spans(content, line_type, line_spans));
    }
}

fn push_empty(lines: &mut Vec<RenderedLine>) {
    lines.push(RenderedLine::new(String::new(), LineType::Empty));
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        push_empty(lines);
    }
}

fn trim_trailing_empty(lines: &mut Vec<RenderedLine>) {
    while lines
        .last()
        .is_some_and(|line| line.content().trim().is_empty() && line.spans().is_none())
    {
        lines.pop();
    }
}

fn render_table(rows: &[VisualNode], alignments: &[Alignment], wrap_width: usize) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.children()
                .iter()
                .map(|cell| {
                    cell.plain_text()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect();
    let num_cols = alignments.len();
    if cells.is_empty() || num_cols == 0 {
        return Vec::new();
    }
    let has_header = matches!(rows.first(), Some(VisualNode::TableRow { header: true, .. }));

    let mut col_widths = vec![1_usize; num_cols];
    for row in &cells {
        for (idx, cell) in row.iter().enumerate().take(num_cols) {
            col_widths[idx] = col_widths[idx].max(display_width(cell));
        }
    }

    // Table row width is: 1 + sum(col_width + 3) for all columns.
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest_idx, _)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if col_widths[widest_idx] <= 1 {
            break;
        }
        col_widths[widest_idx] -= 1;
    }

    let mut lines = Vec::new();
    lines.push(render_table_border(&col_widths, '┌', '┬', '┐'));
    for (idx, row) in cells.iter().enumerate() {
        lines.push(render_table_row(row, &col_widths, alignments));
        if has_header && idx == 0 && cells.len() > 1 {
            lines.push(render_table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    lines.push(render_table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[Alignment]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(display_width(&content));

        out.push(' ');
        match alignments.get(idx).copied().unwrap_or_default() {
            Alignment::Right => {
                out.push_str(&" ".repeat(padding));
                out.push_str(&content);
            }
            Alignment::Center => {
                let left = padding / 2;
                out.push_str(&" ".repeat(left));
                out.push_str(&content);
                out.push_str(&" ".repeat(padding - left));
            }
            Alignment::Left | Alignment::None => {
                out.push_str(&content);
                out.push_str(&" ".repeat(padding));
            }
        }
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

/// Split `text` into rows of at most `max_width` columns, keeping every
/// character including leading whitespace.
fn hard_wrap(text: &str, max_width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            width = 0;
        }
        row.push(ch);
        width += ch_width;
    }
    rows.push(row);
    rows
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_line = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = display_width(prefix);
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
        }
    };

    start_line(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = display_width(token.text());
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            trim_trailing_whitespace(&mut current);
            lines.push(std::mem::take(&mut current));
            start_line(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    if has_word {
        trim_trailing_whitespace(&mut current);
    }
    if current.is_empty() && !prefix_first.is_empty() {
        current.push(InlineSpan::new(prefix_first.to_string(), InlineStyle::default()));
    }

    lines.push(current);
    lines
}

fn trim_trailing_whitespace(spans: &mut Vec<InlineSpan>) {
    while spans
        .last()
        .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        spans.pop();
    }
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }

    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let taken = truncate_text(span.text(), remaining);
        let used = display_width(&taken);
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
            remaining -= used;
        }
        if used < display_width(span.text()) {
            break;
        }
    }
    out
}
