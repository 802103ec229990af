use comrak::nodes::TableAlignment;

/// Structured result of rendering a markdown document.
///
/// The tree mirrors the markdown structure one node per construct. It holds
/// no layout information; [`super::layout`] turns it into terminal lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualTree {
    pub nodes: Vec<VisualNode>,
}

impl VisualTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Diagram slots in document order, as `(index, source)` pairs.
    pub fn diagrams(&self) -> Vec<(usize, &str)> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.collect_diagrams(&mut out);
        }
        out
    }

    /// Concatenated text of every node, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(VisualNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Column alignment for a rendered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<TableAlignment> for Alignment {
    fn from(value: TableAlignment) -> Self {
        match value {
            TableAlignment::None => Self::None,
            TableAlignment::Left => Self::Left,
            TableAlignment::Center => Self::Center,
            TableAlignment::Right => Self::Right,
        }
    }
}

/// One visual element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualNode {
    Heading {
        level: u8,
        children: Vec<VisualNode>,
    },
    Paragraph(Vec<VisualNode>),
    List {
        ordered: bool,
        start: usize,
        items: Vec<VisualNode>,
    },
    /// `task` is `Some(checked)` for task-list items.
    ListItem {
        task: Option<bool>,
        children: Vec<VisualNode>,
    },
    BlockQuote(Vec<VisualNode>),
    /// Fenced or indented code. `language` is the first word of the info string.
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// A `mermaid` fence. `index` counts diagrams in document order.
    Diagram {
        index: usize,
        source: String,
    },
    HorizontalRule,
    Table {
        alignments: Vec<Alignment>,
        rows: Vec<VisualNode>,
    },
    TableRow {
        header: bool,
        cells: Vec<VisualNode>,
    },
    TableCell(Vec<VisualNode>),
    /// Raw HTML block, kept as literal text.
    HtmlBlock(String),
    Text(String),
    Emphasis(Vec<VisualNode>),
    Strong(Vec<VisualNode>),
    Strikethrough(Vec<VisualNode>),
    InlineCode(String),
    Link {
        url: String,
        children: Vec<VisualNode>,
    },
    Image {
        url: String,
        alt: String,
    },
    SoftBreak,
    LineBreak,
}

impl VisualNode {
    /// Whether the node lays out as its own block.
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Heading { .. }
                | Self::Paragraph(_)
                | Self::List { .. }
                | Self::ListItem { .. }
                | Self::BlockQuote(_)
                | Self::CodeBlock { .. }
                | Self::Diagram { .. }
                | Self::HorizontalRule
                | Self::Table { .. }
                | Self::TableRow { .. }
                | Self::TableCell(_)
                | Self::HtmlBlock(_)
        )
    }

    /// Child nodes, if the variant has any.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Heading { children, .. }
            | Self::ListItem { children, .. }
            | Self::Link { children, .. }
            | Self::Paragraph(children)
            | Self::BlockQuote(children)
            | Self::TableCell(children)
            | Self::Emphasis(children)
            | Self::Strong(children)
            | Self::Strikethrough(children) => children,
            Self::List { items, .. } => items,
            Self::Table { rows, .. } => rows,
            Self::TableRow { cells, .. } => cells,
            _ => &[],
        }
    }

    /// Text content with markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(text) | Self::InlineCode(text) | Self::HtmlBlock(text) => text.clone(),
            Self::CodeBlock { code, .. } => code.clone(),
            Self::Diagram { source, .. } => source.clone(),
            Self::Image { alt, .. } => alt.clone(),
            Self::SoftBreak | Self::LineBreak => " ".to_string(),
            Self::HorizontalRule => String::new(),
            node => {
                let separator = if node.children().iter().any(Self::is_block) {
                    "\n"
                } else {
                    ""
                };
                node.children()
                    .iter()
                    .map(Self::plain_text)
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        }
    }

    fn collect_diagrams<'a>(&'a self, out: &mut Vec<(usize, &'a str)>) {
        if let Self::Diagram { index, source } = self {
            out.push((*index, source.as_str()));
            return;
        }
        for child in self.children() {
            child.collect_diagrams(out);
        }
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Inline spans, if the line carries any.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
    pub bg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    CodeBlock,
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    Table,
    HorizontalRule,
    Image,
    /// Placeholder or rasterized diagram rows
    Diagram,
    /// Diagram error box
    DiagramError,
    Empty,
}
