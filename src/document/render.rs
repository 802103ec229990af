//! Markdown to visual tree, via comrak's AST.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};

use super::types::{Alignment, VisualNode, VisualTree};

/// Fence language that turns a code block into a diagram slot.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Render markdown source into a [`VisualTree`].
///
/// Pure: the same input always yields a structurally identical tree.
///
/// ```
/// use splitmark::document::{VisualNode, render};
///
/// let tree = render("# Hi\n\nSome *text*");
/// assert_eq!(
///     tree.nodes[0],
///     VisualNode::Heading { level: 1, children: vec![VisualNode::Text("Hi".into())] }
/// );
/// ```
pub fn render(source: &str) -> VisualTree {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut visitor = Visitor::default();
    VisualTree {
        nodes: visitor.blocks(root),
    }
}

fn create_options() -> Options<'static> {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

#[derive(Default)]
struct Visitor {
    diagram_count: usize,
}

impl Visitor {
    fn blocks<'a>(&mut self, parent: &'a AstNode<'a>) -> Vec<VisualNode> {
        parent
            .children()
            .flat_map(|child| self.block(child))
            .collect()
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<VisualNode> {
        let value = node.data.borrow().value.clone();
        let visual = match value {
            NodeValue::Heading(heading) => VisualNode::Heading {
                level: heading.level,
                children: inlines(node),
            },
            NodeValue::Paragraph => VisualNode::Paragraph(inlines(node)),
            NodeValue::List(list) => VisualNode::List {
                ordered: list.list_type == ListType::Ordered,
                start: list.start,
                items: self.blocks(node),
            },
            NodeValue::Item(_) => VisualNode::ListItem {
                task: None,
                children: self.blocks(node),
            },
            NodeValue::TaskItem(symbol) => VisualNode::ListItem {
                task: Some(symbol.is_some()),
                children: self.blocks(node),
            },
            NodeValue::BlockQuote => VisualNode::BlockQuote(self.blocks(node)),
            NodeValue::CodeBlock(code_block) => {
                let language = code_block
                    .info
                    .split_whitespace()
                    .next()
                    .map(ToString::to_string);
                if language.as_deref() == Some(DIAGRAM_LANGUAGE) {
                    let index = self.diagram_count;
                    self.diagram_count += 1;
                    VisualNode::Diagram {
                        index,
                        source: code_block.literal,
                    }
                } else {
                    VisualNode::CodeBlock {
                        language,
                        code: code_block.literal,
                    }
                }
            }
            NodeValue::HtmlBlock(html) => VisualNode::HtmlBlock(html.literal),
            NodeValue::ThematicBreak => VisualNode::HorizontalRule,
            NodeValue::Table(table) => {
                let columns = table.alignments.len();
                let rows = node
                    .children()
                    .filter_map(|row| table_row(row, columns))
                    .collect();
                VisualNode::Table {
                    alignments: table.alignments.into_iter().map(Alignment::from).collect(),
                    rows,
                }
            }
            // Extensions that are not enabled never produce their nodes;
            // anything else is flattened into its children.
            _ => return self.blocks(node),
        };
        vec![visual]
    }
}

/// Build a table row padded or truncated to the header's column count.
fn table_row<'a>(node: &'a AstNode<'a>, columns: usize) -> Option<VisualNode> {
    let NodeValue::TableRow(header) = node.data.borrow().value else {
        return None;
    };
    let mut cells: Vec<VisualNode> = node
        .children()
        .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
        .map(|cell| VisualNode::TableCell(inlines(cell)))
        .collect();
    cells.resize_with(columns, || VisualNode::TableCell(Vec::new()));
    Some(VisualNode::TableRow { header, cells })
}

fn inlines<'a>(parent: &'a AstNode<'a>) -> Vec<VisualNode> {
    let mut out = Vec::new();
    for child in parent.children() {
        push_inline(&mut out, inline(child));
    }
    out
}

fn inline<'a>(node: &'a AstNode<'a>) -> Vec<VisualNode> {
    let value = node.data.borrow().value.clone();
    let visual = match value {
        NodeValue::Text(text) => VisualNode::Text(text),
        NodeValue::HtmlInline(html) => VisualNode::Text(html),
        NodeValue::Code(code) => VisualNode::InlineCode(code.literal),
        NodeValue::SoftBreak => VisualNode::SoftBreak,
        NodeValue::LineBreak => VisualNode::LineBreak,
        NodeValue::Emph => VisualNode::Emphasis(inlines(node)),
        NodeValue::Strong => VisualNode::Strong(inlines(node)),
        NodeValue::Strikethrough => VisualNode::Strikethrough(inlines(node)),
        NodeValue::Link(link) => VisualNode::Link {
            url: link.url,
            children: inlines(node),
        },
        NodeValue::Image(link) => VisualNode::Image {
            url: link.url,
            alt: inlines(node)
                .iter()
                .map(VisualNode::plain_text)
                .collect::<String>(),
        },
        _ => return inlines(node),
    };
    vec![visual]
}

/// Append inline nodes, merging runs of adjacent text.
fn push_inline(out: &mut Vec<VisualNode>, nodes: Vec<VisualNode>) {
    for node in nodes {
        if let (Some(VisualNode::Text(prev)), VisualNode::Text(next)) = (out.last_mut(), &node) {
            prev.push_str(next);
            continue;
        }
        out.push(node);
    }
}
