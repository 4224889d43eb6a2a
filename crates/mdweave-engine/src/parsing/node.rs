//! Node kinds and their block-level capabilities.

use serde::Serialize;

use super::rope::Span;

/// What a node in the document tree represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Document,
    BlankLine,
    Paragraph,
    Heading {
        level: u8,
        setext: bool,
    },
    ThematicBreak,
    BlockQuote,
    List {
        marker: ListMarker,
        tight: bool,
    },
    ListItem {
        marker: ListMarker,
    },
    FencedCode {
        fence: char,
        fence_len: usize,
        fence_indent: usize,
        /// Trimmed info string following the opening fence.
        info: Option<Span>,
    },
    IndentedCode,
    HtmlBlock {
        html_kind: u8,
    },
    ReferenceDefinition {
        label: String,
        destination: String,
        title: Option<String>,
    },
    /// A block contributed by an extension.
    CustomBlock(CustomBlockKind),

    Text,
    SoftBreak,
    HardBreak,
    CodeSpan {
        /// Content between the backtick runs.
        inner: Span,
    },
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Link {
        destination: String,
        title: Option<String>,
        /// Normalised label for reference-style links.
        reference: Option<String>,
    },
    WikiLink {
        target: Span,
        alias: Option<Span>,
    },
    /// An inline node contributed by an extension.
    CustomInline(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    Bullet(char),
    Ordered { start: u32, delimiter: char },
}

impl ListMarker {
    /// Items belong to the same list when their markers agree on the bullet
    /// character or the ordered delimiter.
    #[must_use]
    pub fn same_list(self, other: ListMarker) -> bool {
        match (self, other) {
            (ListMarker::Bullet(a), ListMarker::Bullet(b)) => a == b,
            (
                ListMarker::Ordered { delimiter: a, .. },
                ListMarker::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomBlockKind {
    pub name: &'static str,
    #[serde(skip)]
    pub capabilities: Capabilities,
}

/// Coarse grouping of block kinds, used to track blocks by type and to
/// route blocks to pre-processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Document,
    BlankLine,
    Paragraph,
    Heading,
    ThematicBreak,
    BlockQuote,
    List,
    ListItem,
    FencedCode,
    IndentedCode,
    HtmlBlock,
    ReferenceDefinition,
    Custom(&'static str),
    Inline,
}

/// Block-level behaviour of a node kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// May hold child blocks.
    pub container: bool,
    /// Paragraph-like: target of lazy continuation lines, and visible to
    /// factories that interrupt or replace paragraphs.
    pub paragraph: bool,
    /// Collects the remainder of each continuation line.
    pub accepts_lines: bool,
    /// Gets inline parsing after the block phase.
    pub inline_content: bool,
    /// Two consecutive blank lines close the outermost such block.
    pub breaks_out_on_double_blank: bool,
    /// A blank line inside marks the block as ending with a blank line.
    pub propagates_last_blank: bool,
    /// Blank-line nodes on lines it continues on become its children.
    pub blank_line_container: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        container: false,
        paragraph: false,
        accepts_lines: false,
        inline_content: false,
        breaks_out_on_double_blank: false,
        propagates_last_blank: false,
        blank_line_container: false,
    };

    pub const LEAF: Capabilities = Capabilities {
        propagates_last_blank: true,
        ..Capabilities::NONE
    };

    pub const CONTAINER: Capabilities = Capabilities {
        container: true,
        propagates_last_blank: true,
        blank_line_container: true,
        ..Capabilities::NONE
    };
}

impl NodeKind {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            NodeKind::Document => Category::Document,
            NodeKind::BlankLine => Category::BlankLine,
            NodeKind::Paragraph => Category::Paragraph,
            NodeKind::Heading { .. } => Category::Heading,
            NodeKind::ThematicBreak => Category::ThematicBreak,
            NodeKind::BlockQuote => Category::BlockQuote,
            NodeKind::List { .. } => Category::List,
            NodeKind::ListItem { .. } => Category::ListItem,
            NodeKind::FencedCode { .. } => Category::FencedCode,
            NodeKind::IndentedCode => Category::IndentedCode,
            NodeKind::HtmlBlock { .. } => Category::HtmlBlock,
            NodeKind::ReferenceDefinition { .. } => Category::ReferenceDefinition,
            NodeKind::CustomBlock(custom) => Category::Custom(custom.name),
            _ => Category::Inline,
        }
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        self.category() != Category::Inline
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        match self {
            NodeKind::Document => Capabilities {
                container: true,
                ..Capabilities::NONE
            },
            NodeKind::Paragraph => Capabilities {
                paragraph: true,
                accepts_lines: true,
                inline_content: true,
                ..Capabilities::LEAF
            },
            NodeKind::Heading { .. } => Capabilities {
                inline_content: true,
                ..Capabilities::LEAF
            },
            NodeKind::ThematicBreak => Capabilities::LEAF,
            NodeKind::BlockQuote => Capabilities {
                propagates_last_blank: false,
                ..Capabilities::CONTAINER
            },
            NodeKind::List { .. } => Capabilities {
                breaks_out_on_double_blank: true,
                ..Capabilities::CONTAINER
            },
            NodeKind::ListItem { .. } => Capabilities::CONTAINER,
            NodeKind::FencedCode { .. } => Capabilities {
                accepts_lines: true,
                ..Capabilities::NONE
            },
            NodeKind::IndentedCode | NodeKind::HtmlBlock { .. } => Capabilities {
                accepts_lines: true,
                ..Capabilities::LEAF
            },
            NodeKind::CustomBlock(custom) => custom.capabilities,
            _ => Capabilities::NONE,
        }
    }

    /// Whether a block of kind `self` may directly hold a block of kind `child`.
    #[must_use]
    pub fn can_contain(&self, child: &NodeKind) -> bool {
        match self {
            NodeKind::List { .. } => matches!(child, NodeKind::ListItem { .. }),
            _ if self.capabilities().container => {
                child.is_block() && !matches!(child, NodeKind::ListItem { .. })
            }
            _ => false,
        }
    }

    /// Short label used in outlines and log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::BlankLine => "BlankLine",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::List { .. } => "List",
            NodeKind::ListItem { .. } => "ListItem",
            NodeKind::FencedCode { .. } => "FencedCode",
            NodeKind::IndentedCode => "IndentedCode",
            NodeKind::HtmlBlock { .. } => "HtmlBlock",
            NodeKind::ReferenceDefinition { .. } => "ReferenceDefinition",
            NodeKind::CustomBlock(custom) => custom.name,
            NodeKind::Text => "Text",
            NodeKind::SoftBreak => "SoftBreak",
            NodeKind::HardBreak => "HardBreak",
            NodeKind::CodeSpan { .. } => "CodeSpan",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::Strong => "Strong",
            NodeKind::Strikethrough => "Strikethrough",
            NodeKind::Superscript => "Superscript",
            NodeKind::Link { .. } => "Link",
            NodeKind::WikiLink { .. } => "WikiLink",
            NodeKind::CustomInline(name) => name,
        }
    }
}
