use log::trace;

use crate::options::ParserOptions;
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::document::LinkReference;
use crate::parsing::inline::kinds::{LinkSyntax, normalize_label};
use crate::parsing::node::NodeKind;
use crate::parsing::tree::NodeId;

use super::{ParagraphPreProcessor, ParagraphPreProcessorFactory, PreProcessContext};

/// Collects `[label]: destination "title"` definitions from the start of
/// paragraphs into the document's reference map.
pub struct ReferencePreProcessorFactory;

impl ReferencePreProcessorFactory {
    pub const ID: FactoryId = FactoryId("core.reference_definitions");
}

impl Dependent for ReferencePreProcessorFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }
}

impl ParagraphPreProcessorFactory for ReferencePreProcessorFactory {
    fn create(&self, _options: &ParserOptions) -> Box<dyn ParagraphPreProcessor> {
        Box::new(ReferencePreProcessor)
    }
}

struct ReferencePreProcessor;

impl ParagraphPreProcessor for ReferencePreProcessor {
    fn pre_process(&mut self, paragraph: NodeId, cx: &mut PreProcessContext<'_>) -> usize {
        let content = cx.content(paragraph);
        let text = content.text();
        let mut consumed = 0;
        while let Some(def) = Definition::scan(&text[consumed..]) {
            let span = content.span_to_source(consumed, consumed + def.end);
            let label = normalize_label(def.label);
            trace!("reference definition [{label}] at {}..{}", span.start, span.end);
            let node = cx.insert_block_before(
                paragraph,
                NodeKind::ReferenceDefinition {
                    label: label.clone(),
                    destination: def.destination.clone(),
                    title: def.title.clone(),
                },
                span,
            );
            cx.references_mut().insert(
                label,
                LinkReference {
                    destination: def.destination,
                    title: def.title,
                    node,
                },
            );
            consumed += def.len;
        }
        consumed
    }
}

/// One definition scanned from the start of a paragraph.
#[derive(Debug, PartialEq, Eq)]
struct Definition<'s> {
    label: &'s str,
    destination: String,
    title: Option<String>,
    /// End of the definition, before its line terminator.
    end: usize,
    /// Bytes consumed, line terminator included.
    len: usize,
}

impl<'s> Definition<'s> {
    fn scan(s: &'s str) -> Option<Self> {
        let mut i = skip_spaces(s, 0);
        let (label, len) = LinkSyntax::label(&s[i..])?;
        i += len;
        if !s[i..].starts_with(':') {
            return None;
        }
        i = skip_spaces(s, i + 1);
        if s[i..].starts_with('\n') {
            i = skip_spaces(s, i + 1);
        }
        let (destination, len) = LinkSyntax::destination(&s[i..])?;
        i += len;

        let after_destination = i;
        let title_start = s[i..]
            .find(|c: char| !c.is_whitespace())
            .map_or(s.len(), |n| i + n);
        if title_start > after_destination {
            if let Some((title, len)) = LinkSyntax::title(&s[title_start..]) {
                let end = title_start + len;
                if let Some(len) = line_end(s, end) {
                    return Some(Self {
                        label,
                        destination,
                        title: Some(title),
                        end,
                        len,
                    });
                }
            }
        }

        // no usable title: the destination must end its line
        let len = line_end(s, after_destination)?;
        Some(Self {
            label,
            destination,
            title: None,
            end: after_destination,
            len,
        })
    }
}

fn skip_spaces(s: &str, from: usize) -> usize {
    from + s[from..].bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

/// If only spaces follow `from` on its line, returns the offset just past
/// the line terminator (or the end of `s`).
fn line_end(s: &str, from: usize) -> Option<usize> {
    let i = skip_spaces(s, from);
    match s.as_bytes().get(i) {
        None => Some(i),
        Some(b'\n') => Some(i + 1),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parsing::node::Category;
    use crate::parsing::parse_document;

    #[rstest]
    #[case("[foo]: /url", "foo", "/url", None, 11)]
    #[case("[foo]: /url \"the title\"\nrest", "foo", "/url", Some("the title"), 24)]
    #[case("[Foo Bar]:\n  <my url>  \n", "Foo Bar", "my url", None, 24)]
    #[case("[a]: /b\n'c'", "a", "/b", Some("c"), 11)]
    fn scans_definitions(
        #[case] input: &str,
        #[case] label: &str,
        #[case] destination: &str,
        #[case] title: Option<&str>,
        #[case] len: usize,
    ) {
        let def = Definition::scan(input).unwrap();
        assert_eq!(def.label, label);
        assert_eq!(def.destination, destination);
        assert_eq!(def.title.as_deref(), title);
        assert_eq!(def.len, len);
    }

    #[rstest]
    #[case("[foo] /url")]
    #[case("[foo]:")]
    #[case("[foo]: /url trailing")]
    #[case("plain text")]
    fn rejects_non_definitions(#[case] input: &str) {
        assert_eq!(Definition::scan(input), None);
    }

    #[test]
    fn title_on_bad_line_falls_back_to_destination_only() {
        let def = Definition::scan("[a]: /b\n\"t\" more").unwrap();
        assert_eq!(def.title, None);
        assert_eq!(def.len, 8);
    }

    #[test]
    fn definition_only_paragraph_is_removed() {
        let doc = parse_document("[foo]: /url\n\nbody\n");
        let children: Vec<_> = doc
            .tree()
            .children(doc.root())
            .iter()
            .map(|&c| doc.tree().kind(c).name())
            .collect();
        assert_eq!(children, vec!["ReferenceDefinition", "Paragraph"]);
        assert_eq!(doc.references().len(), 1);
        let def = doc.references().get("FOO").unwrap();
        assert_eq!(def.destination, "/url");
        assert_eq!(doc.text(def.node), "[foo]: /url");
    }

    #[test]
    fn removed_paragraph_leaves_the_tracker() {
        let parser = crate::parsing::Parser::default();
        let (phase, _) = parser.parse_blocks("[foo]: /url\n");
        assert!(!phase.tracker.has_category(Category::Paragraph));
        assert!(phase.tracker.has_category(Category::ReferenceDefinition));
    }

    #[test]
    fn first_definition_wins() {
        let doc = parse_document("[a]: /one\n[A]: /two\n");
        assert_eq!(doc.references().get("a").unwrap().destination, "/one");
        assert_eq!(doc.tree().children(doc.root()).len(), 2);
    }

    #[test]
    fn definitions_then_text_keep_the_rest() {
        let doc = parse_document("[a]: /one\nhello\n");
        let kids = doc.tree().children(doc.root()).to_vec();
        assert_eq!(doc.tree().kind(kids[1]), &NodeKind::Paragraph);
        assert_eq!(doc.text(kids[1]), "hello");
    }
}
