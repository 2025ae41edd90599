use roxmltree::NodeId;

/// Read-only view of a parsed markup tree.
///
/// Nodes are opaque handles; every query only ever yields element nodes.
/// Lookups on a handle the document does not know return empty results.
pub trait MarkupDocument {
    type Node: Copy + Eq;

    fn root_element(&self) -> Self::Node;

    /// Elements with the given local tag name, in document order.
    fn elements_by_tag(&self, tag: &str) -> Vec<Self::Node>;

    /// Descendants of `node` (excluding `node`) carrying the class token.
    fn descendants_with_class(&self, node: Self::Node, class: &str) -> Vec<Self::Node>;

    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn tag_name(&self, node: Self::Node) -> &str;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Concatenated text of all descendant text nodes.
    fn text(&self, node: Self::Node) -> String;

    fn has_class(&self, node: Self::Node, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
    }
}

pub struct SvgDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> SvgDocument<'input> {
    pub fn parse(text: &'input str) -> Result<Self, roxmltree::Error> {
        Ok(Self {
            doc: roxmltree::Document::parse_with_options(
                text,
                roxmltree::ParsingOptions {
                    allow_dtd: true,
                    ..roxmltree::ParsingOptions::default()
                },
            )?,
        })
    }

    fn node(&self, id: NodeId) -> Option<roxmltree::Node<'_, 'input>> {
        self.doc.get_node(id)
    }
}

impl MarkupDocument for SvgDocument<'_> {
    type Node = NodeId;

    fn root_element(&self) -> NodeId {
        self.doc.root_element().id()
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == tag)
            .map(|n| n.id())
            .collect()
    }

    fn descendants_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let Some(node) = self.node(node) else {
            return Vec::new();
        };
        node.descendants()
            .skip(1)
            .filter(|n| n.is_element() && self.has_class(n.id(), class))
            .map(|n| n.id())
            .collect()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| {
                n.children()
                    .filter(|c| c.is_element())
                    .map(|c| c.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent_element().map(|p| p.id())
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.node(node).map(|n| n.tag_name().name()).unwrap_or("")
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attribute(name)
    }

    fn text(&self, node: NodeId) -> String {
        self.node(node)
            .map(|n| {
                n.descendants()
                    .filter(|d| d.is_text())
                    .filter_map(|d| d.text())
                    .collect()
            })
            .unwrap_or_default()
    }
}
