use std::fmt;

/// Namespace-qualified name.
///
/// Equality compares the namespace URI and local name only; the prefix is a
/// serialization hint.
#[derive(Debug, Clone, Eq)]
pub struct QName {
    pub namespace: Option<String>,
    pub local_name: String,
    pub prefix: Option<String>,
}

impl QName {
    /// Name with no namespace.
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
            prefix: None,
        }
    }

    /// Name in `namespace`, serialized with the given prefix.
    pub fn prefixed(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Name in `namespace`, serialized as the default namespace.
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
            prefix: None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn matches(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// Lexical `prefix:local` form used on the wire.
    pub fn lexical(&self) -> String {
        match &self.prefix {
            Some(p) if !p.is_empty() => format!("{}:{}", p, self.local_name),
            _ => self.local_name.clone(),
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Immutable (name, value) pair used while streaming markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// Factory for a plain attribute.
pub fn attribute(name: QName, value: impl Into<String>) -> Attribute {
    Attribute {
        name,
        value: value.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push(attribute(QName::local(name), value));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Comment(text.into()));
        self
    }

    /// Value of the un-namespaced attribute `local_name`.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated descendant text, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
            Node::Comment(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            children: vec![Node::Element(root)],
        }
    }

    /// The single top-level element, if any.
    pub fn document_element(&self) -> Option<&Element> {
        self.children.iter().find_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn into_document_element(self) -> Option<Element> {
        self.children.into_iter().find_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }
}
