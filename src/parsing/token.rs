/// A single `key="value"` pair, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Tag {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push(Attribute {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }
}

/// Markup events produced by [`crate::parsing::tokenize::tokenize`].
///
/// `End` is emitted once, on EOF or when the byte stream can no longer be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(Tag),
    EndTag(Tag),
    Text(String),
    End,
}
