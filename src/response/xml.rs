//! Parsed XML response bodies.

use std::fmt;
use sxd_document::dom::ChildOfRoot;
use sxd_document::{parser, Package};

/// An XML document decoded from a response body.
///
/// Holds the parsed tree together with the text it was parsed from, so the
/// document can be compared and stored without re-serializing it.
pub struct XmlDocument {
    package: Package,
    source: String,
}

impl XmlDocument {
    /// Parses XML text into a document tree.
    ///
    /// Returns `None` when the text is not well-formed XML.
    pub fn parse(text: &str) -> Option<Self> {
        let package = parser::parse(text).ok()?;
        Some(Self {
            package,
            source: text.to_string(),
        })
    }

    /// Local name of the document element.
    pub fn root_name(&self) -> Option<String> {
        let document = self.package.as_document();
        document.root().children().into_iter().find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element.name().local_part().to_string()),
            _ => None,
        })
    }

    /// The XML text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("root", &self.root_name())
            .field("len", &self.source.len())
            .finish()
    }
}

impl PartialEq for XmlDocument {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
