//! XML helpers shared by every part reader and writer.

mod escape;
pub mod tree;

pub use escape::{escape_text, escape_xml, resolve_entity, unescape_xml};
pub use tree::{XML_DECLARATION, XmlElement, XmlNode, local_name};
