/// Core domain types: kinds, spans, raw matches, and extracted references.
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Structural kind of a code element a piece of text may refer to.
/// Serialized with the human-readable labels used in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    /// Java annotation type such as `@Entity`.
    #[serde(rename = "annotation")]
    Annotation,
    /// Class or interface.
    #[serde(rename = "class")]
    Class,
    /// `.conf` or `.cfg` file.
    #[serde(rename = "conf file")]
    ConfFile,
    /// Enum type.
    #[serde(rename = "enumeration")]
    Enumeration,
    /// Constant declared by an enum type.
    #[serde(rename = "enumeration value")]
    EnumerationValue,
    /// Field or named constant.
    #[serde(rename = "field")]
    Field,
    /// Hibernate mapping file (`.hbm.xml`).
    #[serde(rename = "hbm file")]
    HbmFile,
    /// Reserved for noise (addresses, URLs) a strategy wants to claim without
    /// producing a reference.
    #[serde(rename = "ignore")]
    Ignore,
    /// `.ini` file.
    #[serde(rename = "ini file")]
    IniFile,
    /// `.jar` archive.
    #[serde(rename = "jar file")]
    JarFile,
    /// `.java` source file.
    #[serde(rename = "java file")]
    JavaFile,
    /// `.log` file.
    #[serde(rename = "log file")]
    LogFile,
    /// Method or function.
    #[serde(rename = "method")]
    Method,
    /// Parameter listed in a method call or signature.
    #[serde(rename = "method parameter")]
    MethodParameter,
    /// Dotted package name.
    #[serde(rename = "package")]
    Package,
    /// `.properties` file.
    #[serde(rename = "properties file")]
    PropertiesFile,
    /// Key of a properties entry.
    #[serde(rename = "property name")]
    PropertyName,
    /// Value of a properties entry.
    #[serde(rename = "property value")]
    PropertyValue,
    /// `.py` source file.
    #[serde(rename = "python file")]
    PythonFile,
    /// No structural kind could be determined.
    #[serde(rename = "unknown")]
    Unknown,
    /// Attribute name inside an XML tag.
    #[serde(rename = "xml attribute")]
    XmlAttribute,
    /// Quoted attribute value inside an XML tag.
    #[serde(rename = "xml attribute value")]
    XmlAttributeValue,
    /// XML tag.
    #[serde(rename = "xml element")]
    XmlElement,
    /// `.xml` file.
    #[serde(rename = "xml file")]
    XmlFile,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::Annotation,
        Self::Class,
        Self::ConfFile,
        Self::Enumeration,
        Self::EnumerationValue,
        Self::Field,
        Self::HbmFile,
        Self::Ignore,
        Self::IniFile,
        Self::JarFile,
        Self::JavaFile,
        Self::LogFile,
        Self::Method,
        Self::MethodParameter,
        Self::Package,
        Self::PropertiesFile,
        Self::PropertyName,
        Self::PropertyValue,
        Self::PythonFile,
        Self::Unknown,
        Self::XmlAttribute,
        Self::XmlAttributeValue,
        Self::XmlElement,
        Self::XmlFile,
    ];

    /// The label used in configuration and serialized output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Annotation => "annotation",
            Self::Class => "class",
            Self::ConfFile => "conf file",
            Self::Enumeration => "enumeration",
            Self::EnumerationValue => "enumeration value",
            Self::Field => "field",
            Self::HbmFile => "hbm file",
            Self::Ignore => "ignore",
            Self::IniFile => "ini file",
            Self::JarFile => "jar file",
            Self::JavaFile => "java file",
            Self::LogFile => "log file",
            Self::Method => "method",
            Self::MethodParameter => "method parameter",
            Self::Package => "package",
            Self::PropertiesFile => "properties file",
            Self::PropertyName => "property name",
            Self::PropertyValue => "property value",
            Self::PythonFile => "python file",
            Self::Unknown => "unknown",
            Self::XmlAttribute => "xml attribute",
            Self::XmlAttributeValue => "xml attribute value",
            Self::XmlElement => "xml element",
            Self::XmlFile => "xml file",
        }
    }

    /// Types can own members (classes, annotations, enumerations).
    pub const fn is_type(self) -> bool {
        matches!(self, Self::Class | Self::Annotation | Self::Enumeration)
    }

    /// Whole files referenced by name.
    pub const fn is_file(self) -> bool {
        matches!(
            self,
            Self::ConfFile
                | Self::HbmFile
                | Self::IniFile
                | Self::JarFile
                | Self::JavaFile
                | Self::LogFile
                | Self::PropertiesFile
                | Self::PythonFile
                | Self::XmlFile
        )
    }

    /// Attribute-like members that only make sense under an owner.
    pub const fn is_attribute(self) -> bool {
        matches!(self, Self::MethodParameter | Self::XmlAttribute)
    }

    /// Literal values rather than named elements.
    pub const fn is_value(self) -> bool {
        matches!(self, Self::XmlAttributeValue | Self::PropertyValue)
    }

    /// Coarse grouping shown by `doclink info`: type, file, attribute, value, or member.
    /// `ignore` and `unknown` have no role.
    pub const fn role(self) -> Option<&'static str> {
        if self.is_type() {
            return Some("type");
        }
        if self.is_file() {
            return Some("file");
        }
        if self.is_attribute() {
            return Some("attribute");
        }
        if self.is_value() {
            return Some("value");
        }
        match self {
            Self::Ignore | Self::Unknown => None,
            _ => Some("member"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.label() == s)
            .ok_or_else(|| Error::UnknownKind { label: s.to_string() })
    }
}

/// Half-open byte range into the scanned text, tagged with the kind it
/// suggests and the priority of the strategy that found it.
/// Lower priority numbers win conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// First byte of the span.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
    /// Kind the strategy suggests for the covered text.
    pub kind: Kind,
    /// Priority of the strategy that produced the span.
    pub priority: u8,
}

impl Span {
    /// A span over `start..end`.
    pub const fn new(start: usize, end: usize, kind: Kind, priority: u8) -> Self {
        Self { start, end, kind, priority }
    }

    /// The span as a byte range.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Two spans overlap when they share at least one byte position.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Candidate produced by a strategy: the main span plus the structural
/// pieces found inside it, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawMatch {
    /// Span of the whole match.
    pub parent: Span,
    /// Spans nested inside `parent`.
    pub children: Vec<Span>,
}

impl RawMatch {
    /// A match with no children.
    pub const fn single(parent: Span) -> Self {
        Self { parent, children: Vec::new() }
    }

    /// A match with the given children.
    pub const fn with_children(parent: Span, children: Vec<Span>) -> Self {
        Self { parent, children }
    }
}

/// One extracted reference. `content` is always `text[span]` of the text
/// it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Exact text covered by `span`.
    pub content: String,
    /// Structural kind resolved for the content.
    pub kind_hint: Kind,
    /// Byte range of the content in the source text.
    pub span: Range<usize>,
    /// Position, in the same pass's output, of the reference that
    /// structurally contains this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<usize>,
    /// Position among the children of one match. Unset for top-level references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_index: Option<usize>,
    /// Sequence number of the top-level match this reference came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Enclosing sentence, when context lookup is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    /// Enclosing paragraph, when context lookup is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
}

impl Reference {
    /// A bare reference with no linkage or provenance.
    pub fn new(content: &str, kind_hint: Kind, span: Range<usize>) -> Self {
        Self {
            content: content.to_string(),
            kind_hint,
            span,
            parent_reference: None,
            child_index: None,
            index: None,
            sentence: None,
            paragraph: None,
        }
    }
}
