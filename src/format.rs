/*!
 * Per-file delimiter markup
 *
 * The header and footer text is consumed by the `opt` stream transformer,
 * which finds file boundaries with the regexes below. Both sides must stay
 * byte-for-byte in sync.
 */

use std::io::{self, Write};

/// Regex matching a Markdown file header line; group 1 is the path
pub const MARKDOWN_HEADER_PATTERN: &str = r"### File: (.*?) ###[ \t]*\r?\n";

/// Regex matching an XML file header line; group 1 is the path
pub const XML_HEADER_PATTERN: &str = r#"<file path="(.*?)">[ \t]*\r?\n"#;

/// Footer written after every Markdown file body
pub const MARKDOWN_FOOTER: &str = "\n\n---\n\n";

/// Footer written after every XML file body
pub const XML_FOOTER: &str = "\n</file>\n";

/// Delimiter style, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `### File: <path> ###`
    #[default]
    Markdown,
    /// `<file path="<path>">` ... `</file>`
    Xml,
}

impl OutputFormat {
    pub fn from_xml_flag(use_xml: bool) -> Self {
        if use_xml {
            Self::Xml
        } else {
            Self::Markdown
        }
    }

    /// Header line for `path`, including its trailing newline
    pub fn header(&self, path: &str) -> String {
        match self {
            Self::Markdown => format!("### File: {} ###\n", path),
            Self::Xml => format!("<file path=\"{}\">\n", path),
        }
    }

    pub fn footer(&self) -> &'static str {
        match self {
            Self::Markdown => MARKDOWN_FOOTER,
            Self::Xml => XML_FOOTER,
        }
    }

    pub fn header_pattern(&self) -> &'static str {
        match self {
            Self::Markdown => MARKDOWN_HEADER_PATTERN,
            Self::Xml => XML_HEADER_PATTERN,
        }
    }

    pub fn write_header<W: Write + ?Sized>(&self, writer: &mut W, path: &str) -> io::Result<()> {
        writer.write_all(self.header(path).as_bytes())
    }

    pub fn write_footer<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.footer().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn wrap(format: OutputFormat, path: &str, body: &str) -> String {
        let mut out = Vec::new();
        format.write_header(&mut out, path).unwrap();
        out.extend_from_slice(body.as_bytes());
        format.write_footer(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_markdown_markers() {
        assert_eq!(
            wrap(OutputFormat::Markdown, "src/main.go", "package main"),
            "### File: src/main.go ###\npackage main\n\n---\n\n"
        );
    }

    #[test]
    fn test_xml_markers() {
        assert_eq!(
            wrap(OutputFormat::Xml, "src/main.go", "package main"),
            "<file path=\"src/main.go\">\npackage main\n</file>\n"
        );
    }

    #[test]
    fn test_headers_carry_the_path_verbatim() {
        assert_eq!(
            OutputFormat::Xml.header("pkg/don't&do.go"),
            "<file path=\"pkg/don't&do.go\">\n"
        );
        assert_eq!(
            OutputFormat::Markdown.header("pkg/don't&do.go"),
            "### File: pkg/don't&do.go ###\n"
        );
    }

    #[test]
    fn test_header_patterns_recognize_headers() {
        for format in [OutputFormat::Markdown, OutputFormat::Xml] {
            let re = Regex::new(format.header_pattern()).unwrap();
            let header = format.header("pkg/util.go");
            let caps = re.captures(&header).unwrap();
            assert_eq!(&caps[1], "pkg/util.go");
            assert_eq!(caps.get(0).unwrap().as_str(), header);
        }
    }

    #[test]
    fn test_from_xml_flag() {
        assert_eq!(OutputFormat::from_xml_flag(true), OutputFormat::Xml);
        assert_eq!(OutputFormat::from_xml_flag(false), OutputFormat::Markdown);
    }
}
