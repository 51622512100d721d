/*!
 * Stream transformations applied by `opt` to a concatenated snapshot
 *
 * The input is split back into per-file segments using the same header
 * markup the formatter writes, so license stripping only ever looks at the
 * top of each file.
 */

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::{MARKDOWN_HEADER_PATTERN, XML_HEADER_PATTERN};

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\r?\n){3,}").unwrap());

static MARKDOWN_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(MARKDOWN_HEADER_PATTERN).unwrap());

static XML_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(XML_HEADER_PATTERN).unwrap());

/// Leading `/* ... */` block and the whitespace after it
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/\*(?s:.*?)\*/\s*").unwrap());

/// Leading run of `//` lines
static LINE_COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?://[^\n]*(?:\n|\z))+").unwrap());

/// Leading run of `#` lines, shebangs excluded
static HASH_COMMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#(?:[^!\n][^\n]*)?(?:\n|\z))+").unwrap());

/// Words that mark a comment block as a license header
const LICENSE_MARKERS: [&str; 2] = ["Copyright", "License"];

/// Which transformations to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Collapse three or more consecutive newlines into two
    pub compact: bool,
    /// Remove license/copyright comment headers from every file segment
    pub strip_headers: bool,
}

/// One file of a concatenated stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSegment<'a> {
    /// Path captured from the header
    pub path: &'a str,
    /// Header line, kept verbatim
    pub header: &'a str,
    /// Everything up to the next header (footer included)
    pub body: &'a str,
}

/// A stream split at its file headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    /// Text before the first header (snapshot preamble, tree)
    pub preamble: &'a str,
    pub files: Vec<FileSegment<'a>>,
}

/// Applies [`TransformOptions`] to text streams
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    /// Run the configured transformations. Line endings are always
    /// normalised to `\n`.
    pub fn process(&self, content: &str) -> String {
        let mut content = content.replace("\r\n", "\n");

        if self.options.strip_headers {
            content = strip_license_headers(&content);
        }

        if self.options.compact {
            content = compact_whitespace(&content);
        }

        content
    }
}

/// Collapse runs of three or more newlines into a single blank line
pub fn compact_whitespace(content: &str) -> String {
    MULTI_NEWLINE.replace_all(content, "\n\n").into_owned()
}

/// Split a stream at its file headers. Markdown headers are tried first,
/// then XML. Returns `None` when neither header style occurs.
pub fn split_segments(content: &str) -> Option<Segments<'_>> {
    let re = [&*MARKDOWN_HEADER, &*XML_HEADER]
        .into_iter()
        .find(|re| re.is_match(content))?;

    let headers: Vec<_> = re.captures_iter(content).collect();
    let first = headers.first()?.get(0)?.start();

    let mut files = Vec::with_capacity(headers.len());
    for (i, caps) in headers.iter().enumerate() {
        let whole = caps.get(0)?;
        let end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());

        files.push(FileSegment {
            path: caps.get(1).map_or("", |m| m.as_str()),
            header: whole.as_str(),
            body: &content[whole.end()..end],
        });
    }

    Some(Segments {
        preamble: &content[..first],
        files,
    })
}

/// Strip license headers from every file segment, or from the whole input
/// when it carries no file headers
pub fn strip_license_headers(content: &str) -> String {
    let segments = match split_segments(content) {
        Some(segments) => segments,
        None => return strip_license(content).into_owned(),
    };

    let mut out = String::with_capacity(content.len());
    out.push_str(segments.preamble);
    for file in &segments.files {
        out.push_str(file.header);
        out.push_str(&strip_license(file.body));
    }
    out
}

/// Remove a leading license comment from a single file body. Comments that
/// do not mention a license marker are left alone.
pub fn strip_license(body: &str) -> Cow<'_, str> {
    let mut rest = body;
    let mut stripped = false;

    for re in [&*BLOCK_COMMENT, &*LINE_COMMENTS, &*HASH_COMMENTS] {
        let candidate = rest.trim_start();
        if let Some(m) = re.find(candidate) {
            if LICENSE_MARKERS.iter().any(|w| m.as_str().contains(w)) {
                rest = &candidate[m.end()..];
                stripped = true;
            }
        }
    }

    if stripped {
        Cow::Owned(rest.trim_start().to_string())
    } else {
        Cow::Borrowed(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_whitespace() {
        assert_eq!(
            compact_whitespace("func foo() {\n\n\n\n\treturn\n}"),
            "func foo() {\n\n\treturn\n}"
        );
        assert_eq!(compact_whitespace("a\n\nb"), "a\n\nb");
        assert_eq!(compact_whitespace("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_strip_license() {
        let cases = [
            (
                "C-style block header",
                "/*\n * Copyright (c) 2023\n * License: MIT\n */\npackage main",
                "package main",
            ),
            (
                "Go-style line header",
                "// Copyright 2023\n// License: MIT\n\npackage main",
                "package main",
            ),
            (
                "Hash-style header",
                "# Copyright 2023\n# License: MIT\n\nimport os",
                "import os",
            ),
            (
                "No header",
                "package main\nfunc main() {}",
                "package main\nfunc main() {}",
            ),
            (
                "Doc comment without license",
                "// Package util does things.\npackage util",
                "// Package util does things.\npackage util",
            ),
            (
                "Shebang is kept",
                "#!/usr/bin/env python\n# Copyright 2023\nimport os",
                "#!/usr/bin/env python\n# Copyright 2023\nimport os",
            ),
        ];

        for (name, input, expected) in cases {
            assert_eq!(strip_license(input), expected, "{}", name);
        }
    }

    #[test]
    fn test_block_comment_does_not_swallow_code() {
        let input = "/* helpers */\nint x;\n/* Copyright 2023 */\n";
        assert_eq!(strip_license(input), input);
    }

    #[test]
    fn test_split_segments_markdown() {
        let stream = "---\nProject: demo\n---\n\n\
                      ### File: a.go ###\npackage a\n\n---\n\n\
                      ### File: b/b.go ###\npackage b\n\n---\n\n";

        let segments = split_segments(stream).unwrap();
        assert_eq!(segments.preamble, "---\nProject: demo\n---\n\n");
        assert_eq!(segments.files.len(), 2);
        assert_eq!(segments.files[0].path, "a.go");
        assert_eq!(segments.files[0].body, "package a\n\n---\n\n");
        assert_eq!(segments.files[1].path, "b/b.go");
        assert_eq!(segments.files[1].header, "### File: b/b.go ###\n");
    }

    #[test]
    fn test_split_segments_xml_and_plain() {
        let stream = "<file path=\"x.py\">\nimport os\n</file>\n";
        let segments = split_segments(stream).unwrap();
        assert_eq!(segments.preamble, "");
        assert_eq!(segments.files[0].path, "x.py");
        assert_eq!(segments.files[0].body, "import os\n</file>\n");

        assert!(split_segments("just some text\n").is_none());
    }

    #[test]
    fn test_strip_headers_per_segment() {
        let stream = "### File: a.go ###\n// Copyright 2023 ACME\n\npackage a\n\n---\n\n\
                      ### File: b.py ###\n# License: MIT\nimport os\n\n---\n\n";
        let transformer = Transformer::new(TransformOptions {
            compact: false,
            strip_headers: true,
        });

        assert_eq!(
            transformer.process(stream),
            "### File: a.go ###\npackage a\n\n---\n\n### File: b.py ###\nimport os\n\n---\n\n"
        );
    }

    #[test]
    fn test_process_normalises_crlf_and_compacts() {
        let transformer = Transformer::new(TransformOptions {
            compact: true,
            strip_headers: false,
        });

        assert_eq!(
            transformer.process("package main\r\n\r\n\r\n\r\nfunc main() {}\r\n"),
            "package main\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_default_options_leave_content_untouched() {
        let input = "a\n\n\n\nb // Copyright\n";
        assert_eq!(Transformer::default().process(input), input);
    }
}
