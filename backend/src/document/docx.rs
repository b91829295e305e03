//! Minimal `.docx` codec
//!
//! Reads paragraph text out of `word/document.xml` and writes a bare but valid
//! WordprocessingML package with one `w:p` per string. Formatting, tables,
//! headers and images are not preserved.

use super::DocumentError;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";

/// WordprocessingML main namespace (transitional and strict)
const WORD_NAMESPACES: [&[u8]; 2] = [
    b"http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    b"http://purl.oclc.org/ooxml/wordprocessingml/main",
];

const MARKUP_COMPATIBILITY_NAMESPACE: &[u8] =
    b"http://schemas.openxmlformats.org/markup-compatibility/2006";

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#,
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

const DOCUMENT_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:body>"#,
);

const DOCUMENT_FOOTER: &str = r#"</w:body></w:document>"#;

/// Read the text of every paragraph, in document order
///
/// Blank paragraphs are kept; callers decide whether to filter them.
/// Tabs and line breaks inside a run come back as `\t` and `\n`.
pub fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCUMENT_PART) {
        Ok(mut part) => {
            part.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocumentError::MissingPart(DOCUMENT_PART.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    parse_document_xml(&xml)
}

/// Extract paragraph text from a `word/document.xml` body
///
/// Elements are matched by namespace, not prefix. Only the `mc:Choice` branch
/// of markup-compatibility blocks is read; `mc:Fallback` repeats the same
/// content (text boxes as VML) and is skipped.
pub(crate) fn parse_document_xml(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = NsReader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        let (ns, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) => {
                let tag = classify(ns, e.local_name().as_ref());
                if tag == Tag::Fallback {
                    fallback_depth += 1;
                    continue;
                }
                if fallback_depth > 0 {
                    continue;
                }
                match tag {
                    Tag::Paragraph => open.push(String::new()),
                    Tag::Run => run_depth += 1,
                    Tag::Text => in_text = run_depth > 0,
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if fallback_depth > 0 {
                    continue;
                }
                match classify(ns, e.local_name().as_ref()) {
                    Tag::Paragraph => paragraphs.push(String::new()),
                    Tag::Tab if run_depth > 0 => push_text(&mut open, "\t"),
                    Tag::Break if run_depth > 0 => push_text(&mut open, "\n"),
                    _ => {}
                }
            }
            Event::End(e) => {
                let tag = classify(ns, e.local_name().as_ref());
                if tag == Tag::Fallback {
                    fallback_depth = fallback_depth.saturating_sub(1);
                    continue;
                }
                if fallback_depth > 0 {
                    continue;
                }
                match tag {
                    Tag::Paragraph => {
                        if let Some(text) = open.pop() {
                            paragraphs.push(text);
                        }
                    }
                    Tag::Run => run_depth = run_depth.saturating_sub(1),
                    Tag::Text => in_text = false,
                    _ => {}
                }
            }
            Event::Text(t) if in_text && fallback_depth == 0 => {
                let text = t.unescape()?;
                push_text(&mut open, &text);
            }
            Event::CData(c) if in_text && fallback_depth == 0 => {
                let raw = c.into_inner();
                push_text(&mut open, &String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Elements the paragraph reader cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Paragraph,
    Run,
    Text,
    Tab,
    Break,
    Fallback,
    Other,
}

fn classify(ns: ResolveResult<'_>, local: &[u8]) -> Tag {
    match ns {
        ResolveResult::Bound(Namespace(uri)) if WORD_NAMESPACES.iter().any(|w| *w == uri) => {
            match local {
                b"p" => Tag::Paragraph,
                b"r" => Tag::Run,
                b"t" => Tag::Text,
                b"tab" => Tag::Tab,
                b"br" | b"cr" => Tag::Break,
                _ => Tag::Other,
            }
        }
        ResolveResult::Bound(Namespace(uri)) if uri == MARKUP_COMPATIBILITY_NAMESPACE => {
            if local == b"Fallback" {
                Tag::Fallback
            } else {
                Tag::Other
            }
        }
        _ => Tag::Other,
    }
}

fn push_text(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}

/// Serialize paragraphs into a new `.docx` package
pub fn write_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Result<Vec<u8>, DocumentError> {
    let mut document_xml = String::from(DOCUMENT_HEADER);
    for paragraph in paragraphs {
        write_paragraph(&mut document_xml, paragraph.as_ref());
    }
    document_xml.push_str(DOCUMENT_FOOTER);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;
    zip.start_file(DOCUMENT_PART, options)?;
    zip.write_all(document_xml.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

fn write_paragraph(out: &mut String, text: &str) {
    if text.is_empty() {
        out.push_str("<w:p/>");
        return;
    }

    out.push_str("<w:p><w:r>");
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_segment(out, &mut segment);
                out.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
            }
            _ => segment.push(ch),
        }
    }
    flush_segment(out, &mut segment);
    out.push_str("</w:r></w:p>");
}

fn flush_segment(out: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    out.push_str(r#"<w:t xml:space="preserve">"#);
    out.push_str(&escape(segment.as_str()));
    out.push_str("</w:t>");
    segment.clear();
}
