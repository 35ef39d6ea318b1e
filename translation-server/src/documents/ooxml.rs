//! Paragraph-level translation of Office Open XML packages (DOCX and PPTX)

use crate::documents::DocumentError;
use crate::translation::{Language, Translator};
use log::debug;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::sync::LazyLock;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

// Opening, closing and empty paragraph tags. `w:pPr` and friends do not match.
static WORD_PARAGRAPH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?w:p(?:\s[^>]*)?/?>").expect("valid regex"));
static WORD_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("valid regex"));
static WORD_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^word/(document|header\d*|footer\d*|footnotes|endnotes)\.xml$")
        .expect("valid regex")
});

static DRAWING_PARAGRAPH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?a:p(?:\s[^>]*)?/?>").expect("valid regex"));
static DRAWING_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").expect("valid regex"));
static SLIDE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide\d+\.xml$").expect("valid regex"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid regex")
});

/// Markup vocabulary of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// DOCX: `w:p` paragraphs with `w:t` runs
    Wordprocessing,
    /// PPTX: `a:p` paragraphs with `a:t` runs
    Presentation,
}

impl Markup {
    fn paragraph_tag(&self) -> &'static Regex {
        match self {
            Markup::Wordprocessing => &*WORD_PARAGRAPH_TAG,
            Markup::Presentation => &*DRAWING_PARAGRAPH_TAG,
        }
    }

    fn text_run(&self) -> &'static Regex {
        match self {
            Markup::Wordprocessing => &*WORD_TEXT,
            Markup::Presentation => &*DRAWING_TEXT,
        }
    }

    /// Whether a package part holds translatable text
    pub fn is_text_part(&self, name: &str) -> bool {
        match self {
            Markup::Wordprocessing => WORD_PART.is_match(name),
            Markup::Presentation => SLIDE_PART.is_match(name),
        }
    }
}

/// Translate every non-blank paragraph of a package.
///
/// Parts without translatable text are copied without being recompressed.
/// A text part that inflates beyond `max_part_size` bytes is rejected.
pub async fn translate_package(
    package: &[u8],
    markup: Markup,
    translator: &dyn Translator,
    source: Language,
    target: Language,
    max_part_size: u64,
) -> Result<Vec<u8>, DocumentError> {
    let parts = read_text_parts(package, markup, max_part_size)?;

    let mut translations: HashMap<String, String> = HashMap::new();
    for (_, xml) in &parts {
        for text in paragraph_texts(xml, markup) {
            if !translations.contains_key(&text) {
                let translated = translator.translate(&text, source, target).await;
                translations.insert(text, translated);
            }
        }
    }
    debug!(
        "Translated {} distinct paragraphs across {} parts",
        translations.len(),
        parts.len()
    );

    let rewritten: HashMap<String, String> = parts
        .into_iter()
        .map(|(name, xml)| {
            let xml = rewrite_paragraphs(&xml, markup, &translations);
            (name, xml)
        })
        .collect();
    write_package(package, &rewritten)
}

fn read_text_parts(
    package: &[u8],
    markup: Markup,
    max_part_size: u64,
) -> Result<Vec<(String, String)>, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut parts = Vec::new();
    for index in 0..archive.len() {
        let file = archive.by_index(index)?;
        if !markup.is_text_part(file.name()) {
            continue;
        }
        let name = file.name().to_string();
        if file.size() > max_part_size {
            return Err(DocumentError::PartTooLarge(name));
        }
        // The declared size is not trusted, read one byte past the limit to catch liars
        let mut data = Vec::new();
        file.take(max_part_size.saturating_add(1))
            .read_to_end(&mut data)?;
        if data.len() as u64 > max_part_size {
            return Err(DocumentError::PartTooLarge(name));
        }
        let xml = String::from_utf8(data).map_err(|_| DocumentError::Encoding(name.clone()))?;
        parts.push((name, xml));
    }
    Ok(parts)
}

fn write_package(
    package: &[u8],
    rewritten: &HashMap<String, String>,
) -> Result<Vec<u8>, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(package.len())));
    for index in 0..archive.len() {
        let file = archive.by_index_raw(index)?;
        match rewritten.get(file.name()) {
            Some(xml) => {
                let compression = match file.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                let name = file.name().to_string();
                drop(file);
                writer.start_file(
                    name,
                    SimpleFileOptions::default().compression_method(compression),
                )?;
                writer.write_all(xml.as_bytes())?;
            }
            None => writer.raw_copy_file(file)?,
        }
    }
    Ok(writer.finish()?.into_inner())
}

/// A text run's content, owned by its innermost enclosing paragraph
struct TextRun {
    paragraph: usize,
    content: Range<usize>,
}

/// Text runs of a part together with the joined text of each paragraph.
///
/// Paragraphs are numbered in the order they open. A paragraph nested in a
/// text box belongs to the text box only, so its runs never count towards the
/// paragraph that holds the text box.
struct ParagraphRuns {
    runs: Vec<TextRun>,
    texts: Vec<String>,
}

impl ParagraphRuns {
    fn scan(xml: &str, markup: Markup) -> Self {
        let mut tags = markup.paragraph_tag().find_iter(xml).peekable();
        let mut open: Vec<usize> = Vec::new();
        let mut runs = Vec::new();
        let mut texts: Vec<String> = Vec::new();

        for run in markup.text_run().captures_iter(xml) {
            let Some(content) = run.get(1) else {
                continue;
            };
            while let Some(tag) = tags.next_if(|tag| tag.start() < content.start()) {
                let tag = tag.as_str();
                if tag.starts_with("</") {
                    open.pop();
                } else if !tag.ends_with("/>") {
                    open.push(texts.len());
                    texts.push(String::new());
                }
            }
            if let Some(&paragraph) = open.last() {
                texts[paragraph].push_str(&unescape(content.as_str()));
                runs.push(TextRun {
                    paragraph,
                    content: content.range(),
                });
            }
        }
        Self { runs, texts }
    }
}

/// Trimmed text of every non-blank paragraph, in the order paragraphs open
pub fn paragraph_texts(xml: &str, markup: Markup) -> Vec<String> {
    ParagraphRuns::scan(xml, markup)
        .texts
        .into_iter()
        .filter_map(|text| {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// Replace the text of each translated paragraph.
///
/// The translation goes into the paragraph's first text run and its later runs
/// are emptied, so run and paragraph properties stay in place.
pub fn rewrite_paragraphs(
    xml: &str,
    markup: Markup,
    translations: &HashMap<String, String>,
) -> String {
    let scanned = ParagraphRuns::scan(xml, markup);
    let mut written = vec![false; scanned.texts.len()];
    let mut rewritten = String::with_capacity(xml.len());
    let mut copied = 0;

    for run in &scanned.runs {
        let Some(translated) = translations.get(scanned.texts[run.paragraph].trim()) else {
            continue;
        };
        rewritten.push_str(&xml[copied..run.content.start]);
        if !written[run.paragraph] {
            rewritten.push_str(&escape(translated));
            written[run.paragraph] = true;
        }
        copied = run.content.end;
    }
    rewritten.push_str(&xml[copied..]);
    rewritten
}

pub fn unescape(text: &str) -> String {
    ENTITY
        .replace_all(text, |entity: &Captures| {
            let name = &entity[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = match name.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => name[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| entity[0].to_string(), String::from)
        })
        .into_owned()
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
