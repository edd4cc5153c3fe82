//! Minimal PDF 1.4 writer for plain-text documents.
//!
//! Produces A4 pages set in the standard Helvetica faces with
//! `WinAnsiEncoding`, which covers the accented Latin characters found in
//! French administrative documents. There is no font embedding and no layout
//! beyond word wrapping and pagination.

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 56;
const BODY_SIZE: u32 = 11;
const TITLE_SIZE: u32 = 16;
const LEADING: u32 = 15;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
/// Helvetica at 11pt averages a little under 5.5pt per glyph
const MAX_LINE_CHARS: usize = 88;

// Fixed object numbers; page objects follow from FIRST_PAGE_OBJECT
const CATALOG_OBJECT: usize = 1;
const PAGES_OBJECT: usize = 2;
const BODY_FONT_OBJECT: usize = 3;
const TITLE_FONT_OBJECT: usize = 4;
const INFO_OBJECT: usize = 5;
const FIRST_PAGE_OBJECT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Body,
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    face: Face,
    text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    title: Option<String>,
    lines: Vec<Line>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title (first line, bold, and the Info dictionary).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends text; newlines start paragraphs and long lines are wrapped.
    pub fn push_text(mut self, text: &str) -> Self {
        for paragraph in text.lines() {
            let wrapped = wrap(paragraph, MAX_LINE_CHARS);
            if wrapped.is_empty() {
                self.lines.push(Line { face: Face::Body, text: String::new() });
            }
            self.lines
                .extend(wrapped.into_iter().map(|text| Line { face: Face::Body, text }));
        }
        self
    }

    pub fn render(&self) -> Vec<u8> {
        let mut all_lines = Vec::with_capacity(self.lines.len() + 2);
        if let Some(title) = &self.title {
            all_lines.push(Line { face: Face::Title, text: title.clone() });
            all_lines.push(Line { face: Face::Body, text: String::new() });
        }
        all_lines.extend(self.lines.iter().cloned());

        let pages: Vec<&[Line]> = if all_lines.is_empty() {
            vec![&all_lines[..]]
        } else {
            all_lines.chunks(LINES_PER_PAGE).collect()
        };

        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(FIRST_PAGE_OBJECT + 2 * pages.len());

        let kids = (0..pages.len())
            .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        objects.push(format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_OBJECT).into_bytes());
        objects.push(
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, pages.len()).into_bytes(),
        );
        objects.push(font_object("Helvetica"));
        objects.push(font_object("Helvetica-Bold"));
        objects.push(self.info_object());

        for (i, lines) in pages.iter().enumerate() {
            let contents_object = FIRST_PAGE_OBJECT + 2 * i + 1;
            objects.push(
                format!(
                    "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 {} 0 R /F2 {} 0 R >> >> /Contents {} 0 R >>",
                    PAGES_OBJECT,
                    PAGE_WIDTH,
                    PAGE_HEIGHT,
                    BODY_FONT_OBJECT,
                    TITLE_FONT_OBJECT,
                    contents_object
                )
                .into_bytes(),
            );
            objects.push(stream_object(&page_content(lines)));
        }

        write_file(&objects)
    }

    fn info_object(&self) -> Vec<u8> {
        let mut info = b"<< /Producer (stagiaires-api)".to_vec();
        if let Some(title) = &self.title {
            info.extend_from_slice(b" /Title (");
            info.extend_from_slice(&encode_text(title));
            info.push(b')');
        }
        info.extend_from_slice(b" >>");
        info
    }
}

fn font_object(base_font: &str) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base_font
    )
    .into_bytes()
}

fn stream_object(content: &[u8]) -> Vec<u8> {
    let mut object = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    object.extend_from_slice(content);
    object.extend_from_slice(b"\nendstream");
    object
}

fn page_content(lines: &[Line]) -> Vec<u8> {
    let mut content = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        BODY_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN
    )
    .into_bytes();

    let mut face = Face::Body;
    for line in lines {
        if line.face != face {
            face = line.face;
            let selector = match face {
                Face::Body => format!("/F1 {} Tf\n", BODY_SIZE),
                Face::Title => format!("/F2 {} Tf\n", TITLE_SIZE),
            };
            content.extend_from_slice(selector.as_bytes());
        }
        content.push(b'(');
        content.extend_from_slice(&encode_text(&line.text));
        content.extend_from_slice(b") Tj T*\n");
    }
    content.extend_from_slice(b"ET");
    content
}

fn write_file(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    // Every xref entry is exactly 20 bytes including the two-byte EOL
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            CATALOG_OBJECT,
            INFO_OBJECT,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

/// Encode text for a PDF literal string in WinAnsiEncoding.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            '\t' => out.push(b' '),
            ' '..='~' => out.push(ch as u8),
            _ => match win_ansi_byte(ch) {
                Some(byte) => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
                None => out.push(b'?'),
            },
        }
    }
    out
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        'Œ' => 0x8C,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        'œ' => 0x9C,
        'Ÿ' => 0x9F,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        _ => return None,
    };
    Some(byte)
}

/// Greedy word wrap on character count; words longer than `width` are split.
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            if current_len > 0 && current_len + 1 + chunk.len() > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chunk);
            current_len += chunk.len();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn renders_well_formed_file() {
        let pdf = PdfDocument::new()
            .with_title("Attestation de stage")
            .push_text("Nous attestons que Léa Dupont a effectué son stage.")
            .render();

        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));

        // startxref must point at the xref keyword
        let tail = String::from_utf8_lossy(&pdf[pdf.len() - 40..]).to_string();
        let startxref: usize = tail
            .split("startxref\n")
            .nth(1)
            .and_then(|s| s.lines().next())
            .and_then(|s| s.parse().ok())
            .expect("startxref offset");
        assert_eq!(&pdf[startxref..startxref + 4], b"xref");

        // every in-use xref entry must point at its "N 0 obj" header
        let xref = String::from_utf8_lossy(&pdf[startxref..]).to_string();
        let entries: Vec<&str> = xref.lines().skip(3).take_while(|l| l.ends_with(" n ")).collect();
        assert_eq!(entries.len(), FIRST_PAGE_OBJECT + 1);
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj\n", i + 1);
            assert_eq!(&pdf[offset..offset + header.len()], header.as_bytes());
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let pdf = PdfDocument::new().push_text("Bonjour").render();
        let start = find(&pdf, b"stream\n").unwrap() + b"stream\n".len();
        let end = find(&pdf, b"\nendstream").unwrap();
        let declared = format!("<< /Length {} >>", end - start);
        assert!(find(&pdf, declared.as_bytes()).is_some());
    }

    #[test]
    fn paginates_long_text() {
        let text = (0..100).map(|i| format!("Ligne {}", i)).collect::<Vec<_>>().join("\n");
        let pdf = PdfDocument::new().with_title("Convention").push_text(&text).render();
        // title + blank + 100 lines over 48-line pages
        assert_eq!(count(&pdf, b"/Type /Page "), 3);
        assert!(find(&pdf, b"/Count 3").is_some());
    }

    #[test]
    fn empty_document_has_one_page() {
        let pdf = PdfDocument::new().render();
        assert_eq!(count(&pdf, b"/Type /Page "), 1);
    }

    #[test]
    fn escapes_delimiters_and_accents() {
        assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_text("é"), b"\\351".to_vec());
        assert_eq!(encode_text("l’été"), b"l\\222\\351t\\351".to_vec());
        assert_eq!(encode_text("€"), b"\\200".to_vec());
        assert_eq!(encode_text("日本"), b"??".to_vec());
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap("un deux trois quatre", 9), vec!["un deux", "trois", "quatre"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
        assert!(wrap("   ", 10).is_empty());
    }
}
