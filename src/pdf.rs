//! Minimal PDF writer for tabular reports.
//!
//! Produces a PDF 1.4 document using the standard Helvetica fonts, so no font
//! data is embedded. Text is encoded as WinAnsi: Latin-1 plus the
//! typographic punctuation WinAnsi carries in 0x80-0x9F. Anything else,
//! Cyrillic or CJK for instance, is printed as `?`.

use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 40.0;
const ROW_HEIGHT: f32 = 14.0;
const FONT_SIZE: f32 = 8.0;
/// Rough average glyph width of Helvetica relative to the font size.
const GLYPH_WIDTH: f32 = 0.5;

/// A titled table laid out on A4 landscape pages.
#[derive(Debug)]
pub struct TableReport<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    /// Column header and width in points.
    pub columns: &'a [(&'a str, f32)],
    pub rows: Vec<Vec<String>>,
}

impl TableReport<'_> {
    pub fn render(&self) -> Vec<u8> {
        let pages = self.paginate();
        let page_count = pages.len();

        let mut objects: Vec<Vec<u8>> = Vec::new();
        // 1: catalog, 2: page tree, 3: regular font, 4: bold font.
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
        let kids: String = (0..page_count)
            .map(|i| format!("{} 0 R", 5 + i * 2))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>").into_bytes());
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );

        for (index, rows) in pages.iter().enumerate() {
            let content = self.page_content(index, page_count, rows);
            let content_id = 6 + index * 2;
            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
                )
                .into_bytes(),
            );
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }

        write_document(&objects)
    }

    /// Splits rows over pages; the first page also carries the title block.
    fn paginate(&self) -> Vec<&[Vec<String>]> {
        let usable = PAGE_HEIGHT - 2.0 * MARGIN - ROW_HEIGHT;
        let per_page = (usable / ROW_HEIGHT) as usize - 1;
        let first_page = per_page.saturating_sub(4).max(1);

        let mut pages = Vec::new();
        let (head, mut rest) = self.rows.split_at(first_page.min(self.rows.len()));
        pages.push(head);
        while !rest.is_empty() {
            let (page, tail) = rest.split_at(per_page.min(rest.len()));
            pages.push(page);
            rest = tail;
        }
        pages
    }

    fn page_content(&self, index: usize, page_count: usize, rows: &[Vec<String>]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut y = PAGE_HEIGHT - MARGIN;

        if index == 0 {
            text(&mut out, "F2", 16.0, MARGIN, y - 16.0, self.title);
            text(&mut out, "F1", 10.0, MARGIN, y - 34.0, self.subtitle);
            y -= 4.0 * ROW_HEIGHT;
        }

        let mut x = MARGIN;
        for (header, width) in self.columns {
            text(&mut out, "F2", FONT_SIZE + 1.0, x, y - ROW_HEIGHT + 4.0, header);
            x += width;
        }
        y -= ROW_HEIGHT;
        rule(&mut out, y + 1.0);

        for row in rows {
            let mut x = MARGIN;
            for ((_, width), cell) in self.columns.iter().zip(row) {
                let clipped = clip(cell, *width);
                text(&mut out, "F1", FONT_SIZE, x, y - ROW_HEIGHT + 4.0, &clipped);
                x += width;
            }
            y -= ROW_HEIGHT;
        }

        let footer = format!("Page {} of {}", index + 1, page_count);
        text(&mut out, "F1", FONT_SIZE, PAGE_WIDTH - MARGIN - 50.0, MARGIN / 2.0, &footer);
        out
    }
}

fn text(out: &mut Vec<u8>, font: &str, size: f32, x: f32, y: f32, value: &str) {
    out.extend_from_slice(format!("BT /{font} {size} Tf {x:.1} {y:.1} Td (").as_bytes());
    out.extend_from_slice(&encode_text(value));
    out.extend_from_slice(b") Tj ET\n");
}

fn rule(out: &mut Vec<u8>, y: f32) {
    out.extend_from_slice(
        format!("0.5 w {MARGIN:.1} {y:.1} m {:.1} {y:.1} l S\n", PAGE_WIDTH - MARGIN).as_bytes(),
    );
}

/// Shortens `value` to roughly fit `width` points, marking the cut with `...`.
fn clip(value: &str, width: f32) -> String {
    let max_chars = ((width / (FONT_SIZE * GLYPH_WIDTH)) as usize).saturating_sub(1);
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// Escapes a string literal body and maps it to single-byte WinAnsi.
fn encode_text(value: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '(' | ')' | '\\' => {
                bytes.push(b'\\');
                bytes.push(ch as u8);
            }
            '\r' | '\n' | '\t' => bytes.push(b' '),
            c if (c as u32) < 0x20 => {}
            c if (c as u32) < 0x7F || (0xA0..=0xFF).contains(&(c as u32)) => bytes.push(c as u8),
            c => bytes.push(win_ansi_extra(c).unwrap_or(b'?')),
        }
    }
    bytes
}

/// WinAnsi codes in 0x80-0x9F for characters that are not in Latin-1.
fn win_ansi_extra(ch: char) -> Option<u8> {
    let code = match ch {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

fn write_document(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_start = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = writeln!(xref, "{offset:010} 00000 n ");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
        objects.len() + 1
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(rows: usize) -> Vec<u8> {
        TableReport {
            title: "Report",
            subtitle: "Generated on: now",
            columns: &[("Name", 200.0), ("Email", 200.0)],
            rows: (0..rows)
                .map(|n| vec![format!("Name {n}"), format!("user{n}@example.com")])
                .collect(),
        }
        .render()
    }

    fn count(haystack: &[u8], needle: &[u8]) -> usize {
        haystack.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn document_has_header_and_trailer() {
        let pdf = report(3);

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert!(pdf.ends_with(b"%%EOF\n"));
        assert_eq!(count(&pdf, b"/Type /Page "), 1);
        assert_eq!(count(&pdf, b"(Name 2) Tj"), 1);
    }

    #[test]
    fn long_tables_span_pages() {
        let pdf = report(100);

        assert!(count(&pdf, b"/Type /Page ") > 2);
        assert_eq!(count(&pdf, b"(Name 99) Tj"), 1);
        assert_eq!(count(&pdf, b"(Name 0) Tj"), 1);
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(encode_text(r"a(b)\c"), br"a\(b\)\\c".to_vec());
        assert_eq!(encode_text("line\nbreak"), b"line break".to_vec());
        assert_eq!(encode_text("café ✓"), vec![b'c', b'a', b'f', 0xE9, b' ', b'?']);
    }

    #[test]
    fn text_outside_win_ansi_prints_as_question_marks() {
        assert_eq!(encode_text("\u{201C}5\u{20AC}\u{201D}"), vec![0x93, b'5', 0x80, 0x94]);
        assert_eq!(encode_text("Иван 李"), b"???? ?".to_vec());
    }

    #[test]
    fn clip_marks_truncation() {
        let clipped = clip(&"x".repeat(100), 40.0);

        assert!(clipped.ends_with("..."));
        assert!(clipped.chars().count() <= 9);
        assert_eq!(clip("short", 200.0), "short");
    }
}
