//! Minimal SpreadsheetML writer: one worksheet, inline strings, a styled
//! header row and auto-sized columns.
//!
//! Every archive entry is stamped with the zip epoch, so the same table always
//! produces the same bytes.

use crate::utils::error::Result;
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const SHEET_NAME: &str = "Sheet1";
const MAX_COLUMN_WIDTH: usize = 50;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const HEADER_STYLE: usize = 1;
const DATA_STYLE: usize = 2;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// 0: default, 1: header (bold white on dark blue, centred), 2: data (wrapped)
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/><family val="2"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/><family val="2"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF1F4E78"/><bgColor rgb="FF1F4E78"/></patternFill></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1" applyAlignment="1"><alignment horizontal="center" vertical="center" wrapText="1"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment vertical="center" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Width in characters: the longest cell plus padding, capped.
pub fn column_widths<S: AsRef<str>>(headers: &[String], rows: &[Vec<S>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.as_ref().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0);
            (longest + 2).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

// XML 1.0 的 Char 產生式以外的字元一律移除
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c,
                '\t' | '\n' | '\r'
                | '\u{20}'..='\u{D7FF}'
                | '\u{E000}'..='\u{FFFD}'
                | '\u{10000}'..='\u{10FFFF}')
        })
        .collect()
}

fn write_cell<W: Write>(
    writer: &mut Writer<W>,
    col: usize,
    row: usize,
    style: usize,
    value: &str,
) -> io::Result<()> {
    let reference = format!("{}{}", column_letter(col), row);
    let style = style.to_string();
    let cell = writer
        .create_element("c")
        .with_attribute(("r", reference.as_str()))
        .with_attribute(("s", style.as_str()));

    let text = xml_safe(value);
    if text.is_empty() {
        cell.write_empty()?;
        return Ok(());
    }

    cell.with_attribute(("t", "inlineStr"))
        .write_inner_content(|writer| {
            writer.create_element("is").write_inner_content(|writer| {
                writer
                    .create_element("t")
                    .with_attribute(("xml:space", "preserve"))
                    .write_text_content(BytesText::new(&text))?;
                Ok::<_, io::Error>(())
            })?;
            Ok::<_, io::Error>(())
        })?;
    Ok(())
}

fn write_row<'v, W: Write>(
    writer: &mut Writer<W>,
    row: usize,
    style: usize,
    cells: impl Iterator<Item = &'v str>,
) -> io::Result<()> {
    let number = row.to_string();
    writer
        .create_element("row")
        .with_attribute(("r", number.as_str()))
        .write_inner_content(|writer| {
            for (col, value) in cells.enumerate() {
                write_cell(writer, col, row, style, value)?;
            }
            Ok::<_, io::Error>(())
        })?;
    Ok(())
}

fn write_layout<W: Write, S: AsRef<str>>(
    writer: &mut Writer<W>,
    headers: &[String],
    rows: &[Vec<S>],
) -> io::Result<()> {
    // 凍結標題列
    writer.create_element("sheetViews").write_inner_content(|writer| {
        writer
            .create_element("sheetView")
            .with_attribute(("workbookViewId", "0"))
            .write_inner_content(|writer| {
                writer
                    .create_element("pane")
                    .with_attributes([
                        ("ySplit", "1"),
                        ("topLeftCell", "A2"),
                        ("activePane", "bottomLeft"),
                        ("state", "frozen"),
                    ])
                    .write_empty()?;
                Ok::<_, io::Error>(())
            })?;
        Ok::<_, io::Error>(())
    })?;

    writer.create_element("cols").write_inner_content(|writer| {
        for (idx, width) in column_widths(headers, rows).into_iter().enumerate() {
            let n = (idx + 1).to_string();
            let width = width.to_string();
            writer
                .create_element("col")
                .with_attributes([
                    ("min", n.as_str()),
                    ("max", n.as_str()),
                    ("width", width.as_str()),
                    ("customWidth", "1"),
                ])
                .write_empty()?;
        }
        Ok::<_, io::Error>(())
    })?;
    Ok(())
}

fn worksheet_xml<S: AsRef<str>>(headers: &[String], rows: &[Vec<S>]) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    writer
        .create_element("worksheet")
        .with_attribute(("xmlns", SPREADSHEET_NS))
        .write_inner_content(|writer| {
            if !headers.is_empty() {
                write_layout(writer, headers, rows)?;
            }
            writer.create_element("sheetData").write_inner_content(|writer| {
                write_row(writer, 1, HEADER_STYLE, headers.iter().map(String::as_str))?;
                for (idx, row) in rows.iter().enumerate() {
                    let cells = (0..headers.len())
                        .map(|col| row.get(col).map(|cell| cell.as_ref()).unwrap_or(""));
                    write_row(writer, idx + 2, DATA_STYLE, cells)?;
                }
                Ok::<_, io::Error>(())
            })?;
            Ok::<_, io::Error>(())
        })?;

    Ok(writer.into_inner())
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

/// Render a header row plus data rows as `.xlsx` bytes.
pub fn write_workbook<S: AsRef<str>>(headers: &[String], rows: &[Vec<S>]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let parts: [(&str, Vec<u8>); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
        ("xl/workbook.xml", workbook_xml().into_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes().to_vec()),
        ("xl/styles.xml", STYLES.as_bytes().to_vec()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(headers, rows)?),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&body)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
