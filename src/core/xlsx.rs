//! Minimal `.xlsx` sheet reading.
//!
//! Just enough Open XML plumbing to pull one named sheet out of a workbook
//! as rows of strings: the sheet catalog from `xl/workbook.xml`, worksheet
//! targets from the relationship part (with a positional guess when the
//! relationship is missing), the optional shared-string table, and the
//! worksheet grid itself.

use crate::utils::error::{AnalysisError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

struct SheetDescriptor {
    name: String,
    rel_id: Option<String>,
    sheet_id: Option<u32>,
}

/// Reads the sheet named `sheet_name` out of an xlsx workbook and returns
/// its rows. Cells are strings; gaps within a row are padded with `""`.
pub fn read_sheet(workbook_bytes: &[u8], sheet_name: &str) -> Result<Vec<Vec<String>>> {
    let mut archive = ZipArchive::new(Cursor::new(workbook_bytes))?;

    let workbook_xml =
        read_entry(&mut archive, "xl/workbook.xml")?.ok_or_else(|| AnalysisError::XmlError {
            message: "xl/workbook.xml missing from workbook".to_string(),
        })?;
    let sheets = parse_workbook_xml(&workbook_xml)?;

    let (index, sheet) = sheets
        .iter()
        .enumerate()
        .find(|(_, s)| s.name == sheet_name)
        .ok_or_else(|| AnalysisError::SheetMissing {
            name: sheet_name.to_string(),
        })?;

    let relationships = match read_entry(&mut archive, "xl/_rels/workbook.xml.rels")? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => HashMap::new(),
    };

    let shared_strings = match read_entry(&mut archive, "xl/sharedStrings.xml")? {
        Some(bytes) => parse_shared_strings(&bytes)?,
        None => Vec::new(),
    };

    let target = resolve_sheet_target(sheet, &relationships, index);
    let sheet_xml =
        read_entry(&mut archive, &target)?.ok_or_else(|| AnalysisError::XmlError {
            message: format!("worksheet part '{}' missing for sheet '{}'", target, sheet_name),
        })?;

    parse_sheet_rows(&sheet_xml, &shared_strings)
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            Ok(Some(buf))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn xml_err<E: std::fmt::Display>(e: E) -> AnalysisError {
    AnalysisError::XmlError {
        message: e.to_string(),
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_workbook_xml(xml: &[u8]) -> Result<Vec<SheetDescriptor>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                let name = attr_value(&e, b"name")?;
                let rel_id = attr_value(&e, b"r:id")?;
                let sheet_id = attr_value(&e, b"sheetId")?.and_then(|v| v.parse::<u32>().ok());
                if let Some(name) = name {
                    sheets.push(SheetDescriptor {
                        name,
                        rel_id,
                        sheet_id,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut map = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let id = attr_value(&e, b"Id")?;
                let target = attr_value(&e, b"Target")?;
                let rel_type = attr_value(&e, b"Type")?;
                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.contains("worksheet") {
                        map.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

fn resolve_sheet_target(
    sheet: &SheetDescriptor,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    if let Some(rel_id) = &sheet.rel_id {
        if let Some(target) = relationships.get(rel_id) {
            return normalize_target(target);
        }
    }

    let guessed = sheet
        .sheet_id
        .map(|id| format!("xl/worksheets/sheet{}.xml", id))
        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", index + 1));
    normalize_target(&guessed)
}

fn normalize_target(target: &str) -> String {
    let trimmed = target.trim_start_matches('/');
    if trimmed.starts_with("xl/") {
        trimmed.to_string()
    } else {
        format!("xl/{}", trimmed)
    }
}

fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"si" => {
                current.clear();
                in_si = true;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" && in_si => {
                // rich-text runs concatenate into one entry
                let text = reader.read_text(e.name()).map_err(xml_err)?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"si" => {
                strings.push(current.clone());
                in_si = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

fn parse_sheet_rows(xml: &[u8], shared_strings: &[String]) -> Result<Vec<Vec<String>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut in_row = false;
    let mut cell_col: usize = 0;
    let mut cell_type: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"row" => {
                row.clear();
                in_row = true;
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"row" => {
                rows.push(Vec::new());
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if in_row && e.name().as_ref() == b"c" => {
                cell_col = match attr_value(&e, b"r")? {
                    Some(address) => column_index(&address).ok_or_else(|| {
                        AnalysisError::XmlError {
                            message: format!("invalid cell address: {}", address),
                        }
                    })?,
                    None => row.len(),
                };
                cell_type = attr_value(&e, b"t")?;
                set_cell(&mut row, cell_col, String::new());
            }
            Ok(Event::Start(e)) if in_row && e.name().as_ref() == b"v" => {
                let text = reader.read_text(e.name()).map_err(xml_err)?.into_owned();
                let value = match cell_type.as_deref() {
                    Some("s") => {
                        let idx: usize = text.trim().parse().map_err(|_| {
                            AnalysisError::XmlError {
                                message: format!("invalid shared string index: {}", text),
                            }
                        })?;
                        shared_strings
                            .get(idx)
                            .cloned()
                            .ok_or_else(|| AnalysisError::XmlError {
                                message: format!("shared string index {} out of bounds", idx),
                            })?
                    }
                    _ => text,
                };
                set_cell(&mut row, cell_col, value);
            }
            Ok(Event::Start(e))
                if in_row && cell_type.as_deref() == Some("inlineStr")
                    && e.name().as_ref() == b"t" =>
            {
                let text = reader.read_text(e.name()).map_err(xml_err)?.into_owned();
                set_cell(&mut row, cell_col, text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"row" => {
                rows.push(std::mem::take(&mut row));
                in_row = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

fn set_cell(row: &mut Vec<String>, col: usize, value: String) {
    if row.len() <= col {
        row.resize(col + 1, String::new());
    }
    row[col] = value;
}

// `B12` -> 1; only the alphabetic prefix matters.
fn column_index(address: &str) -> Option<usize> {
    let mut index: usize = 0;
    let mut seen = false;
    for c in address.chars() {
        if c.is_ascii_alphabetic() {
            index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
            seen = true;
        } else {
            break;
        }
    }
    if seen {
        Some(index - 1)
    } else {
        None
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::io::{Cursor, Write};
    use zip::write::{FileOptions, ZipWriter};

    /// Builds a one- or two-sheet workbook with literal string cells
    /// (`t="str"`), the shape the reader is pointed at in tests.
    pub fn make_xlsx(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())
            .unwrap();
        zip.write_all(b"<Types/>").unwrap();

        let mut sheet_entries = String::new();
        let mut rel_entries = String::new();
        for (i, (name, _)) in sheets.iter().enumerate() {
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                name,
                i + 1,
                i + 1
            ));
            rel_entries.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        zip.start_file::<_, ()>("xl/workbook.xml", FileOptions::default())
            .unwrap();
        zip.write_all(
            format!(
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
                sheet_entries
            )
            .as_bytes(),
        )
        .unwrap();

        zip.start_file::<_, ()>("xl/_rels/workbook.xml.rels", FileOptions::default())
            .unwrap();
        zip.write_all(
            format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
                rel_entries
            )
            .as_bytes(),
        )
        .unwrap();

        for (i, (_, rows)) in sheets.iter().enumerate() {
            let mut sheet_data = String::new();
            for (r, cells) in rows.iter().enumerate() {
                sheet_data.push_str(&format!(r#"<row r="{}">"#, r + 1));
                for (c, value) in cells.iter().enumerate() {
                    sheet_data.push_str(&format!(
                        r#"<c r="{}{}" t="str"><v>{}</v></c>"#,
                        column_letter(c),
                        r + 1,
                        value
                    ));
                }
                sheet_data.push_str("</row>");
            }
            zip.start_file::<_, ()>(
                format!("xl/worksheets/sheet{}.xml", i + 1),
                FileOptions::default(),
            )
            .unwrap();
            zip.write_all(
                format!(
                    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    sheet_data
                )
                .as_bytes(),
            )
            .unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    fn column_letter(col: usize) -> String {
        let mut col = col + 1;
        let mut letters = String::new();
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.insert(0, (b'A' + rem as u8) as char);
            col = (col - 1) / 26;
        }
        letters
    }
}
