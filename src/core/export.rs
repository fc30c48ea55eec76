//! Result workbook export.
//!
//! Writes the analysis result as a two-sheet `.xlsx`: sheet `ALL` holds
//! every conflict, sheet `Dictionary` the subset matching the reference
//! list. Values go out as inline strings so no shared-string table is
//! needed.

use crate::domain::model::ConflictRecord;
use crate::utils::error::Result;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

pub const EXPORT_FILE_NAME: &str = "conflicting_descriptions.xlsx";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="ALL" sheetId="1" r:id="rId1"/><sheet name="Dictionary" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

/// Serializes both conflict lists into xlsx bytes ready for storage.
pub fn write_workbook(all: &[ConflictRecord], dictionary: &[ConflictRecord]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())?;
    zip.write_all(CONTENT_TYPES.as_bytes())?;

    zip.start_file::<_, ()>("_rels/.rels", FileOptions::default())?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    zip.start_file::<_, ()>("xl/workbook.xml", FileOptions::default())?;
    zip.write_all(WORKBOOK_XML.as_bytes())?;

    zip.start_file::<_, ()>("xl/_rels/workbook.xml.rels", FileOptions::default())?;
    zip.write_all(WORKBOOK_RELS.as_bytes())?;

    zip.start_file::<_, ()>("xl/worksheets/sheet1.xml", FileOptions::default())?;
    zip.write_all(sheet_xml(all).as_bytes())?;

    zip.start_file::<_, ()>("xl/worksheets/sheet2.xml", FileOptions::default())?;
    zip.write_all(sheet_xml(dictionary).as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn sheet_xml(records: &[ConflictRecord]) -> String {
    let mut sheet_data = String::new();
    push_row(&mut sheet_data, 1, "ObjectID", "Description");
    for (i, record) in records.iter().enumerate() {
        push_row(&mut sheet_data, i + 2, &record.object_id, &record.description);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        sheet_data
    )
}

fn push_row(out: &mut String, row: usize, object_id: &str, description: &str) {
    out.push_str(&format!(
        r#"<row r="{row}"><c r="A{row}" t="inlineStr"><is><t>{}</t></is></c><c r="B{row}" t="inlineStr"><is><t>{}</t></is></c></row>"#,
        escape(object_id),
        escape(description),
        row = row
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::xlsx;
    use std::collections::HashSet;

    fn record(id: &str, desc: &str) -> ConflictRecord {
        ConflictRecord {
            object_id: id.to_string(),
            description: desc.to_string(),
        }
    }

    #[test]
    fn test_round_trip_preserves_pairs() {
        let all = vec![
            record("A1", "Temp"),
            record("A1", "Temperature"),
            record("B2", "Pressure <abs>"),
        ];
        let dictionary = vec![record("A1", "Temp"), record("A1", "Temperature")];

        let bytes = write_workbook(&all, &dictionary).unwrap();

        let all_rows = xlsx::read_sheet(&bytes, "ALL").unwrap();
        assert_eq!(all_rows[0], vec!["ObjectID", "Description"]);
        let read_back: HashSet<(String, String)> = all_rows[1..]
            .iter()
            .map(|row| (row[0].clone(), row[1].clone()))
            .collect();
        let expected: HashSet<(String, String)> = all
            .iter()
            .map(|r| (r.object_id.clone(), r.description.clone()))
            .collect();
        assert_eq!(read_back, expected);

        let dict_rows = xlsx::read_sheet(&bytes, "Dictionary").unwrap();
        assert_eq!(dict_rows.len(), 3);
    }

    #[test]
    fn test_empty_result_still_writes_headers() {
        let bytes = write_workbook(&[], &[]).unwrap();

        let all_rows = xlsx::read_sheet(&bytes, "ALL").unwrap();
        assert_eq!(all_rows, vec![vec!["ObjectID", "Description"]]);
        let dict_rows = xlsx::read_sheet(&bytes, "Dictionary").unwrap();
        assert_eq!(dict_rows, vec![vec!["ObjectID", "Description"]]);
    }

    #[test]
    fn test_special_characters_survive_escaping() {
        let all = vec![record("A<1>", "a & b \"quoted\"")];
        let bytes = write_workbook(&all, &[]).unwrap();

        let rows = xlsx::read_sheet(&bytes, "ALL").unwrap();
        assert_eq!(rows[1], vec!["A<1>", "a & b \"quoted\""]);
    }
}
