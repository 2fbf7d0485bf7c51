//! Hyperlink targets are stored outside the cell grid, as `<hyperlink>`
//! elements in the worksheet XML whose `r:id` resolves through the sheet's
//! `.rels` part. This module digs them out of the `.xlsx` ZIP directly.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

/// Collects hyperlink targets from the first worksheet, keyed by zero-based
/// `(row, col)`. Any failure degrades to an empty map: a sheet without
/// resolvable hyperlinks still imports, the link-like fields just fall back
/// to their cell text.
pub fn extract_hyperlinks(bytes: &[u8]) -> HashMap<(u32, u32), String> {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            tracing::warn!("Not a readable xlsx archive, skipping hyperlinks: {}", e);
            return HashMap::new();
        }
    };

    let workbook_xml = match read_zip_file(&mut archive, "xl/workbook.xml") {
        Some(xml) => xml,
        None => return HashMap::new(),
    };
    let workbook_rels = match read_zip_file(&mut archive, "xl/_rels/workbook.xml.rels") {
        Some(xml) => xml,
        None => return HashMap::new(),
    };

    let sheet_path = match resolve_first_worksheet_path(&workbook_xml, &workbook_rels) {
        Some(path) => path,
        None => {
            tracing::warn!("Could not resolve first worksheet path, skipping hyperlinks");
            return HashMap::new();
        }
    };

    let sheet_xml = match read_zip_file(&mut archive, &sheet_path) {
        Some(xml) => xml,
        None => return HashMap::new(),
    };
    let sheet_rels = read_zip_file(&mut archive, &rels_path_for(&sheet_path)).unwrap_or_default();

    let rid_to_target = parse_relationships(&sheet_rels);

    let mut links = HashMap::new();
    for (cell_ref, rid) in parse_hyperlink_refs(&sheet_xml) {
        let target = match rid_to_target.get(&rid) {
            Some(target) => target.clone(),
            None => continue,
        };
        if let Some(coords) = decode_cell_ref(&cell_ref) {
            links.insert(coords, target);
        }
    }

    links
}

fn read_zip_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Option<String> {
    let mut file = archive.by_name(path).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).ok()?;
    Some(content)
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`
fn rels_path_for(sheet_path: &str) -> String {
    match sheet_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", sheet_path),
    }
}

/// Resolves the first `<sheet>` of workbook.xml through the workbook rels to
/// a worksheet part path.
fn resolve_first_worksheet_path(workbook_xml: &str, rels_xml: &str) -> Option<String> {
    let mut first_rid = None;
    let mut reader = Reader::from_str(workbook_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"sheet" => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        first_rid = Some(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
                if first_rid.is_some() {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let rid = first_rid?;
    let target = parse_relationships(rels_xml).remove(&rid)?;
    if target.starts_with("xl/") {
        Some(target)
    } else {
        Some(format!("xl/{}", target.trim_start_matches("/xl/")))
    }
}

/// Parses a `.rels` part into rId -> Target.
fn parse_relationships(rels_xml: &str) -> HashMap<String, String> {
    let mut rid_to_target = HashMap::new();
    let mut reader = Reader::from_str(rels_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).to_string())
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rid_to_target.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    rid_to_target
}

/// Collects `(ref, r:id)` pairs from the worksheet's `<hyperlink>` elements.
/// Internal anchors carry no `r:id` and are skipped.
fn parse_hyperlink_refs(sheet_xml: &str) -> Vec<(String, String)> {
    let mut refs = Vec::new();
    let mut reader = Reader::from_str(sheet_xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"hyperlink" =>
            {
                let mut cell_ref = None;
                let mut rid = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"ref" => {
                            cell_ref = Some(String::from_utf8_lossy(&attr.value).to_string())
                        }
                        b"r:id" => rid = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        _ => {}
                    }
                }
                if let (Some(cell_ref), Some(rid)) = (cell_ref, rid) {
                    refs.push((cell_ref, rid));
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    refs
}

/// Decodes an A1-style reference into zero-based `(row, col)`.
pub fn decode_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_cell_ref() {
        assert_eq!(decode_cell_ref("A1"), Some((0, 0)));
        assert_eq!(decode_cell_ref("C5"), Some((4, 2)));
        assert_eq!(decode_cell_ref("AA10"), Some((9, 26)));
        assert_eq!(decode_cell_ref(""), None);
        assert_eq!(decode_cell_ref("12"), None);
        assert_eq!(decode_cell_ref("A0"), None);
    }

    #[test]
    fn test_parse_hyperlink_refs() {
        let xml = r#"<worksheet>
            <sheetData/>
            <hyperlinks>
                <hyperlink ref="P2" r:id="rId1"/>
                <hyperlink ref="Q3" r:id="rId2"/>
                <hyperlink ref="B7" location="Sheet2!A1"/>
            </hyperlinks>
        </worksheet>"#;

        let refs = parse_hyperlink_refs(xml);
        assert_eq!(
            refs,
            vec![
                ("P2".to_string(), "rId1".to_string()),
                ("Q3".to_string(), "rId2".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<Relationships>
            <Relationship Id="rId1" Type="t" Target="https://drive.example.com/file/abc"/>
            <Relationship Id="rId2" Type="t" Target="https://drive.example.com/file/def"/>
        </Relationships>"#;

        let rels = parse_relationships(xml);
        assert_eq!(
            rels.get("rId1").map(String::as_str),
            Some("https://drive.example.com/file/abc")
        );
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(
            rels_path_for("xl/worksheets/sheet1.xml"),
            "xl/worksheets/_rels/sheet1.xml.rels"
        );
    }

    #[test]
    fn test_resolve_first_worksheet_path() {
        let workbook = r#"<workbook><sheets>
            <sheet name="설문지 응답" sheetId="1" r:id="rId3"/>
            <sheet name="Sheet2" sheetId="2" r:id="rId4"/>
        </sheets></workbook>"#;
        let rels = r#"<Relationships>
            <Relationship Id="rId3" Type="t" Target="worksheets/sheet1.xml"/>
            <Relationship Id="rId4" Type="t" Target="worksheets/sheet2.xml"/>
        </Relationships>"#;

        assert_eq!(
            resolve_first_worksheet_path(workbook, rels),
            Some("xl/worksheets/sheet1.xml".to_string())
        );
    }
}
