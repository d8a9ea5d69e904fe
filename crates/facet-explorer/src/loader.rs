//! XML loading for the term database and the category explorer.
//!
//! Both files are flat lists of record elements under one document element:
//!
//! ```xml
//! <terms>
//!   <term>
//!     <termCode>10001</termCode>
//!     <termName>Scalpel</termName>
//!     <termDefinition>A small knife</termDefinition>
//!     <termStatus>Active</termStatus>
//!   </term>
//! </terms>
//!
//! <explorer>
//!   <node>
//!     <id>1003</id>
//!     <code>C1003</code>            <!-- absent or empty on roots -->
//!     <name>Cutting</name>
//!     <definition>Devices that cut</definition>
//!     <path>/1000/1003/</path>
//!     <termCode>10001</termCode>    <!-- repeated -->
//!   </node>
//! </explorer>
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use facet_taxonomy::{CategoryRecord, Taxonomy, Term, TermStatus};
use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader;
use tracing::{debug, info};

use crate::error::{ExplorerError, ExplorerResult};

/// Element name of a term record.
pub const TERM_ELEMENT: &str = "term";
/// Element name of a category record.
pub const NODE_ELEMENT: &str = "node";

/// Child elements of one record, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// First value of a field.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// All values of a repeated field.
    pub fn all<'r>(&'r self, name: &'r str) -> impl Iterator<Item = &'r str> + 'r {
        self.fields
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// First non-empty value of a field.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.first(name).filter(|value| !value.is_empty())
    }
}

/// Reads every `record_element` directly under the document element.
pub fn read_records<R: BufRead>(
    input: R,
    record_element: &str,
    source_name: &str,
) -> ExplorerResult<Vec<RawRecord>> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let xml_error = |message: String| ExplorerError::Xml {
        source_name: source_name.to_string(),
        message,
    };

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    let mut field: Option<(String, String)> = None;
    let mut depth = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            xml_error(format!("{e} at byte {}", reader.buffer_position()))
        })?;

        match event {
            XmlEvent::Start(element) => {
                depth += 1;
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                match depth {
                    2 if name == record_element => current = Some(RawRecord::default()),
                    3 if current.is_some() => field = Some((name, String::new())),
                    _ => {}
                }
            }
            XmlEvent::Empty(element) => {
                if depth == 2 {
                    if let Some(record) = current.as_mut() {
                        let name =
                            String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                        record.fields.push((name, String::new()));
                    }
                }
            }
            XmlEvent::Text(text) => {
                if let Some((_, value)) = field.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| xml_error(format!("{e}")))?;
                    value.push_str(&text);
                }
            }
            XmlEvent::CData(data) => {
                if let Some((_, value)) = field.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            XmlEvent::End(_) => {
                match depth {
                    3 => {
                        if let (Some(record), Some((name, value))) = (current.as_mut(), field.take())
                        {
                            record.fields.push((name, value.trim().to_string()));
                        }
                    }
                    2 => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            XmlEvent::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(source = source_name, element = record_element, count = records.len(), "read XML records");
    Ok(records)
}

/// Parses term records from XML.
pub fn parse_terms<R: BufRead>(input: R, source_name: &str) -> ExplorerResult<Vec<Term>> {
    read_records(input, TERM_ELEMENT, source_name)?
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let code = raw.non_empty("termCode").ok_or_else(|| ExplorerError::MissingField {
                record: format!("{source_name}: term #{}", index + 1),
                field: "termCode",
            })?;
            Ok(Term::new(
                code,
                raw.first("termName").unwrap_or_default(),
                raw.first("termDefinition").unwrap_or_default(),
                TermStatus::from_label(raw.first("termStatus").unwrap_or_default()),
            ))
        })
        .collect()
}

/// Parses category records from XML.
///
/// A missing or empty `<code>` makes the category a root. A missing `<path>`
/// is kept as an empty path, which resolves to no parent.
pub fn parse_categories<R: BufRead>(
    input: R,
    source_name: &str,
) -> ExplorerResult<Vec<CategoryRecord>> {
    read_records(input, NODE_ELEMENT, source_name)?
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let id = raw.non_empty("id").ok_or_else(|| ExplorerError::MissingField {
                record: format!("{source_name}: node #{}", index + 1),
                field: "id",
            })?;
            Ok(CategoryRecord {
                id: id.to_string(),
                code: raw.non_empty("code").map(str::to_string),
                name: raw.first("name").unwrap_or_default().to_string(),
                definition: raw.first("definition").unwrap_or_default().to_string(),
                path: raw.first("path").unwrap_or_default().to_string(),
                term_codes: raw
                    .all("termCode")
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

fn open(path: &Path) -> ExplorerResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ExplorerError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads term records from an XML file.
pub fn load_terms(path: &Path) -> ExplorerResult<Vec<Term>> {
    parse_terms(open(path)?, &path.display().to_string())
}

/// Loads category records from an XML file.
pub fn load_categories(path: &Path) -> ExplorerResult<Vec<CategoryRecord>> {
    parse_categories(open(path)?, &path.display().to_string())
}

/// Loads both files and builds the taxonomy.
pub fn load_taxonomy(terms_path: &Path, explorer_path: &Path) -> ExplorerResult<Taxonomy> {
    let terms = load_terms(terms_path)?;
    let categories = load_categories(explorer_path)?;
    let taxonomy = Taxonomy::build(terms, categories)?;
    info!(
        terms = taxonomy.term_count(),
        categories = taxonomy.len(),
        roots = taxonomy.roots().len(),
        "loaded taxonomy"
    );
    Ok(taxonomy)
}
