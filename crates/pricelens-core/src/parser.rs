//! Delimited-text catalog parser
//!
//! Turns the raw catalog text (header row + one row per model) into typed
//! [`Record`]s. Parsing is lenient: a malformed numeric cell becomes 0 and
//! a short row gets empty strings for its missing cells. Nothing in a row
//! can abort the whole parse.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Record;

/// Field delimiter
pub const DELIMITER: char = ',';

/// Quote character that toggles literal-delimiter mode
pub const QUOTE: char = '"';

/// UTF-8 byte order mark some spreadsheet exports prepend
const BOM: char = '\u{feff}';

/// Typed record field a header column maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Provider,
    Name,
    CodeName,
    InputPrice,
    OutputPrice,
    ContextWindow,
    Modality,
    Availability,
    Speed,
    Quality,
    Specialization,
    DocsUrl,
}

impl Field {
    /// All fields in canonical column order
    pub const ALL: [Field; 12] = [
        Field::Provider,
        Field::Name,
        Field::CodeName,
        Field::InputPrice,
        Field::OutputPrice,
        Field::ContextWindow,
        Field::Modality,
        Field::Availability,
        Field::Speed,
        Field::Quality,
        Field::Specialization,
        Field::DocsUrl,
    ];

    /// Built-in header labels; the first one is used when writing.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Field::Provider => &["Компания", "Provider"],
            Field::Name => &["Название модели", "Model", "Name"],
            Field::CodeName => &["Кодовое название", "Code Name", "Model ID"],
            Field::InputPrice => &["Цена за 1M input токенов", "Input Price"],
            Field::OutputPrice => &["Цена за 1M output токенов", "Output Price"],
            Field::ContextWindow => &["Контекстное окно", "Context Window"],
            Field::Modality => &["Модальность", "Modality"],
            Field::Availability => &["Доступность в РФ", "Availability"],
            Field::Speed => &["Скорость", "Speed"],
            Field::Quality => &["Качество", "Quality"],
            Field::Specialization => &["Специализация", "Specialization"],
            Field::DocsUrl => &["API документация URL", "Docs URL"],
        }
    }

    pub fn header(self) -> &'static str {
        self.labels()[0]
    }

    fn assign(self, record: &mut Record, raw: &str) {
        match self {
            Field::Provider => record.provider = raw.to_string(),
            Field::Name => record.name = raw.to_string(),
            Field::CodeName => record.code_name = raw.to_string(),
            Field::InputPrice => record.input_price = lenient_price(raw),
            Field::OutputPrice => record.output_price = lenient_price(raw),
            Field::ContextWindow => record.context_window = lenient_count(raw),
            Field::Modality => record.modality = raw.to_string(),
            Field::Availability => record.availability = raw.to_string(),
            Field::Speed => record.speed = raw.to_string(),
            Field::Quality => record.quality = raw.to_string(),
            Field::Specialization => record.specialization = raw.to_string(),
            Field::DocsUrl => record.docs_url = raw.to_string(),
        }
    }

    fn value(self, record: &Record) -> String {
        match self {
            Field::Provider => record.provider.clone(),
            Field::Name => record.name.clone(),
            Field::CodeName => record.code_name.clone(),
            Field::InputPrice => record.input_price.to_string(),
            Field::OutputPrice => record.output_price.to_string(),
            Field::ContextWindow => record.context_window.to_string(),
            Field::Modality => record.modality.clone(),
            Field::Availability => record.availability.clone(),
            Field::Speed => record.speed.clone(),
            Field::Quality => record.quality.clone(),
            Field::Specialization => record.specialization.clone(),
            Field::DocsUrl => record.docs_url.clone(),
        }
    }
}

/// Header label → field mapping, used only while parsing
#[derive(Debug, Clone)]
pub struct ColumnMap {
    aliases: HashMap<String, Field>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        let aliases = Field::ALL
            .iter()
            .flat_map(|field| field.labels().iter().map(move |label| (normalize(label), *field)))
            .collect();
        Self { aliases }
    }
}

impl ColumnMap {
    /// Add an extra header label for a field
    pub fn with_alias(mut self, label: &str, field: Field) -> Self {
        self.aliases.insert(normalize(label), field);
        self
    }

    /// Extend with a batch of aliases (typically from config)
    pub fn with_aliases<'a>(mut self, aliases: impl IntoIterator<Item = (&'a String, &'a Field)>) -> Self {
        for (label, field) in aliases {
            self.aliases.insert(normalize(label), *field);
        }
        self
    }

    pub fn field_for(&self, header: &str) -> Option<Field> {
        self.aliases.get(&normalize(header)).copied()
    }

    fn resolve(&self, headers: &[String]) -> Vec<Option<Field>> {
        headers
            .iter()
            .map(|header| {
                let field = self.field_for(header);
                if field.is_none() {
                    debug!("Ignoring unknown catalog column: {}", header);
                }
                field
            })
            .collect()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Split one data line into raw cells.
///
/// A quote toggles "inside quotes"; while inside, the delimiter is literal.
/// Quote characters are dropped from the output. Embedded (doubled) quotes
/// are not recognised.
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    values.push(current);

    values
}

/// Parse the leading decimal number of `raw`, the way a lenient float
/// reader would (`"2.5 USD"` → 2.5). Anything unparseable, negative or
/// non-finite becomes 0.
pub fn lenient_price(raw: &str) -> f64 {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Parse the leading integer of `raw` (`"128000 tokens"` → 128000,
/// `"1.5"` → 1). Anything unparseable or negative becomes 0.
pub fn lenient_count(raw: &str) -> u64 {
    let s = raw.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

/// Parse catalog text into records, in source order.
///
/// The first non-empty line is the header. Blank lines are skipped and a
/// leading byte order mark is ignored. Empty input yields an empty catalog.
pub fn parse_catalog(text: &str, columns: &ColumnMap) -> Vec<Record> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text.trim().lines();

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line
        .split(DELIMITER)
        .map(|h| h.trim().to_string())
        .collect();
    let fields = columns.resolve(&headers);

    let records: Vec<Record> = lines
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_row(idx + 2, line, &fields))
        .collect();

    debug!("Parsed {} catalog rows ({} columns)", records.len(), headers.len());
    records
}

fn parse_row(line_no: usize, line: &str, fields: &[Option<Field>]) -> Record {
    let values = split_line(line);
    if values.len() != fields.len() {
        debug!(
            "Catalog line {}: {} cells for {} columns",
            line_no,
            values.len(),
            fields.len()
        );
    }

    let mut record = Record::default();
    for (idx, field) in fields.iter().enumerate() {
        let Some(field) = field else { continue };
        let raw = values.get(idx).map(|v| v.trim()).unwrap_or("");
        field.assign(&mut record, raw);
    }
    record
}

/// Serialise records back to catalog text using the canonical headers.
///
/// Cells containing the delimiter are wrapped in quotes.
pub fn write_catalog(records: &[Record]) -> String {
    let mut out = Field::ALL
        .iter()
        .map(|f| f.header())
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');

    for record in records {
        let row = Field::ALL
            .iter()
            .map(|f| quote_cell(f.value(record)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn quote_cell(value: String) -> String {
    if value.contains(DELIMITER) {
        format!("{QUOTE}{value}{QUOTE}")
    } else {
        value
    }
}
