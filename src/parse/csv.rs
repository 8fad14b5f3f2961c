//! CSV ingestion
//!
//! Spreadsheet exports arrive in three header layouts, detected from the
//! header row:
//!
//! - consolidated: `product_sku, prod_name, url, img, dot_skus, dot_pos`
//!   with `;`-joined SKU and position lists
//! - separated: `dot1_sku..dot4_sku` / `dot1_pos..dot4_pos` columns
//! - legacy: Chinese headers matched by substring, no positions
//!
//! Unlike the script-literal path, structural malformation here aborts
//! the whole parse: a spreadsheet with broken quoting is a bad export,
//! not a partially useful one.

use crate::error::ParseError;
use crate::models::core::{normalize_image, DotSku, Row};

/// Column headers probed for format detection.
const COL_PRODUCT_SKU: &str = "product_sku";
const COL_DOT_SKUS: &str = "dot_skus";
const COL_DOT_POS: &str = "dot_pos";
const COL_IMG: &str = "img";

/// Legacy header substrings. The url column is matched only when it does
/// not also mention a release link.
const LEGACY_DOT_SKU: &str = "白點商品";
const LEGACY_PROD_NAME: &str = "需修改品項";
const LEGACY_URL: &str = "前台連結";
const LEGACY_URL_EXCLUDE: &str = "release";

/// Separated-format dot column count (dot1..dot4).
const SEPARATED_DOT_COLUMNS: usize = 4;

/// Parse CSV text into combo rows.
///
/// `prod_name` and `url` are left empty in the non-legacy formats; the
/// metadata resolver backfills them from the product SKU afterwards.
pub fn parse_csv(text: &str) -> Result<Vec<Row>, ParseError> {
    let table = read_table(text)?;

    let has_consolidated = table.has_column(COL_DOT_SKUS) && table.has_column(COL_DOT_POS);
    let has_separated = (1..=SEPARATED_DOT_COLUMNS)
        .any(|i| table.has_column(&format!("dot{}_sku", i)));
    let has_new_format = table.has_column(COL_PRODUCT_SKU) || has_consolidated || has_separated;
    let has_img = table.has_column(COL_IMG);

    let mut rows = Vec::with_capacity(table.records.len());
    for record_index in 0..table.records.len() {
        let row = if has_new_format {
            let product_sku = table.get(record_index, COL_PRODUCT_SKU).trim().to_string();

            let dot_skus = if has_consolidated {
                parse_consolidated_dots(
                    table.get(record_index, COL_DOT_SKUS),
                    table.get(record_index, COL_DOT_POS),
                )
            } else {
                parse_separated_dots(&table, record_index)
            };

            let img = if has_img {
                normalize_image(table.get(record_index, COL_IMG))
            } else {
                None
            };

            Row {
                product_sku,
                prod_name: String::new(),
                url: String::new(),
                img,
                dot_skus,
            }
        } else {
            parse_legacy_record(&table, record_index)
        };

        rows.push(row);
    }

    Ok(rows)
}

/// Split a `;`-joined SKU list and its parallel position list.
fn parse_consolidated_dots(sku_list: &str, pos_list: &str) -> Vec<DotSku> {
    let skus: Vec<&str> = sku_list
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let positions: Vec<&str> = if pos_list.trim().is_empty() {
        Vec::new()
    } else {
        pos_list.split(';').map(str::trim).collect()
    };

    skus.iter()
        .enumerate()
        .map(|(i, sku)| {
            let (top, left) = split_position(positions.get(i).copied().unwrap_or(""));
            DotSku::with_position(*sku, top, left)
        })
        .collect()
}

fn parse_separated_dots(table: &CsvTable, record_index: usize) -> Vec<DotSku> {
    let mut dots = Vec::new();
    for i in 1..=SEPARATED_DOT_COLUMNS {
        let sku = table.get(record_index, &format!("dot{}_sku", i)).trim();
        if sku.is_empty() {
            continue;
        }
        let (top, left) = split_position(table.get(record_index, &format!("dot{}_pos", i)));
        dots.push(DotSku::with_position(sku, top, left));
    }
    dots
}

fn parse_legacy_record(table: &CsvTable, record_index: usize) -> Row {
    let mut dot_skus = Vec::new();
    let mut prod_name = String::new();
    let mut url = String::new();

    for (col, header) in table.header.iter().enumerate() {
        let value = table.get_by_index(record_index, col).trim();
        if header.contains(LEGACY_DOT_SKU) {
            if !value.is_empty() {
                dot_skus.push(DotSku::new(value));
            }
        } else if header.contains(LEGACY_PROD_NAME) {
            prod_name = value.to_string();
        } else if header.contains(LEGACY_URL) && !header.contains(LEGACY_URL_EXCLUDE) {
            url = value.to_string();
        }
    }

    Row {
        product_sku: String::new(),
        prod_name,
        url,
        img: None,
        dot_skus,
    }
}

/// Split a `"top:left"` position cell. A bare value with no colon is a
/// top-only position. Either side may be empty and stays empty.
pub fn split_position(pos: &str) -> (String, String) {
    let pos = pos.trim();
    if pos.is_empty() {
        return (String::new(), String::new());
    }
    match pos.split_once(':') {
        Some((top, left)) => (top.trim().to_string(), left.trim().to_string()),
        None => (pos.to_string(), String::new()),
    }
}

// ============================================================================
// Record reader
// ============================================================================

struct CsvTable {
    header: Vec<String>,
    records: Vec<Vec<String>>,
}

impl CsvTable {
    fn has_column(&self, name: &str) -> bool {
        self.header.iter().any(|h| h == name)
    }

    /// Field by column name; missing column or short record is "".
    fn get(&self, record_index: usize, name: &str) -> &str {
        match self.header.iter().position(|h| h == name) {
            Some(col) => self.get_by_index(record_index, col),
            None => "",
        }
    }

    fn get_by_index(&self, record_index: usize, col: usize) -> &str {
        self.records[record_index]
            .get(col)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Read the raw grid: BOM strip, delimiter detection, quote handling,
/// trimmed fields, blank lines skipped.
fn read_table(text: &str) -> Result<CsvTable, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text.lines().next().unwrap_or(""));
    let mut rows = split_rows(text, delimiter)?;

    // Drop records that are entirely blank.
    rows.retain(|fields| fields.iter().any(|f| !f.is_empty()));

    if rows.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let header = rows.remove(0);
    Ok(CsvTable {
        header,
        records: rows,
    })
}

/// Pick the delimiter that splits the header row into the most columns.
/// Ties resolve in the order comma, tab, semicolon.
fn detect_delimiter(header_line: &str) -> char {
    let candidates = [',', '\t', ';'];
    let mut best = ',';
    let mut best_count = 0usize;
    for candidate in candidates {
        let count = header_line.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Quote-aware row splitter. A quote opening a field starts a quoted
/// field; doubled quotes inside are literal. Reaching end of input while
/// still inside quotes is a structural error that aborts the parse.
fn split_rows(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, ParseError> {
    let mut rows = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut field_was_quoted = false;
    let mut in_quotes = false;
    let mut opened_at_line = 0usize;
    let mut line = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !field_was_quoted => {
                in_quotes = true;
                field_was_quoted = true;
                opened_at_line = line;
            }
            c if c == delimiter => {
                push_field(&mut record, &mut field, &mut field_was_quoted);
            }
            '\r' => {
                // Swallowed; the following '\n' ends the record.
            }
            '\n' => {
                line += 1;
                push_field(&mut record, &mut field, &mut field_was_quoted);
                rows.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote {
            line: opened_at_line,
        });
    }

    if !field.is_empty() || field_was_quoted || !record.is_empty() {
        push_field(&mut record, &mut field, &mut field_was_quoted);
        rows.push(record);
    }

    Ok(rows)
}

fn push_field(record: &mut Vec<String>, field: &mut String, field_was_quoted: &mut bool) {
    let value = if *field_was_quoted {
        std::mem::take(field)
    } else {
        std::mem::take(field).trim().to_string()
    };
    record.push(value);
    *field_was_quoted = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidated_with_partial_positions() {
        let csv = "product_sku,prod_name,url,img,dot_skus,dot_pos\n\
                   sku1,Product A,,,\"sku2;sku3\",\"50%:30%;:\"\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_sku, "sku1");
        assert_eq!(
            rows[0].dot_skus,
            vec![
                DotSku::with_position("sku2", "50%", "30%"),
                DotSku::with_position("sku3", "", ""),
            ]
        );
        // Name and URL come from the resolver, not the CSV.
        assert_eq!(rows[0].prod_name, "");
        assert_eq!(rows[0].url, "");
    }

    #[test]
    fn test_img_column_kept_only_when_present() {
        let with_img = "product_sku,img,dot_skus,dot_pos\nsku1,https://m/x.jpg,,\n";
        let rows = parse_csv(with_img).unwrap();
        assert_eq!(rows[0].img.as_deref(), Some("https://m/x.jpg"));

        let without = "product_sku,dot_skus,dot_pos\nsku1,,\n";
        let rows = parse_csv(without).unwrap();
        assert_eq!(rows[0].img, None);
    }

    #[test]
    fn test_separated_format() {
        let csv = "product_sku,dot1_sku,dot1_pos,dot2_sku,dot2_pos\n\
                   main,a,50%:30%,b,:25%\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(
            rows[0].dot_skus,
            vec![
                DotSku::with_position("a", "50%", "30%"),
                DotSku::with_position("b", "", "25%"),
            ]
        );
    }

    #[test]
    fn test_separated_format_bare_top() {
        let csv = "product_sku,dot1_sku,dot1_pos\nmain,a,50\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows[0].dot_skus, vec![DotSku::with_position("a", "50", "")]);
    }

    #[test]
    fn test_legacy_chinese_headers() {
        let csv = "需修改品項,前台連結,前台連結(release),白點商品1,白點商品2\n\
                   沙發組合,https://shop/x.html,https://release/x.html,d1,d2\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows[0].prod_name, "沙發組合");
        assert_eq!(rows[0].url, "https://shop/x.html");
        assert_eq!(rows[0].product_sku, "");
        assert_eq!(
            rows[0].dot_skus,
            vec![DotSku::new("d1"), DotSku::new("d2")]
        );
        // Legacy exports carry no positions.
        assert!(rows[0].dot_skus.iter().all(|d| !d.has_position()));
    }

    #[test]
    fn test_unterminated_quote_aborts() {
        let csv = "product_sku,dot_skus,dot_pos\nsku1,\"a;b,\n";
        assert_eq!(
            parse_csv(csv),
            Err(ParseError::UnterminatedQuote { line: 2 })
        );
    }

    #[test]
    fn test_quoted_field_with_delimiter_and_doubled_quote() {
        let csv = "product_sku,prod_name,dot_skus,dot_pos\n\
                   sku1,\"Sofa, 3-seat \"\"Lux\"\"\",,\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows[0].product_sku, "sku1");
    }

    #[test]
    fn test_tab_delimiter_detected() {
        let csv = "product_sku\tdot_skus\tdot_pos\nsku1\ta;b\t\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows[0].dot_skus.len(), 2);
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let csv = "\u{feff}product_sku,dot_skus,dot_pos\n\nsku1,,\n\n";
        let rows = parse_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_sku, "sku1");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_csv(""), Err(ParseError::MissingHeader));
    }
}
