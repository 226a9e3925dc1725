// law_ingestor/src/compose.rs
// Builds the canonical text that gets embedded for a record.

use crate::record::{Record, fields};

/// Label/field pairs in the order they appear in the composed text.
const LAYOUT: [(&str, &str,); 11] = [
    ("Act", fields::ACT_NAME,),
    ("Act (Hindi)", fields::ACT_NAME_HI,),
    ("Section", fields::SECTION_EN,),
    ("Section (Hindi)", fields::SECTION_HI,),
    ("Law Text", fields::LAW_TEXT,),
    ("Law Text (Hindi)", fields::LAW_TEXT_HI,),
    ("Explanation", fields::EXPLANATION_EN,),
    ("Explanation (Hindi)", fields::EXPLANATION_HI,),
    ("Keywords", fields::KEYWORDS_EN,),
    ("Keywords (Hindi)", fields::KEYWORDS_HI,),
    ("Related Cases", fields::RELATED_CASES,),
];

/// Renders `record` as one `Label: value` line per field.
///
/// Every label is always emitted; absent fields get an empty value so the
/// shape of the text never depends on which columns a row happens to carry.
pub fn compose(record: &Record,) -> String {
    LAYOUT
        .iter()
        .map(|(label, field,)| format!("{}: {}", label, record.get(field,)),)
        .collect::<Vec<_,>>()
        .join("\n",)
}
