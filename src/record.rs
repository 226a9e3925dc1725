// law_ingestor/src/record.rs
// The structured law-section record and its field vocabulary.

use std::collections::{BTreeMap, HashMap};

/// Column names understood by the pipeline.
pub mod fields {
    pub const ACT_NAME: &str = "act_name";
    pub const ACT_NAME_HI: &str = "act_name_hi";
    pub const SECTION_EN: &str = "section_en";
    pub const SECTION_HI: &str = "section_hi";
    /// Primary text. A record without it is never embedded.
    pub const LAW_TEXT: &str = "law_text";
    pub const LAW_TEXT_HI: &str = "law_text_hi";
    pub const EXPLANATION_EN: &str = "explanation_en";
    pub const EXPLANATION_HI: &str = "explanation_hi";
    pub const KEYWORDS_EN: &str = "keywords_en";
    pub const KEYWORDS_HI: &str = "keywords_hi";
    pub const RELATED_CASES: &str = "related_cases";
    pub const CATEGORY: &str = "category";
    pub const SOURCE_URL: &str = "source_url";
}

/// Display/filter fields stored alongside each vector.
pub type Payload = BTreeMap<String, String,>;

/// One law section as delivered by the record source.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct Record {
    values: HashMap<String, String,>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String,>, value: impl Into<String,>,) {
        self.values.insert(field.into(), value.into(),);
    }

    /// Trimmed value of `field`, or `""` when the field is absent.
    pub fn get(&self, field: &str,) -> &str {
        self.values.get(field,).map(|v| v.trim(),).unwrap_or("",)
    }

    pub fn len(&self,) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self,) -> bool {
        self.values.is_empty()
    }

    /// The eligibility gate: `Some` only for a non-blank primary text.
    pub fn primary_text(&self,) -> Option<&str,> {
        let text = self.get(fields::LAW_TEXT,);
        (!text.is_empty()).then_some(text,)
    }

    /// Human readable identifier used in log lines.
    pub fn label(&self,) -> String {
        let act = self.get(fields::ACT_NAME,);
        let section = self.section();
        match (act.is_empty(), section.is_empty(),) {
            (false, false,) => format!("{} - Section {}", act, section),
            (false, true,) => act.to_string(),
            (true, false,) => format!("Section {}", section),
            (true, true,) => "<unlabelled record>".to_string(),
        }
    }

    /// English section identifier, falling back to the Hindi one.
    pub fn section(&self,) -> &str {
        let en = self.get(fields::SECTION_EN,);
        if en.is_empty() { self.get(fields::SECTION_HI,) } else { en }
    }

    /// Fields written to the index next to the vector.
    pub fn payload(&self,) -> Payload {
        [
            ("act_name", self.get(fields::ACT_NAME,),),
            ("section", self.section(),),
            ("law_text", self.get(fields::LAW_TEXT,),),
            ("explanation", self.get(fields::EXPLANATION_EN,),),
            ("category", self.get(fields::CATEGORY,),),
            ("source_url", self.get(fields::SOURCE_URL,),),
        ]
        .into_iter()
        .map(|(k, v,)| (k.to_string(), v.to_string(),),)
        .collect()
    }
}

impl<K, V,> FromIterator<(K, V,),> for Record
where
    K: Into<String,>,
    V: Into<String,>,
{
    fn from_iter<I: IntoIterator<Item = (K, V,),>,>(iter: I,) -> Self {
        let mut record = Record::new();
        for (k, v,) in iter {
            record.insert(k, v,);
        }
        record
    }
}
