// law_ingestor/src/identity.rs
// Point identity assignment.

use uuid::Uuid;

use crate::record::{Record, fields};

/// Namespace for natural-key point ids.
const NATURAL_KEY_NAMESPACE: Uuid = Uuid::from_u128(0x3b6f_9d24_5a1e_4c8b_9f07_2e61_d4a8_c530,);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum,)]
pub enum IdentityStrategy {
    /// Fresh random id per write. Re-runs add duplicate entries.
    #[default]
    Random,
    /// Id derived from act name and section ids. Re-runs overwrite.
    NaturalKey,
}

impl IdentityStrategy {
    pub fn assign(&self, record: &Record, composed: &str,) -> Uuid {
        match self {
            IdentityStrategy::Random => Uuid::new_v4(),
            IdentityStrategy::NaturalKey => {
                let parts = [
                    record.get(fields::ACT_NAME,),
                    record.get(fields::SECTION_EN,),
                    record.get(fields::SECTION_HI,),
                ];
                if parts.iter().all(|p| p.is_empty(),) {
                    Uuid::new_v5(&NATURAL_KEY_NAMESPACE, composed.as_bytes(),)
                } else {
                    Uuid::new_v5(&NATURAL_KEY_NAMESPACE, parts.join("\u{1f}",).as_bytes(),)
                }
            },
        }
    }
}
