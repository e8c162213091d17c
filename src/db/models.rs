use crate::date::normalize_date;
use crate::types::ExtractedFields;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted row of `identity_documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct IdentityRecord {
    pub id: i64,
    pub document_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address: String,
}

/// Insert payload: extracted fields with the date already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdentityRecord {
    pub document_number: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub address: String,
}

impl From<&ExtractedFields> for NewIdentityRecord {
    fn from(f: &ExtractedFields) -> Self {
        Self {
            document_number: f.document_number.clone(),
            full_name: f.full_name.clone(),
            date_of_birth: normalize_date(Some(f.date_of_birth.as_str())),
            gender: f.gender.clone(),
            address: f.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_normalizes_date_of_birth() {
        let fields = ExtractedFields {
            full_name: "A B".to_string(),
            gender: "F".to_string(),
            date_of_birth: "15/08/1987".to_string(),
            document_number: "1234 5678 9012".to_string(),
            address: "X".to_string(),
        };
        let rec = NewIdentityRecord::from(&fields);
        assert_eq!(rec.date_of_birth, NaiveDate::from_ymd_opt(1987, 8, 15));
        assert_eq!(rec.document_number, "1234 5678 9012");

        let unknown = ExtractedFields {
            date_of_birth: "Year of Birth: 1987".to_string(),
            ..fields
        };
        assert_eq!(NewIdentityRecord::from(&unknown).date_of_birth, None);
    }
}
