//! Bank-customer churn record and encoder

use crate::error::EncodeError;
use crate::features::FeatureVector;
use crate::raw::{read_category, read_float, read_int, RawRecord};
use crate::schema::{CategoricalField, FieldKey, Schema, GENDER};
use crate::Domain;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CREDIT_SCORE: FieldKey = FieldKey::new("credit_score", &["CreditScore"]);
const AGE: FieldKey = FieldKey::new("age", &["Age"]);
const TENURE: FieldKey = FieldKey::new("tenure", &["Tenure"]);
const BALANCE: FieldKey = FieldKey::new("balance", &["Balance"]);
const NUM_OF_PRODUCTS: FieldKey = FieldKey::new("num_of_products", &["NumOfProducts"]);
const HAS_CREDIT_CARD: FieldKey = FieldKey::new("has_credit_card", &["HasCrCard", "has_cr_card"]);
const IS_ACTIVE_MEMBER: FieldKey = FieldKey::new("is_active_member", &["IsActiveMember"]);
const ESTIMATED_SALARY: FieldKey = FieldKey::new("estimated_salary", &["EstimatedSalary"]);
const SATISFACTION_SCORE: FieldKey = FieldKey::new("satisfaction_score", &["SatisfactionScore"]);
const POINTS_EARNED: FieldKey = FieldKey::new("points_earned", &["PointsEarned", "point_earned"]);

/// Card tier
const CARD_TYPE: CategoricalField = CategoricalField {
    key: FieldKey::new("card_type", &["CardType"]),
    categories: &["DIAMOND", "GOLD", "SILVER", "PLATINUM"],
};

/// Layout of the 16-wide bank vector
pub static BANK_SCHEMA: Schema = Schema {
    domain: Domain::Bank,
    numeric: &[
        CREDIT_SCORE,
        AGE,
        TENURE,
        BALANCE,
        NUM_OF_PRODUCTS,
        HAS_CREDIT_CARD,
        IS_ACTIVE_MEMBER,
        ESTIMATED_SALARY,
        SATISFACTION_SCORE,
        POINTS_EARNED,
    ],
    categorical: &[GENDER, CARD_TYPE],
};

/// Typed bank-customer attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankCustomerRecord {
    pub credit_score: i64,
    pub age: i64,
    /// Years with the bank
    pub tenure: i64,
    pub balance: f64,
    pub num_of_products: i64,
    /// 0 or 1
    pub has_credit_card: i64,
    /// 0 or 1
    pub is_active_member: i64,
    pub estimated_salary: f64,
    pub satisfaction_score: i64,
    pub points_earned: i64,
    /// Expected `Male` or `Female`
    pub gender: String,
    /// Expected `DIAMOND`, `GOLD`, `SILVER` or `PLATINUM`
    pub card_type: String,
}

impl BankCustomerRecord {
    /// Validate a raw record into typed fields.
    ///
    /// Fields are checked in schema order; the first failure is returned.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, EncodeError> {
        Ok(Self {
            credit_score: read_int(raw, &CREDIT_SCORE)?,
            age: read_int(raw, &AGE)?,
            tenure: read_int(raw, &TENURE)?,
            balance: read_float(raw, &BALANCE)?,
            num_of_products: read_int(raw, &NUM_OF_PRODUCTS)?,
            has_credit_card: read_int(raw, &HAS_CREDIT_CARD)?,
            is_active_member: read_int(raw, &IS_ACTIVE_MEMBER)?,
            estimated_salary: read_float(raw, &ESTIMATED_SALARY)?,
            satisfaction_score: read_int(raw, &SATISFACTION_SCORE)?,
            points_earned: read_int(raw, &POINTS_EARNED)?,
            gender: read_category(raw, &GENDER.key)?,
            card_type: read_category(raw, &CARD_TYPE.key)?,
        })
    }

    /// Assemble the feature vector in `BANK_SCHEMA` order
    pub fn encode(&self) -> FeatureVector {
        let mut values = Vec::with_capacity(BANK_SCHEMA.dimension());
        values.extend([
            self.credit_score as f64,
            self.age as f64,
            self.tenure as f64,
            self.balance,
            self.num_of_products as f64,
            self.has_credit_card as f64,
            self.is_active_member as f64,
            self.estimated_salary,
            self.satisfaction_score as f64,
            self.points_earned as f64,
        ]);
        values.extend(GENDER.encode(&self.gender));
        values.extend(CARD_TYPE.encode(&self.card_type));

        FeatureVector::assembled(Domain::Bank, values)
    }
}

/// Encode a raw bank record into its 16-wide feature vector
pub fn encode_bank(record: &RawRecord) -> Result<FeatureVector, EncodeError> {
    let typed = BankCustomerRecord::from_raw(record)?;
    debug!(
        "Encoding bank record: gender={:?}, card_type={:?}",
        typed.gender, typed.card_type
    );
    Ok(typed.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> RawRecord {
        let value = json!({
            "credit_score": 650,
            "age": 40,
            "tenure": 3,
            "balance": 10000.0,
            "num_of_products": 2,
            "has_credit_card": 1,
            "is_active_member": 1,
            "estimated_salary": 50000.0,
            "satisfaction_score": 4,
            "points_earned": 300,
            "gender": "Female",
            "card_type": "GOLD"
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_reference_vector() {
        let vector = encode_bank(&sample()).unwrap();
        assert_eq!(
            vector.values(),
            &[
                650.0, 40.0, 3.0, 10000.0, 2.0, 1.0, 1.0, 50000.0, 4.0, 300.0, 0.0, 1.0, 0.0, 1.0,
                0.0, 0.0
            ]
        );
        assert_eq!(vector.domain(), Domain::Bank);
    }

    #[test]
    fn test_wire_names_accepted() {
        let value = json!({
            "CreditScore": "650",
            "Age": "40",
            "Tenure": "3",
            "Balance": "10000.0",
            "NumOfProducts": "2",
            "HasCrCard": "1",
            "IsActiveMember": "1",
            "EstimatedSalary": "50000",
            "SatisfactionScore": "4",
            "PointsEarned": "300",
            "Gender": "Female",
            "CardType": "GOLD"
        });
        let raw: RawRecord = serde_json::from_value(value).unwrap();
        assert_eq!(encode_bank(&raw).unwrap(), encode_bank(&sample()).unwrap());
    }

    #[test]
    fn test_short_front_end_names_accepted() {
        let mut raw = sample();
        let card = raw.remove("has_credit_card").unwrap();
        let points = raw.remove("points_earned").unwrap();
        raw.insert("has_cr_card".to_string(), card);
        raw.insert("point_earned".to_string(), points);
        raw.insert("total_charges".to_string(), json!(0));
        assert_eq!(encode_bank(&raw).unwrap(), encode_bank(&sample()).unwrap());
    }

    #[test]
    fn test_every_field_is_required() {
        for key in BANK_SCHEMA.required_keys() {
            let mut raw = sample();
            raw.remove(key.name);
            assert_eq!(encode_bank(&raw), Err(EncodeError::MissingField(key.name)));
        }
    }

    #[test]
    fn test_non_numeric_balance() {
        let mut raw = sample();
        raw.insert("balance".to_string(), Value::from("lots"));
        assert_eq!(
            encode_bank(&raw),
            Err(EncodeError::TypeConversion {
                field: "balance",
                value: "\"lots\"".to_string(),
            })
        );
    }

    #[test]
    fn test_unmatched_gender_encodes_all_zero() {
        let mut raw = sample();
        raw.insert("gender".to_string(), Value::from("Other"));
        let vector = encode_bank(&raw).unwrap();
        assert_eq!(&vector.values()[10..12], &[0.0, 0.0]);
        assert_eq!(vector.len(), 16);
    }

    #[test]
    fn test_feature_names_follow_layout() {
        let names = BANK_SCHEMA.feature_names();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "credit_score");
        assert_eq!(names[9], "points_earned");
        assert_eq!(names[10], "gender_Male");
        assert_eq!(names[15], "card_type_PLATINUM");
    }
}
