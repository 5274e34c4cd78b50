//! Range Validator for Customer Records

use crate::error::ValidationError;
use feature_engine::{BankCustomerRecord, TelecomCustomerRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive `(min, max)` bounds
pub type Range = (f64, f64);

const UNBOUNDED: f64 = f64::MAX;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Credit score valid range
    pub credit_score_range: Range,
    /// Customer age valid range (years)
    pub age_range: Range,
    /// Bank tenure valid range (years)
    pub bank_tenure_range: Range,
    /// Number of bank products held
    pub products_range: Range,
    /// Satisfaction survey score
    pub satisfaction_range: Range,
    /// Balances, salaries, charges and loyalty points
    pub amount_range: Range,
    /// Telecom tenure valid range (months)
    pub telecom_tenure_range: Range,
    /// Binary indicator flags
    pub flag_range: Range,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            credit_score_range: (300.0, 900.0),
            age_range: (18.0, 120.0),
            bank_tenure_range: (0.0, 100.0),
            products_range: (1.0, 4.0),
            satisfaction_range: (1.0, 5.0),
            amount_range: (0.0, UNBOUNDED),
            telecom_tenure_range: (0.0, UNBOUNDED),
            flag_range: (0.0, 1.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create a result from the errors collected over `fields_checked` fields
    pub fn from_errors(fields_checked: usize, errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            return Self::valid(fields_checked);
        }
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Comma-separated error messages
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Collects range failures over one record
struct Checks<'a> {
    validator: &'a Validator,
    errors: Vec<ValidationError>,
    checked: usize,
}

impl Checks<'_> {
    fn check(&mut self, field: &'static str, value: f64, range: Range) {
        self.checked += 1;
        if let Err(e) = self.validator.validate_range(field, value, range) {
            self.errors.push(e);
        }
    }

    fn finish(self) -> ValidationResult {
        ValidationResult::from_errors(self.checked, self.errors)
    }
}

/// Plausibility validator for decoded customer records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: Range,
    ) -> Result<(), ValidationError> {
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    fn checks(&self) -> Checks<'_> {
        Checks {
            validator: self,
            errors: Vec::new(),
            checked: 0,
        }
    }

    /// Validate every bounded field of a bank record
    pub fn validate_bank(&self, record: &BankCustomerRecord) -> ValidationResult {
        let c = &self.config;
        let mut checks = self.checks();

        checks.check("credit_score", record.credit_score as f64, c.credit_score_range);
        checks.check("age", record.age as f64, c.age_range);
        checks.check("tenure", record.tenure as f64, c.bank_tenure_range);
        checks.check("balance", record.balance, c.amount_range);
        checks.check("num_of_products", record.num_of_products as f64, c.products_range);
        checks.check("has_credit_card", record.has_credit_card as f64, c.flag_range);
        checks.check("is_active_member", record.is_active_member as f64, c.flag_range);
        checks.check("estimated_salary", record.estimated_salary, c.amount_range);
        checks.check("satisfaction_score", record.satisfaction_score as f64, c.satisfaction_range);
        checks.check("points_earned", record.points_earned as f64, c.amount_range);

        let result = checks.finish();
        debug!(
            "Validated bank record: {} fields, {} errors",
            result.fields_checked,
            result.errors.len()
        );
        result
    }

    /// Validate every bounded field of a telecom record
    pub fn validate_telecom(&self, record: &TelecomCustomerRecord) -> ValidationResult {
        let c = &self.config;
        let mut checks = self.checks();

        let flags = [
            ("paperless_billing", record.paperless_billing),
            ("senior_citizen", record.senior_citizen),
            ("streaming_tv", record.streaming_tv),
            ("streaming_movies", record.streaming_movies),
            ("multiple_lines", record.multiple_lines),
            ("phone_service", record.phone_service),
            ("device_protection", record.device_protection),
            ("online_backup", record.online_backup),
            ("partner", record.partner),
            ("dependents", record.dependents),
            ("tech_support", record.tech_support),
            ("online_security", record.online_security),
        ];
        for (field, flag) in flags {
            checks.check(field, flag as f64, c.flag_range);
        }
        checks.check("monthly_charges", record.monthly_charges, c.amount_range);
        checks.check("total_charges", record.total_charges, c.amount_range);
        checks.check("tenure", record.tenure as f64, c.telecom_tenure_range);

        let result = checks.finish();
        debug!(
            "Validated telecom record: {} fields, {} errors",
            result.fields_checked,
            result.errors.len()
        );
        result
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> BankCustomerRecord {
        BankCustomerRecord {
            credit_score: 650,
            age: 40,
            tenure: 3,
            balance: 10_000.0,
            num_of_products: 2,
            has_credit_card: 1,
            is_active_member: 1,
            estimated_salary: 50_000.0,
            satisfaction_score: 4,
            points_earned: 300,
            gender: "Female".to_string(),
            card_type: "GOLD".to_string(),
        }
    }

    fn telecom() -> TelecomCustomerRecord {
        TelecomCustomerRecord {
            paperless_billing: 1,
            senior_citizen: 0,
            streaming_tv: 0,
            streaming_movies: 0,
            multiple_lines: 0,
            phone_service: 1,
            device_protection: 0,
            online_backup: 0,
            partner: 0,
            dependents: 0,
            tech_support: 0,
            online_security: 0,
            monthly_charges: 19.99,
            total_charges: 480.0,
            tenure: 24,
            contract: "Two year".to_string(),
            internet_service: "No".to_string(),
            payment_method: "Mailed check".to_string(),
            gender: "Male".to_string(),
        }
    }

    #[test]
    fn test_valid_bank_record() {
        let result = Validator::default().validate_bank(&bank());
        assert!(result.valid);
        assert_eq!(result.fields_checked, 10);
    }

    #[test]
    fn test_bank_boundaries_are_inclusive() {
        let record = BankCustomerRecord {
            credit_score: 300,
            age: 18,
            num_of_products: 4,
            satisfaction_score: 5,
            balance: 0.0,
            ..bank()
        };
        assert!(Validator::default().validate_bank(&record).valid);
    }

    #[test]
    fn test_collects_every_bank_error() {
        let record = BankCustomerRecord {
            credit_score: 1200,
            age: 12,
            has_credit_card: 2,
            balance: -5.0,
            ..bank()
        };
        let result = Validator::default().validate_bank(&record);
        assert!(!result.valid);
        let fields: Vec<_> = result.errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["credit_score", "age", "balance", "has_credit_card"]);
        assert!(result.summary().contains("credit_score value 1200"));
    }

    #[test]
    fn test_telecom_flags() {
        let validator = Validator::default();
        assert!(validator.validate_telecom(&telecom()).valid);

        let record = TelecomCustomerRecord {
            streaming_tv: 3,
            ..telecom()
        };
        let result = validator.validate_telecom(&record);
        assert_eq!(result.fields_checked, 15);
        assert_eq!(
            result.errors,
            vec![ValidationError::OutOfRange {
                field: "streaming_tv",
                value: 3.0,
                min: 0.0,
                max: 1.0,
            }]
        );
    }

    proptest::proptest! {
        #[test]
        fn in_range_bank_records_pass(
            credit_score in 300i64..=900,
            age in 18i64..=120,
            num_of_products in 1i64..=4,
            satisfaction_score in 1i64..=5,
            flag in 0i64..=1,
        ) {
            let record = BankCustomerRecord {
                credit_score,
                age,
                num_of_products,
                satisfaction_score,
                has_credit_card: flag,
                is_active_member: 1 - flag,
                ..bank()
            };
            proptest::prop_assert!(Validator::default().validate_bank(&record).valid);
        }
    }

    #[test]
    fn test_negative_charges() {
        let record = TelecomCustomerRecord {
            total_charges: -1.0,
            ..telecom()
        };
        assert!(!Validator::default().validate_telecom(&record).valid);
    }
}
