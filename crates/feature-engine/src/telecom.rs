//! Telecom-customer churn record and encoder

use crate::error::EncodeError;
use crate::features::FeatureVector;
use crate::raw::{read_category, read_float, read_int, RawRecord};
use crate::schema::{CategoricalField, FieldKey, Schema, GENDER};
use crate::Domain;
use serde::{Deserialize, Serialize};
use tracing::debug;

const PAPERLESS_BILLING: FieldKey = FieldKey::new("paperless_billing", &["PaperlessBilling"]);
const SENIOR_CITIZEN: FieldKey = FieldKey::new("senior_citizen", &["SeniorCitizen"]);
const STREAMING_TV: FieldKey = FieldKey::new("streaming_tv", &["StreamingTV"]);
const STREAMING_MOVIES: FieldKey = FieldKey::new("streaming_movies", &["StreamingMovies"]);
const MULTIPLE_LINES: FieldKey = FieldKey::new("multiple_lines", &["MultipleLines"]);
const PHONE_SERVICE: FieldKey = FieldKey::new("phone_service", &["PhoneService"]);
const DEVICE_PROTECTION: FieldKey = FieldKey::new("device_protection", &["DeviceProtection"]);
const ONLINE_BACKUP: FieldKey = FieldKey::new("online_backup", &["OnlineBackup"]);
const PARTNER: FieldKey = FieldKey::new("partner", &["Partner"]);
const DEPENDENTS: FieldKey = FieldKey::new("dependents", &["Dependents"]);
const TECH_SUPPORT: FieldKey = FieldKey::new("tech_support", &["TechSupport"]);
const ONLINE_SECURITY: FieldKey = FieldKey::new("online_security", &["OnlineSecurity"]);
const MONTHLY_CHARGES: FieldKey = FieldKey::new("monthly_charges", &["MonthlyCharges"]);
const TOTAL_CHARGES: FieldKey = FieldKey::new("total_charges", &["TotalCharges"]);
const TENURE: FieldKey = FieldKey::new("tenure", &["Tenure"]);

const CONTRACT: CategoricalField = CategoricalField {
    key: FieldKey::new("contract", &["Contract"]),
    categories: &["Month-to-month", "One year", "Two year"],
};

const INTERNET_SERVICE: CategoricalField = CategoricalField {
    key: FieldKey::new("internet_service", &["InternetService"]),
    categories: &["Fiber optic", "DSL", "No"],
};

const PAYMENT_METHOD: CategoricalField = CategoricalField {
    key: FieldKey::new("payment_method", &["PaymentMethod"]),
    categories: &[
        "Electronic check",
        "Mailed check",
        "Bank transfer (automatic)",
        "Credit card (automatic)",
    ],
};

/// Layout of the 27-wide telecom vector
pub static TELECOM_SCHEMA: Schema = Schema {
    domain: Domain::Telecom,
    numeric: &[
        PAPERLESS_BILLING,
        SENIOR_CITIZEN,
        STREAMING_TV,
        STREAMING_MOVIES,
        MULTIPLE_LINES,
        PHONE_SERVICE,
        DEVICE_PROTECTION,
        ONLINE_BACKUP,
        PARTNER,
        DEPENDENTS,
        TECH_SUPPORT,
        ONLINE_SECURITY,
        MONTHLY_CHARGES,
        TOTAL_CHARGES,
        TENURE,
    ],
    categorical: &[CONTRACT, INTERNET_SERVICE, PAYMENT_METHOD, GENDER],
};

/// Typed telecom-customer attributes. Service flags are 0 or 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelecomCustomerRecord {
    pub paperless_billing: i64,
    pub senior_citizen: i64,
    pub streaming_tv: i64,
    pub streaming_movies: i64,
    pub multiple_lines: i64,
    pub phone_service: i64,
    pub device_protection: i64,
    pub online_backup: i64,
    pub partner: i64,
    pub dependents: i64,
    pub tech_support: i64,
    pub online_security: i64,
    pub monthly_charges: f64,
    pub total_charges: f64,
    /// Months as a customer
    pub tenure: i64,
    pub contract: String,
    pub internet_service: String,
    pub payment_method: String,
    pub gender: String,
}

impl TelecomCustomerRecord {
    /// Validate a raw record into typed fields, first failure wins
    pub fn from_raw(raw: &RawRecord) -> Result<Self, EncodeError> {
        Ok(Self {
            paperless_billing: read_int(raw, &PAPERLESS_BILLING)?,
            senior_citizen: read_int(raw, &SENIOR_CITIZEN)?,
            streaming_tv: read_int(raw, &STREAMING_TV)?,
            streaming_movies: read_int(raw, &STREAMING_MOVIES)?,
            multiple_lines: read_int(raw, &MULTIPLE_LINES)?,
            phone_service: read_int(raw, &PHONE_SERVICE)?,
            device_protection: read_int(raw, &DEVICE_PROTECTION)?,
            online_backup: read_int(raw, &ONLINE_BACKUP)?,
            partner: read_int(raw, &PARTNER)?,
            dependents: read_int(raw, &DEPENDENTS)?,
            tech_support: read_int(raw, &TECH_SUPPORT)?,
            online_security: read_int(raw, &ONLINE_SECURITY)?,
            monthly_charges: read_float(raw, &MONTHLY_CHARGES)?,
            total_charges: read_float(raw, &TOTAL_CHARGES)?,
            tenure: read_int(raw, &TENURE)?,
            contract: read_category(raw, &CONTRACT.key)?,
            internet_service: read_category(raw, &INTERNET_SERVICE.key)?,
            payment_method: read_category(raw, &PAYMENT_METHOD.key)?,
            gender: read_category(raw, &GENDER.key)?,
        })
    }

    /// Assemble the feature vector in `TELECOM_SCHEMA` order
    pub fn encode(&self) -> FeatureVector {
        let mut values = Vec::with_capacity(TELECOM_SCHEMA.dimension());
        values.extend(
            [
                self.paperless_billing,
                self.senior_citizen,
                self.streaming_tv,
                self.streaming_movies,
                self.multiple_lines,
                self.phone_service,
                self.device_protection,
                self.online_backup,
                self.partner,
                self.dependents,
                self.tech_support,
                self.online_security,
            ]
            .map(|flag| flag as f64),
        );
        values.push(self.monthly_charges);
        values.push(self.total_charges);
        values.push(self.tenure as f64);
        values.extend(CONTRACT.encode(&self.contract));
        values.extend(INTERNET_SERVICE.encode(&self.internet_service));
        values.extend(PAYMENT_METHOD.encode(&self.payment_method));
        values.extend(GENDER.encode(&self.gender));

        FeatureVector::assembled(Domain::Telecom, values)
    }
}

/// Encode a raw telecom record into its 27-wide feature vector
pub fn encode_telecom(record: &RawRecord) -> Result<FeatureVector, EncodeError> {
    let typed = TelecomCustomerRecord::from_raw(record)?;
    debug!(
        "Encoding telecom record: contract={:?}, internet_service={:?}, payment_method={:?}",
        typed.contract, typed.internet_service, typed.payment_method
    );
    Ok(typed.encode())
}
