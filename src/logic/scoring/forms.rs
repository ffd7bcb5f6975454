//! Input Forms
//!
//! Chuẩn hóa dữ liệu form trước khi gửi backend. The backend validates
//! again; these checks only catch what the operator can fix locally,
//! with messages naming the offending field.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::{PaymentRequest, SampleColumns, ScoringError};

/// Raw payment form as typed by the operator. The card number may still
/// contain the display grouping spaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub amount: f64,
}

impl PaymentForm {
    /// Validates the form and strips display formatting, producing the
    /// request body for POST /predict.
    pub fn normalize(&self) -> Result<PaymentRequest, ScoringError> {
        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScoringError::InvalidForm(
                "card number must be 16 digits".to_string(),
            ));
        }

        let expiry: Vec<char> = self.expiry_date.chars().collect();
        let shape_ok = expiry.len() == 5
            && expiry[2] == '/'
            && expiry[0].is_ascii_digit()
            && expiry[1].is_ascii_digit()
            && expiry[3].is_ascii_digit()
            && expiry[4].is_ascii_digit();
        if !shape_ok {
            return Err(ScoringError::InvalidForm(
                "expiry date must use the MM/YY format".to_string(),
            ));
        }
        let month = (expiry[0] as u8 - b'0') * 10 + (expiry[1] as u8 - b'0');
        if !(1..=12).contains(&month) {
            return Err(ScoringError::InvalidForm(format!(
                "expiry month {:02} is out of range",
                month
            )));
        }

        if self.cvv.len() != 3 || !self.cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScoringError::InvalidForm("CVV must be 3 digits".to_string()));
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ScoringError::InvalidForm(
                "amount must be greater than zero".to_string(),
            ));
        }

        Ok(PaymentRequest {
            card_number: digits,
            expiry_date: self.expiry_date.clone(),
            cvv: self.cvv.clone(),
            amount: self.amount,
        })
    }
}

/// Feature vector for the expert-mode form: raw dataset columns.
#[derive(Debug, Clone)]
pub struct TransactionFeatures {
    pub time: f64,
    pub amount: f64,
    /// PCA components V1..V28, in order.
    pub components: [f64; 28],
}

impl TransactionFeatures {
    /// Flat JSON body for POST /predict-features, keyed the way the
    /// backend's dataframe columns are named.
    pub fn to_payload(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("Time".to_string(), json!(self.time));
        for (i, value) in self.components.iter().enumerate() {
            map.insert(format!("V{}", i + 1), json!(*value));
        }
        map.insert("Amount".to_string(), json!(self.amount));
        serde_json::Value::Object(map)
    }

    /// Pre-fills the form from a backend sample. Missing columns become
    /// 0.0 and the ground-truth `Class` column is ignored.
    pub fn from_sample(columns: &SampleColumns) -> Self {
        let mut components = [0.0_f64; 28];
        for (i, slot) in components.iter_mut().enumerate() {
            let key = format!("V{}", i + 1);
            *slot = columns.get(key.as_str()).copied().unwrap_or(0.0);
        }

        Self {
            time: columns.get("Time").copied().unwrap_or(0.0),
            amount: columns.get("Amount").copied().unwrap_or(0.0),
            components,
        }
    }
}

/// Reads a CSV picked for batch scoring. The backend only accepts `.csv`
/// uploads, so reject anything else before the network round trip.
pub fn read_csv_upload(path: &Path) -> Result<(String, Vec<u8>), ScoringError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    if !file_name.ends_with(".csv") {
        return Err(ScoringError::InvalidForm(format!(
            "'{}' is not a .csv file",
            file_name
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        ScoringError::InvalidForm(format!("cannot read '{}': {}", path.display(), e))
    })?;
    if bytes.is_empty() {
        return Err(ScoringError::InvalidForm(format!(
            "'{}' is empty",
            file_name
        )));
    }

    Ok((file_name, bytes))
}

// ============================================================================
// TESTS
// ============================================================================
