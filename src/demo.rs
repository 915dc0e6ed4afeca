//! A small synthetic table to try the engine on.

use chrono::DateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{ColumnDef, DataSet, DataType, Value};

const SEED: u64 = 42;
// 2021-01-01 00:00:00 UTC
const START_TIMESTAMP: i64 = 1_609_459_200;
const CARDS: &[&str] = &["VISA", "AMEX", "DISCOVER", "MASTERCARD"];

/// Customer-like demo data with every built-in sdtype and some missing values.
///
/// Columns: `last_login` (datetime), `email_optin` (bool), `credit_card` (categorical),
/// `age` (integer) and `dollars_spent` (float). The same `num_rows` always yields the same
/// table.
pub fn get_demo(num_rows: usize) -> DataSet {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut last_login = Vec::with_capacity(num_rows);
    let mut email_optin = Vec::with_capacity(num_rows);
    let mut credit_card = Vec::with_capacity(num_rows);
    let mut age = Vec::with_capacity(num_rows);
    let mut dollars_spent = Vec::with_capacity(num_rows);

    for _ in 0..num_rows {
        let login = if rng.gen_bool(0.1) {
            Value::Null
        } else {
            let offset = rng.gen_range(0..365 * 24 * 3600);
            DateTime::from_timestamp(START_TIMESTAMP + offset, 0)
                .map_or(Value::Null, |dt| Value::Datetime(dt.naive_utc()))
        };
        last_login.push(login);

        email_optin.push(if rng.gen_bool(0.1) {
            Value::Null
        } else {
            Value::Bool(rng.gen_bool(0.6))
        });

        credit_card.push(Value::Utf8(CARDS[rng.gen_range(0..CARDS.len())].to_string()));
        age.push(Value::Int64(rng.gen_range(18..80)));

        dollars_spent.push(if rng.gen_bool(0.15) {
            Value::Null
        } else {
            let cents: i64 = rng.gen_range(100..100_000);
            Value::Float64(cents as f64 / 100.0)
        });
    }

    DataSet::from_columns(vec![
        (ColumnDef::new("last_login", DataType::Datetime), last_login),
        (ColumnDef::new("email_optin", DataType::Bool), email_optin),
        (ColumnDef::new("credit_card", DataType::Utf8), credit_card),
        (ColumnDef::new("age", DataType::Int64), age),
        (ColumnDef::new("dollars_spent", DataType::Float64), dollars_spent),
    ])
}
