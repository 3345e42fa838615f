//! Common test utilities for ab-experiment tests

use ab_core::{Column, Table};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Helper function to create a user table where `zero_share` of users have
/// no revenue
pub fn create_user_table(n_users: usize, zero_share: f64, seed: u64) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut revenue = Vec::with_capacity(n_users);
    let mut transactions = Vec::with_capacity(n_users);
    for _ in 0..n_users {
        if rng.gen::<f64>() < zero_share {
            revenue.push(0.0);
            transactions.push(0.0);
        } else {
            revenue.push((rng.gen::<f64>() * 6.0).exp());
            transactions.push(f64::from(rng.gen_range(1u32..6)));
        }
    }

    Table::new(vec![
        Column::from_values("fullVisitorId", (0..n_users).map(|i| format!("user{i:04}"))),
        Column::from_values("totalTransactionRevenue", revenue),
        Column::from_values("transactions", transactions),
        Column::from_values(
            "bought_item_x",
            (0..n_users).map(|i| if i % 3 == 0 { 1.0 } else { 0.0 }),
        ),
    ])
    .unwrap()
}

/// Helper function to collect a label column as strings
pub fn labels(table: &Table, column: &str) -> Vec<String> {
    table
        .column(column)
        .unwrap()
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect()
}
