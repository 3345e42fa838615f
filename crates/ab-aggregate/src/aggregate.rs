//! Session-to-user aggregation

use crate::classify::{classify_columns, parse_datetime_columns};
use crate::config::AggregationConfig;
use crate::strategy::MultiGroupPolicy;
use ab_core::{Column, Error, Result, Table, Value, ValueKey};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Row indices per user id key, users in first-appearance order
fn rows_by_user(ids: &[Value]) -> (Vec<ValueKey>, HashMap<ValueKey, Vec<usize>>) {
    let mut order = Vec::new();
    let mut rows: HashMap<ValueKey, Vec<usize>> = HashMap::new();
    for (i, id) in ids.iter().enumerate() {
        if let Some(key) = id.key() {
            rows.entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(i);
        }
    }
    (order, rows)
}

/// Rows to keep after resolving users seen under more than one group
fn resolve_multi_group(
    table: &Table,
    user_id_column: &str,
    group_column: &str,
    policy: MultiGroupPolicy,
) -> Result<Table> {
    let ids = table.column(user_id_column)?.values();
    let groups = table.column(group_column)?.values();
    let (users, rows) = rows_by_user(ids);

    let mut keep = vec![false; table.n_rows()];
    let mut dropped_users = 0;
    for user in &users {
        let user_rows = &rows[user];
        match policy {
            MultiGroupPolicy::Exclude => {
                let distinct: HashSet<ValueKey> =
                    user_rows.iter().filter_map(|&i| groups[i].key()).collect();
                if distinct.len() > 1 {
                    dropped_users += 1;
                } else {
                    user_rows.iter().for_each(|&i| keep[i] = true);
                }
            }
            MultiGroupPolicy::First => {
                let first = &groups[user_rows[0]];
                let matching: Vec<usize> = user_rows
                    .iter()
                    .copied()
                    .filter(|&i| groups[i].matches(first))
                    .collect();
                if matching.is_empty() {
                    dropped_users += 1;
                }
                matching.into_iter().for_each(|i| keep[i] = true);
            }
            MultiGroupPolicy::All => user_rows.iter().for_each(|&i| keep[i] = true),
        }
    }

    if dropped_users > 0 {
        warn!(
            dropped_users,
            policy = %policy,
            "dropped users while resolving multiple groups"
        );
    }
    Ok(table.filter_rows(|i| keep[i]))
}

/// Collapse a session-level table to one row per user
///
/// Steps, in order: drop excluded columns, parse the configured datetime
/// columns, resolve multi-group users (`exclude` / `first`), classify the
/// remaining columns, and reduce each user's rows with the strategy chosen
/// for each column. Users come out in ascending id order.
///
/// Output columns are the user id, the group column under `all`, then the
/// numeric, datetime and categorical columns, and finally the group column
/// under `exclude` / `first`. Rows without a user id are ignored, as are rows
/// without a group under `all`.
///
/// # Errors
///
/// `MissingColumn` when the user id or group column is absent.
#[instrument(skip(table, config), fields(
    rows = table.n_rows(),
    user_id = config.user_id_column(),
    policy = %config.multi_group(),
))]
pub fn aggregate_users(table: &Table, config: &AggregationConfig) -> Result<Table> {
    let user_id_column = config.user_id_column();
    let group_column = config.group_column();
    let policy = config.multi_group();

    let mut work = table.without_columns(config.exclude_columns());
    if !work.has_column(user_id_column) {
        return Err(Error::missing_column(user_id_column));
    }
    if let Some(group) = group_column {
        if !work.has_column(group) {
            return Err(Error::missing_column(group));
        }
    }

    work = parse_datetime_columns(&work, config.datetime_formats())?;
    if let Some(group) = group_column {
        if policy != MultiGroupPolicy::All {
            work = resolve_multi_group(&work, user_id_column, group, policy)?;
        }
    }

    let forced: Vec<&str> = config.datetime_formats().keys().map(String::as_str).collect();
    let mut typed = classify_columns(&work, user_id_column, group_column, &forced);
    // numeric, then datetime, then categorical; stable within each class
    typed.sort_by_key(|(_, column_type)| *column_type as u8);
    debug!(columns = typed.len(), "classified columns");

    let ids = work.column(user_id_column)?.values();
    let group_values = group_column.map(|g| work.column(g)).transpose()?.map(Column::values);
    let split_by_group = policy == MultiGroupPolicy::All && group_values.is_some();

    let mut buckets: BTreeMap<(ValueKey, Option<ValueKey>), Vec<usize>> = BTreeMap::new();
    for (i, id) in ids.iter().enumerate() {
        let Some(user) = id.key() else { continue };
        let group = match group_values {
            Some(groups) if split_by_group => match groups[i].key() {
                Some(g) => Some(g),
                None => continue,
            },
            _ => None,
        };
        buckets.entry((user, group)).or_default().push(i);
    }

    let mut out_ids = Vec::with_capacity(buckets.len());
    let mut out_groups = Vec::with_capacity(buckets.len());
    let mut out_values: Vec<Vec<Value>> = vec![Vec::with_capacity(buckets.len()); typed.len()];

    for ((user, group), rows) in &buckets {
        out_ids.push(Value::from(user.clone()));
        if let Some(groups) = group_values {
            out_groups.push(match group {
                Some(g) => Value::from(g.clone()),
                // first non-missing label of the user
                None => rows
                    .iter()
                    .map(|&i| &groups[i])
                    .find(|v| !v.is_null())
                    .cloned()
                    .unwrap_or_default(),
            });
        }
        for ((name, column_type), out) in typed.iter().zip(out_values.iter_mut()) {
            let cells: Vec<Value> = {
                let column = work.column(name)?;
                rows.iter().map(|&i| column.values()[i].clone()).collect()
            };
            out.push(config.strategy_for(name, *column_type).aggregate(&cells));
        }
    }

    let mut columns = vec![Column::new(user_id_column, out_ids)];
    let mut group_column_out = group_column.map(|g| Column::new(g, out_groups));
    if split_by_group {
        columns.extend(group_column_out.take());
    }
    columns.extend(
        typed
            .into_iter()
            .zip(out_values)
            .map(|((name, _), values)| Column::new(name, values)),
    );
    columns.extend(group_column_out);

    debug!(users = buckets.len(), "aggregated users");
    Table::new(columns)
}
