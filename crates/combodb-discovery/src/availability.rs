//! Indexing serving history for the upcoming week.
//!
//! Both indexes read the history rows of a set of combos inside
//! [`DateWindow::following`]`(now)` and differ only in how they key them.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use combodb_core::{
    format_serving_date, upcoming_days, CatalogStore, Combo, ComboHistory, DateWindow,
    HistoryQuery,
};
use tracing::{debug, error};
use uuid::Uuid;

/// Formatted serving dates per combo, in date order.
///
/// Combos with no serving date in the window have no key.
pub type ComboAvailability = HashMap<Uuid, Vec<String>>;

/// History rows per upcoming day, in calendar order.
pub type DaySlots = BTreeMap<NaiveDate, Vec<ComboHistory>>;

/// Upcoming serving dates of each combo, formatted `"yyyy-MM-dd, Weekday"`.
pub async fn availability_by_combo<S: CatalogStore>(
    store: &S,
    combos: &[Combo],
    now: DateTime<Utc>,
) -> ComboAvailability {
    let rows = fetch_window(store, combos, DateWindow::following(now)).await;
    index_by_combo(rows)
}

/// History rows bucketed into the seven days following `now`.
///
/// All seven slots are present even when empty.
pub async fn availability_by_date<S: CatalogStore>(
    store: &S,
    combos: &[Combo],
    now: DateTime<Utc>,
) -> DaySlots {
    let rows = fetch_window(store, combos, DateWindow::following(now)).await;
    index_by_date(rows, now)
}

/// Group rows by combo, dates sorted ascending.
#[must_use]
pub fn index_by_combo(mut rows: Vec<ComboHistory>) -> ComboAvailability {
    rows.sort_by_key(|row| row.serving_date);
    let mut index: ComboAvailability = HashMap::new();
    for row in rows {
        index
            .entry(row.combo_id)
            .or_default()
            .push(format_serving_date(row.serving_date));
    }
    index
}

/// Seed the seven upcoming days and drop each row into its day.
///
/// Rows dated outside those seven days are discarded so the result always
/// has exactly seven keys.
#[must_use]
pub fn index_by_date(rows: Vec<ComboHistory>, now: DateTime<Utc>) -> DaySlots {
    let mut slots: DaySlots = upcoming_days(now)
        .into_iter()
        .map(|day| (day, Vec::new()))
        .collect();

    for row in rows {
        match slots.get_mut(&row.serving_date) {
            Some(slot) => slot.push(row),
            None => debug!(
                history_id = %row.id,
                serving_date = %row.serving_date,
                "history row outside the upcoming week; dropped"
            ),
        }
    }
    slots
}

async fn fetch_window<S: CatalogStore>(
    store: &S,
    combos: &[Combo],
    window: DateWindow,
) -> Vec<ComboHistory> {
    let combo_ids: Vec<Uuid> = combos.iter().map(|c| c.id).collect();
    if combo_ids.is_empty() {
        return Vec::new();
    }

    match store
        .find_combo_history(&HistoryQuery::ForCombos { combo_ids, window })
        .await
    {
        // The store may hand back more than asked for.
        Ok(rows) => rows
            .into_iter()
            .filter(|row| window.contains(row.serving_date))
            .collect(),
        Err(e) => {
            error!(error = %e, "combo history query failed");
            Vec::new()
        }
    }
}
