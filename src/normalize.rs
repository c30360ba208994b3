//! Pure reshaping of a provider [`RawTable`] into [`Quotes`].

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{
    Error, Field, Quotes, RawTable,
    error::Result,
    table::Column,
};

/// Ticker suffix of London Stock Exchange listings, whose feeds carry no
/// usable adjusted close.
pub const LONDON_SUFFIX: &str = ".L";

/// Flattens `raw` and guarantees an adjusted-close column.
///
/// # Errors
///
/// [`Error::NoData`] when `raw` has no rows, [`Error::NoPriceData`] when an
/// adjusted close has to be derived but no close values exist.
pub fn normalize(raw: RawTable, ticker: &str) -> Result<Quotes> {
    if raw.is_empty() {
        return Err(Error::NoData);
    }

    let mut quotes = flatten(raw);
    derive_adj_close(&mut quotes, ticker)?;

    debug!(
        rows = quotes.len(),
        fields = ?quotes.fields().collect::<Vec<_>>(),
        "normalized quotes"
    );

    Ok(quotes)
}

/// Collapses multi-level column labels to their first level and orders rows
/// by date.
///
/// Labels that name no [`Field`] are dropped. When several columns collapse
/// to the same field the first one wins. A date that appears more than once
/// keeps its last row.
#[must_use]
pub fn flatten(raw: RawTable) -> Quotes {
    let (index, columns) = raw.into_parts();

    let mut flat: BTreeMap<Field, Column> = BTreeMap::new();
    for (key, values) in columns {
        match key.first_level().map(str::parse::<Field>) {
            Some(Ok(field)) => {
                if flat.contains_key(&field) {
                    debug!(%key, "dropping column shadowed by an earlier {field} column");
                } else {
                    flat.insert(field, values);
                }
            }
            Some(Err(err)) => debug!(%key, %err, "ignoring column"),
            None => debug!("ignoring column without a label"),
        }
    }

    let mut order: Vec<usize> = (0..index.len()).collect();
    order.sort_by_key(|&row| index[row]);

    let mut rows: Vec<usize> = Vec::with_capacity(order.len());
    for row in order {
        match rows.last_mut() {
            Some(last) if index[*last] == index[row] => *last = row,
            _ => rows.push(row),
        }
    }

    let dates = rows.iter().map(|&row| index[row]).collect();
    let columns = flat
        .into_iter()
        .map(|(field, values)| (field, rows.iter().map(|&row| values[row]).collect()))
        .collect();

    Quotes::new(dates, columns)
}

/// Sets the adjusted close to a copy of the close for London listings and
/// for tables without an adjusted close.
///
/// # Errors
///
/// [`Error::NoPriceData`] when a copy is needed but the close column is
/// absent or holds no values.
pub fn derive_adj_close(quotes: &mut Quotes, ticker: &str) -> Result<()> {
    let london = ticker.ends_with(LONDON_SUFFIX);
    if !london && quotes.column(Field::AdjClose).is_some() {
        return Ok(());
    }

    let close = quotes
        .column(Field::Close)
        .filter(|values| values.iter().any(Option::is_some))
        .ok_or(Error::NoPriceData)?
        .to_vec();

    info!(ticker, london, "using close as adjusted close");
    quotes.set_column(Field::AdjClose, close);

    Ok(())
}
