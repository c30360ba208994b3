use std::{collections::BTreeMap, fmt::Display};

use crate::{Field, PricePoint, PriceSeries, Timestamp};

/// Column values of a quote table. `None` marks a period the provider
/// reported without a value.
pub type Column = Vec<Option<f64>>;

/// Column label of a [`RawTable`], one entry per index level.
///
/// Providers that can batch several symbols label columns with
/// `(field, symbol)`; single-symbol providers may use a single level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnKey(Vec<String>);

impl ColumnKey {
    /// Single-level label.
    pub fn flat(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Multi-level label, outermost level first.
    pub fn nested<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(levels.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn first_level(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Quote table as returned by a provider, before normalization.
///
/// Rows are indexed by period start. Columns keep whatever labels the
/// provider used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    index: Vec<Timestamp>,
    columns: Vec<(ColumnKey, Column)>,
}

impl RawTable {
    #[must_use]
    pub fn new(index: Vec<Timestamp>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Adds a column, padding or truncating it to the index length.
    #[must_use]
    pub fn with_column(mut self, key: ColumnKey, mut values: Column) -> Self {
        values.resize(self.index.len(), None);
        self.columns.push((key, values));
        self
    }

    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    pub fn columns(&self) -> impl Iterator<Item = (&ColumnKey, &Column)> {
        self.columns.iter().map(|(key, values)| (key, values))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Timestamp>, Vec<(ColumnKey, Column)>) {
        (self.index, self.columns)
    }
}

/// Normalized quote table with flat [`Field`] columns, ordered by date.
///
/// Produced by [`normalize`](crate::normalize()). Every column has one value
/// per date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Quotes {
    dates: Vec<Timestamp>,
    columns: BTreeMap<Field, Column>,
}

impl Quotes {
    pub(crate) fn new(dates: Vec<Timestamp>, columns: BTreeMap<Field, Column>) -> Self {
        debug_assert!(
            columns.values().all(|c| c.len() == dates.len()),
            "every column must have one value per date",
        );

        Self { dates, columns }
    }

    #[must_use]
    pub fn dates(&self) -> &[Timestamp] {
        &self.dates
    }

    /// Fields present in the table, in [`Field`] order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.keys().copied()
    }

    #[must_use]
    pub fn column(&self, field: Field) -> Option<&[Option<f64>]> {
        self.columns.get(&field).map(Vec::as_slice)
    }

    pub(crate) fn set_column(&mut self, field: Field, values: Column) {
        debug_assert_eq!(values.len(), self.dates.len());
        self.columns.insert(field, values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The adjusted-close column as a [`PriceSeries`].
    ///
    /// Empty when the table has no adjusted-close column.
    #[must_use]
    pub fn price_series(&self) -> PriceSeries {
        let Some(adj_close) = self.column(Field::AdjClose) else {
            return PriceSeries::default();
        };

        PriceSeries::from_points(
            self.dates
                .iter()
                .zip(adj_close)
                .map(|(&date, &price)| PricePoint::new(date, price)),
        )
    }
}
