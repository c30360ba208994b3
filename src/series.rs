use chrono::{DateTime, Utc};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Start of a trading period (day or week), in UTC.
pub type Timestamp = DateTime<Utc>;

/// One period of a [`PriceSeries`].
///
/// `price` is `None` when the provider reported no adjusted close for the
/// period.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PricePoint {
    pub date: Timestamp,
    pub price: Option<Price>,
}

impl PricePoint {
    #[must_use]
    pub fn new(date: Timestamp, price: Option<Price>) -> Self {
        Self { date, price }
    }
}

/// Adjusted-close prices ordered by strictly increasing date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points in any order.
    ///
    /// Points are sorted by date; when a date occurs more than once the
    /// last point given for it wins.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut sorted: Vec<PricePoint> = points.into_iter().collect();
        sorted.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(sorted.len());
        for point in sorted {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// A row of the [`CombinedSeries`]: a date where both the adjusted close and
/// the RSI are defined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombinedPoint {
    pub date: Timestamp,
    pub adj_close: Price,
    pub rsi: Price,
}

/// Adjusted close joined with RSI on date, ascending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedSeries {
    points: Vec<CombinedPoint>,
}

impl CombinedSeries {
    pub(crate) fn new(points: Vec<CombinedPoint>) -> Self {
        debug_assert!(
            points.windows(2).all(|w| w[0].date < w[1].date),
            "combined series dates must be strictly increasing",
        );

        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombinedPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn points(&self) -> &[CombinedPoint] {
        &self.points
    }

    /// First and last date, or `None` when empty.
    #[must_use]
    pub fn date_range(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Lowest and highest adjusted close, or `None` when empty.
    #[must_use]
    pub fn price_range(&self) -> Option<(Price, Price)> {
        self.points.iter().map(|p| p.adj_close).fold(None, |acc, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    }
}
