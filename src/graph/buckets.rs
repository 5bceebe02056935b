//! Date bucketing for the time slider.
//!
//! Nodes and links are date-sorted, so visibility at a bucket is just a
//! prefix length: `counts[b]` is how many leading items have their first
//! date at or before bucket `b`. The slider never removes or re-adds
//! items, it only changes how many leading items are shown.

use chrono::{DateTime, Datelike, Utc};

use crate::config::Granularity;
use crate::model::{Link, Node, OccurrenceDate};

/// External collaborator mapping dates to a fixed, monotonic bucket range.
pub trait Bucketizer {
    fn start_date(&self) -> Option<DateTime<Utc>>;
    fn end_date(&self) -> Option<DateTime<Utc>>;
    fn num_buckets(&self) -> usize;
    fn bucket_index(&self, date: DateTime<Utc>) -> usize;

    /// A bucketizer without a start and end date cannot place anything.
    fn is_bounded(&self) -> bool {
        self.start_date().is_some() && self.end_date().is_some() && self.num_buckets() > 0
    }
}

/// Fixed-interval bucketizer over a closed date range. Out-of-range dates
/// clamp into the range instead of erroring.
#[derive(Debug, Clone)]
pub struct IntervalBucketizer {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    granularity: Granularity,
}

impl IntervalBucketizer {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, granularity: Granularity) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self {
            start,
            end,
            granularity,
        }
    }

    /// Build a bucketizer spanning the given dates, or `None` when there
    /// are no dates to span.
    pub fn spanning(
        dates: impl IntoIterator<Item = DateTime<Utc>>,
        granularity: Granularity,
    ) -> Option<Self> {
        let mut min: Option<DateTime<Utc>> = None;
        let mut max: Option<DateTime<Utc>> = None;
        for date in dates {
            min = Some(min.map_or(date, |m| m.min(date)));
            max = Some(max.map_or(date, |m| m.max(date)));
        }
        Some(Self::new(min?, max?, granularity))
    }

    fn raw_index(&self, date: DateTime<Utc>) -> i64 {
        match self.granularity {
            Granularity::Hour => (date - self.start).num_hours(),
            Granularity::Day => (date - self.start).num_days(),
            Granularity::Month => {
                let months = |d: DateTime<Utc>| d.year() as i64 * 12 + d.month0() as i64;
                months(date) - months(self.start)
            }
        }
    }

    /// Start of the interval a bucket covers, for display.
    pub fn bucket_start(&self, bucket: usize) -> DateTime<Utc> {
        match self.granularity {
            Granularity::Hour => self.start + chrono::Duration::hours(bucket as i64),
            Granularity::Day => self.start + chrono::Duration::days(bucket as i64),
            Granularity::Month => {
                let total = self.start.year() as i64 * 12 + self.start.month0() as i64 + bucket as i64;
                let year = (total / 12) as i32;
                let month0 = (total % 12) as u32;
                self.start
                    .with_day(1)
                    .and_then(|d| d.with_year(year))
                    .and_then(|d| d.with_month0(month0))
                    .unwrap_or(self.start)
            }
        }
    }

    pub fn bucket_label(&self, bucket: usize) -> String {
        let start = self.bucket_start(bucket);
        match self.granularity {
            Granularity::Hour => start.format("%Y-%m-%d %H:00").to_string(),
            Granularity::Day => start.format("%Y-%m-%d").to_string(),
            Granularity::Month => start.format("%Y-%m").to_string(),
        }
    }
}

impl Bucketizer for IntervalBucketizer {
    fn start_date(&self) -> Option<DateTime<Utc>> {
        Some(self.start)
    }

    fn end_date(&self) -> Option<DateTime<Utc>> {
        Some(self.end)
    }

    fn num_buckets(&self) -> usize {
        self.raw_index(self.end).max(0) as usize + 1
    }

    fn bucket_index(&self, date: DateTime<Utc>) -> usize {
        let last = self.num_buckets() - 1;
        self.raw_index(date).clamp(0, last as i64) as usize
    }
}

/// Cumulative visibility counts per bucket for the top-level node and link
/// lists. `node_counts[b]` leading nodes are visible at bucket `b`.
#[derive(Debug, Clone, Default)]
pub struct DateBucketIndex {
    pub node_counts: Vec<usize>,
    pub link_counts: Vec<usize>,
}

/// Rebuild the cumulative indices for already-sorted nodes and links.
/// Cluster nodes get their own index over their member list. Called after
/// every build and whenever the bucketizer changes; clustering and node
/// identity are untouched.
pub(crate) fn initialize_date_buckets(
    nodes: &mut [Node],
    links: &[Link],
    bucketizer: &dyn Bucketizer,
) -> DateBucketIndex {
    let num_buckets = bucketizer.num_buckets();
    let mut index = DateBucketIndex {
        node_counts: vec![0; num_buckets],
        link_counts: vec![0; num_buckets],
    };
    if num_buckets == 0 {
        return index;
    }

    for (position, node) in nodes.iter_mut().enumerate() {
        let bucket = first_bucket(node.first_date(), bucketizer);
        fill_from(&mut index.node_counts, bucket, position + 1);

        if let Some(data) = node.cluster_data_mut() {
            data.member_counts_by_bucket = vec![0; num_buckets];
            for (member_position, member) in data.members.iter().enumerate() {
                let member_bucket = first_bucket(member.first_date(), bucketizer);
                fill_from(
                    &mut data.member_counts_by_bucket,
                    member_bucket,
                    member_position + 1,
                );
            }
            data.visible_members = data.members.len();
        }
    }

    for (position, link) in links.iter().enumerate() {
        let bucket = first_bucket(link.first_date(), bucketizer);
        fill_from(&mut index.link_counts, bucket, position + 1);
    }

    index
}

/// An item's own bucket: its first real date, or bucket 0 when dateless.
fn first_bucket(first_date: Option<DateTime<Utc>>, bucketizer: &dyn Bucketizer) -> usize {
    first_date.map_or(0, |date| bucketizer.bucket_index(date))
}

/// This bucket and every later one see at least this many items.
fn fill_from(counts: &mut [usize], bucket: usize, count: usize) {
    for slot in counts.iter_mut().skip(bucket) {
        *slot = count;
    }
}

/// Occurrences at or before the given bucket; dateless occurrences always
/// count. With no bucket selected, every occurrence counts.
pub fn count_dates_through(
    dates: &[OccurrenceDate],
    bucketizer: Option<&dyn Bucketizer>,
    bucket: Option<usize>,
) -> usize {
    match (bucket, bucketizer) {
        (Some(bucket), Some(bucketizer)) => dates
            .iter()
            .filter(|date| match date {
                None => true,
                Some(date) => bucketizer.bucket_index(*date) <= bucket,
            })
            .count(),
        _ => dates.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    fn day_bucketizer() -> IntervalBucketizer {
        IntervalBucketizer::new(date(1, 1), date(1, 10), Granularity::Day)
    }

    #[test]
    fn test_day_buckets() {
        let b = day_bucketizer();
        assert_eq!(b.num_buckets(), 10);
        assert_eq!(b.bucket_index(date(1, 1)), 0);
        assert_eq!(b.bucket_index(date(1, 10)), 9);
    }

    #[test]
    fn test_out_of_range_dates_clamp() {
        let b = day_bucketizer();
        assert_eq!(b.bucket_index(date(2, 15)), 9);
        assert_eq!(
            b.bucket_index(Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap()),
            0
        );
    }

    #[test]
    fn test_month_buckets_cross_year() {
        let b = IntervalBucketizer::new(
            Utc.with_ymd_and_hms(2023, 11, 15, 0, 0, 0).unwrap(),
            date(2, 1),
            Granularity::Month,
        );
        assert_eq!(b.num_buckets(), 4);
        assert_eq!(b.bucket_index(Utc.with_ymd_and_hms(2023, 12, 3, 0, 0, 0).unwrap()), 1);
        assert_eq!(b.bucket_index(date(1, 31)), 2);
        assert_eq!(b.bucket_label(3), "2024-02");
    }

    #[test]
    fn test_spanning_covers_min_and_max() {
        let b = IntervalBucketizer::spanning(
            vec![date(1, 5), date(1, 2), date(1, 9)],
            Granularity::Day,
        )
        .unwrap();
        assert_eq!(b.start_date(), Some(date(1, 2)));
        assert_eq!(b.end_date(), Some(date(1, 9)));
        assert!(IntervalBucketizer::spanning(vec![], Granularity::Day).is_none());
    }

    #[test]
    fn test_counts_are_monotonic() {
        let b = day_bucketizer();
        let mut nodes: Vec<Node> = ["n1", "n2", "n3"]
            .iter()
            .map(|id| Node::new(crate::model::NodeId::new(*id)))
            .collect();
        nodes[0].dates = vec![None];
        nodes[1].dates = vec![Some(date(1, 3))];
        nodes[2].dates = vec![Some(date(1, 7))];

        let index = initialize_date_buckets(&mut nodes, &[], &b);

        for pair in index.node_counts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert_eq!(index.node_counts[0], 1);
        assert_eq!(index.node_counts[2], 2);
        assert_eq!(index.node_counts[9], 3);
    }

    #[test]
    fn test_count_dates_through_keeps_legitimate_zero() {
        let b = day_bucketizer();
        let dates = vec![Some(date(1, 5)), Some(date(1, 8))];

        // No date at or before bucket 1: the count is a real zero, not a
        // fallback to the full length.
        assert_eq!(count_dates_through(&dates, Some(&b), Some(1)), 0);
        assert_eq!(count_dates_through(&dates, Some(&b), Some(4)), 1);
        assert_eq!(count_dates_through(&dates, Some(&b), None), 2);
        assert_eq!(count_dates_through(&[None, Some(date(1, 8))], Some(&b), Some(0)), 1);
    }
}
