//! Aggregation of normalized records into chart-ready series.
//!
//! Every component is a pure function over a slice of records plus field
//! selectors. None of them fail: a malformed value is simply excluded or
//! counted at its default, per component.

pub mod average;
pub mod buckets;
pub mod categorical;
pub mod crosstab;
pub mod grouped;
pub mod normalize;
pub mod ordinal;
pub mod types;

pub use average::{Summary, average_of, summary, totals};
pub use buckets::{
    Bucket, BucketPlan, LabelBucket, UnplacedPolicy, UpperBound, build_buckets,
    build_label_buckets,
};
pub use categorical::{SortOrder, count_occurrences};
pub use crosstab::cross_tab;
pub use grouped::{average_by, sum_by, top_records};
pub use normalize::{Normalize, normalize};
pub use ordinal::{KeyDomain, OrdinalKey, build_ordinal_series};
pub use types::{
    BucketResult, BucketRow, CrossTabGroup, Field, NamedCount, NamedValue, SeriesPoint,
    SeriesResult,
};
