//! Customer shopping trends.

use serde::Serialize;

use crate::aggregators::{
    Bucket, BucketPlan, BucketResult, Field, KeyDomain, NamedCount, NamedValue, Normalize,
    OrdinalKey, SeriesResult, SortOrder, Summary, UnplacedPolicy, build_buckets,
    build_ordinal_series, count_occurrences, sum_by, summary,
};
use crate::chart::{ChartData, Palette, ToChart};
use crate::config::DashboardConfig;
use crate::datasets::Dashboard;
use crate::record::RawRecord;

pub const CUSTOMER_ID: &str = "Customer ID";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const ITEM_PURCHASED: &str = "Item Purchased";
pub const CATEGORY: &str = "Category";
pub const PURCHASE_AMOUNT: &str = "Purchase Amount (USD)";
pub const LOCATION: &str = "Location";
pub const SIZE: &str = "Size";
pub const COLOR: &str = "Color";
pub const SEASON: &str = "Season";
pub const REVIEW_RATING: &str = "Review Rating";
pub const SUBSCRIPTION_STATUS: &str = "Subscription Status";
pub const SHIPPING_TYPE: &str = "Shipping Type";
pub const DISCOUNT_APPLIED: &str = "Discount Applied";
pub const PROMO_CODE_USED: &str = "Promo Code Used";
pub const PREVIOUS_PURCHASES: &str = "Previous Purchases";
pub const PAYMENT_METHOD: &str = "Payment Method";
pub const FREQUENCY: &str = "Frequency of Purchases";

/// Display order of the purchase frequency answers.
pub const FREQUENCIES: [&str; 7] = [
    "Weekly",
    "Fortnightly",
    "Monthly",
    "Bi-Monthly",
    "Quarterly",
    "Annually",
    "Every Few Weeks",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingRecord {
    pub customer_id: String,
    pub age: i64,
    pub gender: String,
    pub item_purchased: String,
    pub category: String,
    pub purchase_amount: f64,
    pub location: String,
    pub size: String,
    pub color: String,
    pub season: String,
    pub review_rating: f64,
    pub subscription_status: String,
    pub shipping_type: String,
    pub discount_applied: String,
    pub promo_code_used: String,
    pub previous_purchases: i64,
    pub payment_method: String,
    pub frequency: String,
}

impl Normalize for ShoppingRecord {
    const IDENTITY_COLUMN: &'static str = CUSTOMER_ID;

    fn from_raw(raw: &RawRecord) -> Self {
        Self {
            customer_id: raw.text_or(CUSTOMER_ID, ""),
            age: raw.int_or(AGE, 0),
            gender: raw.category(GENDER),
            item_purchased: raw.category(ITEM_PURCHASED),
            category: raw.category(CATEGORY),
            purchase_amount: raw.currency_or(PURCHASE_AMOUNT, 0.0),
            location: raw.category(LOCATION),
            size: raw.category(SIZE),
            color: raw.category(COLOR),
            season: raw.category(SEASON),
            review_rating: raw.float_or(REVIEW_RATING, 0.0),
            subscription_status: raw.category(SUBSCRIPTION_STATUS),
            shipping_type: raw.category(SHIPPING_TYPE),
            discount_applied: raw.category(DISCOUNT_APPLIED),
            promo_code_used: raw.category(PROMO_CODE_USED),
            previous_purchases: raw.int_or(PREVIOUS_PURCHASES, 0),
            payment_method: raw.category(PAYMENT_METHOD),
            frequency: raw.category(FREQUENCY),
        }
    }

    fn identity(&self) -> &str {
        &self.customer_id
    }
}

const PURCHASE_FIELD: Field<ShoppingRecord> =
    Field::new("Purchase Amount (USD)", |r: &ShoppingRecord| r.purchase_amount);

const AGE_FIELD: Field<ShoppingRecord> = Field::new("customers", |r: &ShoppingRecord| r.age as f64);

const CUSTOMERS: Field<ShoppingRecord> = Field::count("Customers");

fn age_plan() -> BucketPlan {
    BucketPlan::new(vec![
        Bucket::at_most("18-25", 25.0),
        Bucket::at_most("26-35", 35.0),
        Bucket::at_most("36-45", 45.0),
        Bucket::at_most("46-55", 55.0),
        Bucket::at_most("56-65", 65.0),
        Bucket::open("66+"),
    ])
    .with_minimum(18.0)
    .with_unplaced(UnplacedPolicy::unknown("Unknown"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingReport {
    pub summary: Summary,
    pub gender: Vec<NamedCount>,
    pub categories: Vec<NamedCount>,
    pub age_brackets: BucketResult,
    pub seasonal_sales: SeriesResult,
    pub review_ratings: SeriesResult,
    pub subscription: Vec<NamedCount>,
    pub payment_methods: Vec<NamedCount>,
    pub purchase_frequency: SeriesResult,
    pub discount_applied: Vec<NamedCount>,
    pub shipping_types: Vec<NamedCount>,
    pub top_locations: Vec<NamedValue>,
}

impl Dashboard for ShoppingRecord {
    const NAME: &'static str = "shopping";

    type Report = ShoppingReport;

    fn build_report(records: &[Self], config: &DashboardConfig) -> ShoppingReport {
        let mut top_locations = sum_by(records, |r| r.location.as_str(), PURCHASE_FIELD);
        top_locations.truncate(config.top_n.locations);

        ShoppingReport {
            summary: summary(records, PURCHASE_FIELD),
            gender: count_occurrences(records, |r| r.gender.as_str(), SortOrder::ByValue),
            categories: count_occurrences(records, |r| r.category.as_str(), SortOrder::ByValue),
            age_brackets: build_buckets(records, &age_plan(), &[AGE_FIELD]),
            seasonal_sales: build_ordinal_series(
                records,
                |r| OrdinalKey::Label(&r.season),
                &KeyDomain::seasons(),
                &[PURCHASE_FIELD],
            ),
            review_ratings: build_ordinal_series(
                records,
                |r| OrdinalKey::Number(r.review_rating.round() as i64),
                &KeyDomain::range(1, 5),
                &[CUSTOMERS],
            ),
            subscription: count_occurrences(
                records,
                |r| r.subscription_status.as_str(),
                SortOrder::ByValue,
            ),
            payment_methods: count_occurrences(
                records,
                |r| r.payment_method.as_str(),
                SortOrder::ByValue,
            ),
            purchase_frequency: build_ordinal_series(
                records,
                |r| OrdinalKey::Label(&r.frequency),
                &KeyDomain::canonical(FREQUENCIES),
                &[CUSTOMERS],
            ),
            discount_applied: count_occurrences(
                records,
                |r| r.discount_applied.as_str(),
                SortOrder::ByValue,
            ),
            shipping_types: count_occurrences(records, |r| r.shipping_type.as_str(), SortOrder::ByValue),
            top_locations,
        }
    }

    fn charts(report: &ShoppingReport, palette: &Palette) -> Vec<(&'static str, ChartData)> {
        vec![
            ("Gender", report.gender.to_chart("Customers")),
            ("Categories", report.categories.to_chart("Purchases")),
            ("Age Brackets", report.age_brackets.to_chart("Customers")),
            ("Seasonal Sales", report.seasonal_sales.to_chart("Sales (USD)")),
            ("Review Ratings", report.review_ratings.to_chart("Customers")),
            ("Subscription Status", report.subscription.to_chart("Customers")),
            ("Payment Methods", report.payment_methods.to_chart("Customers")),
            ("Purchase Frequency", report.purchase_frequency.to_chart("Customers")),
            ("Discount Applied", report.discount_applied.to_chart("Purchases")),
            ("Shipping Types", report.shipping_types.to_chart("Purchases")),
            ("Top Locations", report.top_locations.to_chart("Sales (USD)")),
        ]
        .into_iter()
        .map(|(title, chart)| (title, chart.with_palette(palette)))
        .collect()
    }
}
