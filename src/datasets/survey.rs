//! Tabletop roleplaying sentiment survey.

use serde::Serialize;

use crate::aggregators::{
    Bucket, BucketPlan, BucketResult, CrossTabGroup, Field, LabelBucket, NamedCount, NamedValue,
    Normalize, SortOrder, UnplacedPolicy, average_by, average_of, build_buckets,
    build_label_buckets, count_occurrences, cross_tab,
};
use crate::chart::{ChartData, Palette, ToChart};
use crate::config::DashboardConfig;
use crate::datasets::Dashboard;
use crate::record::RawRecord;

pub const TIMESTAMP: &str = "Timestamp";
pub const EXPERIENCE: &str = "When did you start playing tabletop roleplaying games?";
pub const PLAY_FREQUENCY: &str = "How often do you play tabletop roleplaying games?";
pub const SESSION_LENGTH: &str = "How long do your sessions typically last?";
pub const MAIN_SYSTEM: &str = "Select your current main system.";
pub const SATISFACTION: &str = "How would you rate your satisfaction with your current main system?";
pub const COMPLEXITY: &str = "How would you rate the complexity of your current main system?";
pub const GENRE: &str = "What genre do you currently play in?";
pub const ROLE: &str = "Would you describe yourself as a game master, player, both or neither?";
pub const GROUP_SIZE: &str = "What is the number of players in your current main group?";
pub const COMBAT: &str = "Rate the importance of these in your game sessions with 1 being the least important and 5 being the most important. [Combat]";
pub const ROLEPLAY: &str = "Rate the importance of these in your game sessions with 1 being the least important and 5 being the most important. [Roleplaying]";
pub const EXPLORATION: &str = "Rate the importance of these in your game sessions with 1 being the least important and 5 being the most important. [Exploration]";
pub const SPENDING: &str = "How much have you spent on tabletop roleplaying within the past year?";
pub const MAX_DIGITAL: &str = "What would be the maximum you would pay for a digital book?";
pub const MAX_HARDBACK: &str = "What would be the maximum you would pay for a hardback book?";
pub const PURCHASE_INTERESTS: &str = "What would you be interested in purchasing for tabletop games?";
pub const PLAYER_ISSUES: &str = "What would you say is the main issue with your player group(s)?";

/// One survey answer. Ratings are 1 to 5, with 0 meaning "not answered".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResponse {
    pub timestamp: String,
    pub experience_level: String,
    pub play_frequency: String,
    pub session_length: String,
    pub main_system: String,
    pub system_satisfaction: i64,
    pub system_complexity: i64,
    pub genre: String,
    pub role: String,
    pub group_size: String,
    pub combat_importance: i64,
    pub roleplay_importance: i64,
    pub exploration_importance: i64,
    pub spending_amount: String,
    pub max_digital_price: f64,
    pub max_hardback_price: f64,
    pub purchase_interests: Vec<String>,
    pub player_issues: String,
}

impl Normalize for SurveyResponse {
    const IDENTITY_COLUMN: &'static str = TIMESTAMP;

    fn from_raw(raw: &RawRecord) -> Self {
        Self {
            timestamp: raw.text_or(TIMESTAMP, ""),
            experience_level: raw.category(EXPERIENCE),
            play_frequency: raw.category(PLAY_FREQUENCY),
            session_length: raw.category(SESSION_LENGTH),
            main_system: raw.category(MAIN_SYSTEM),
            system_satisfaction: raw.int_or(SATISFACTION, 0),
            system_complexity: raw.int_or(COMPLEXITY, 0),
            genre: raw.category(GENRE),
            role: raw.category(ROLE),
            group_size: raw.category(GROUP_SIZE),
            combat_importance: raw.int_or(COMBAT, 0),
            roleplay_importance: raw.int_or(ROLEPLAY, 0),
            exploration_importance: raw.int_or(EXPLORATION, 0),
            spending_amount: raw.category(SPENDING),
            max_digital_price: raw.currency_or(MAX_DIGITAL, 0.0),
            max_hardback_price: raw.currency_or(MAX_HARDBACK, 0.0),
            purchase_interests: raw.list(PURCHASE_INTERESTS),
            player_issues: raw.category(PLAYER_ISSUES),
        }
    }

    fn identity(&self) -> &str {
        &self.timestamp
    }
}

const SATISFACTION_FIELD: Field<SurveyResponse> =
    Field::new("systemSatisfaction", |r: &SurveyResponse| r.system_satisfaction as f64);

const RATING_FIELDS: [Field<SurveyResponse>; 5] = [
    SATISFACTION_FIELD,
    Field::new("systemComplexity", |r: &SurveyResponse| r.system_complexity as f64),
    Field::new("combatImportance", |r: &SurveyResponse| r.combat_importance as f64),
    Field::new("roleplayImportance", |r: &SurveyResponse| r.roleplay_importance as f64),
    Field::new("explorationImportance", |r: &SurveyResponse| r.exploration_importance as f64),
];

/// Display name for each importance rating, keyed by its averaged label.
const GAMEPLAY_ELEMENTS: [(&str, &str); 3] = [
    ("Combat Importance", "Combat"),
    ("Roleplay Importance", "Roleplaying"),
    ("Exploration Importance", "Exploration"),
];

const PRICE_FIELDS: [Field<SurveyResponse>; 2] = [
    Field::new("digital", |r: &SurveyResponse| r.max_digital_price),
    Field::new("hardback", |r: &SurveyResponse| r.max_hardback_price),
];

fn price_plan(unplaced: &UnplacedPolicy) -> BucketPlan {
    BucketPlan::new(vec![
        Bucket::at_most("$0-$10", 10.0),
        Bucket::at_most("$11-$25", 25.0),
        Bucket::at_most("$26-$50", 50.0),
        Bucket::at_most("$51-$75", 75.0),
        Bucket::open("$76+"),
    ])
    .with_unplaced(unplaced.clone())
}

/// Answers are free text such as `"$51-200"` or `"Under $50"`. The order
/// matters: `"201-500"` must win over the bare `"500"` pattern.
fn spending_bands() -> Vec<LabelBucket> {
    vec![
        LabelBucket::new("0-50", &["0-50", "under $50"]),
        LabelBucket::new("51-200", &["51-200"]),
        LabelBucket::new("201-500", &["201-500"]),
        LabelBucket::new("500+", &["500", "over $500"]),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub respondents: usize,
    pub roles: Vec<NamedCount>,
    pub play_frequency: Vec<NamedCount>,
    pub experience_level: Vec<NamedCount>,
    pub session_length: Vec<NamedCount>,
    pub top_systems: Vec<NamedCount>,
    pub top_genres: Vec<NamedCount>,
    pub average_ratings: Vec<NamedValue>,
    pub gameplay_importance: Vec<NamedValue>,
    pub spending: BucketResult,
    pub price_sensitivity: BucketResult,
    pub satisfaction_by_genre: Vec<NamedValue>,
    pub systems_by_genre: Vec<CrossTabGroup>,
}

fn top(mut counts: Vec<NamedCount>, n: usize) -> Vec<NamedCount> {
    counts.truncate(n);
    counts
}

fn gameplay_importance(averages: &[NamedValue]) -> Vec<NamedValue> {
    GAMEPLAY_ELEMENTS
        .iter()
        .map(|(label, name)| {
            let value = averages
                .iter()
                .find(|a| a.name == *label)
                .map_or(0.0, |a| a.value);
            NamedValue::new(*name, value)
        })
        .collect()
}

impl Dashboard for SurveyResponse {
    const NAME: &'static str = "survey";

    type Report = SurveyReport;

    fn build_report(records: &[Self], config: &DashboardConfig) -> SurveyReport {
        let top_n = &config.top_n;
        let average_ratings = average_of(records, &RATING_FIELDS);

        let mut satisfaction_by_genre = average_by(records, |r| r.genre.as_str(), SATISFACTION_FIELD);
        satisfaction_by_genre.truncate(top_n.genre_satisfaction);

        SurveyReport {
            respondents: records.len(),
            roles: count_occurrences(records, |r| r.role.as_str(), SortOrder::ByValue),
            play_frequency: count_occurrences(records, |r| r.play_frequency.as_str(), SortOrder::ByName),
            experience_level: count_occurrences(
                records,
                |r| r.experience_level.as_str(),
                SortOrder::ByName,
            ),
            session_length: count_occurrences(records, |r| r.session_length.as_str(), SortOrder::ByName),
            top_systems: top(
                count_occurrences(records, |r| r.main_system.as_str(), SortOrder::ByValue),
                top_n.systems,
            ),
            top_genres: top(
                count_occurrences(records, |r| r.genre.as_str(), SortOrder::ByValue),
                top_n.genres,
            ),
            gameplay_importance: gameplay_importance(&average_ratings),
            average_ratings,
            spending: build_label_buckets(
                records,
                &spending_bands(),
                &UnplacedPolicy::Drop,
                "Respondents",
                |r| r.spending_amount.as_str(),
            ),
            price_sensitivity: build_buckets(
                records,
                &price_plan(&config.unplaced_values),
                &PRICE_FIELDS,
            ),
            satisfaction_by_genre,
            systems_by_genre: cross_tab(
                records,
                |r| r.genre.as_str(),
                |r| r.main_system.as_str(),
                top_n.cross_tab_members,
                top_n.cross_tab_groups,
            ),
        }
    }

    fn charts(report: &SurveyReport, palette: &Palette) -> Vec<(&'static str, ChartData)> {
        vec![
            ("Player Roles", report.roles.to_chart("Respondents")),
            ("Play Frequency", report.play_frequency.to_chart("Respondents")),
            ("Experience Level", report.experience_level.to_chart("Respondents")),
            ("Session Length", report.session_length.to_chart("Respondents")),
            ("Top Systems", report.top_systems.to_chart("Players")),
            ("Top Genres", report.top_genres.to_chart("Players")),
            ("Average Ratings", report.average_ratings.to_chart("Average (1-5)")),
            ("Gameplay Importance", report.gameplay_importance.to_chart("Importance")),
            ("Annual Spending", report.spending.to_chart("Respondents")),
            ("Price Sensitivity", report.price_sensitivity.to_chart("Respondents")),
            ("Satisfaction by Genre", report.satisfaction_by_genre.to_chart("Satisfaction")),
            ("Systems by Genre", report.systems_by_genre.to_chart("Respondents")),
        ]
        .into_iter()
        .map(|(title, chart)| (title, chart.with_palette(palette)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::normalize;
    use crate::record::RawValue;

    fn row(timestamp: &str, system: &str, genre: &str, satisfaction: &str) -> RawRecord {
        RawRecord::new()
            .with(TIMESTAMP, timestamp)
            .with(MAIN_SYSTEM, system)
            .with(GENRE, genre)
            .with(SATISFACTION, satisfaction)
    }

    #[test]
    fn test_from_raw_defaults() {
        let r = SurveyResponse::from_raw(&RawRecord::new().with(TIMESTAMP, "2024/01/01"));

        assert_eq!(r.main_system, "N/A");
        assert_eq!(r.system_satisfaction, 0);
        assert_eq!(r.max_digital_price, 0.0);
        assert!(r.purchase_interests.is_empty());
    }

    #[test]
    fn test_from_raw_coercion() {
        let raw = RawRecord::new()
            .with(TIMESTAMP, "2024/01/01")
            .with(SATISFACTION, "4 - Satisfied")
            .with(COMBAT, RawValue::Number(3.0))
            .with(MAX_DIGITAL, "$25")
            .with(MAX_HARDBACK, "not sure")
            .with(PURCHASE_INTERESTS, "Books, Dice, ,Minis");
        let r = SurveyResponse::from_raw(&raw);

        assert_eq!(r.system_satisfaction, 4);
        assert_eq!(r.combat_importance, 3);
        assert_eq!(r.max_digital_price, 25.0);
        assert_eq!(r.max_hardback_price, 0.0);
        assert_eq!(r.purchase_interests, vec!["Books", "Dice", "Minis"]);
    }

    #[test]
    fn test_rows_without_timestamp_dropped() {
        let rows = vec![
            row("t1", "D&D 5e", "Fantasy", "5"),
            row("", "Pathfinder", "Fantasy", "4"),
            row("t3", "Mothership", "Sci-Fi", "3"),
        ];
        let records: Vec<SurveyResponse> = normalize(&rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].main_system, "Mothership");
    }

    #[test]
    fn test_spending_bands_first_match_wins() {
        let records: Vec<SurveyResponse> = ["$0-50", "Under $50", "$201-500", "Over $500", "N/A"]
            .iter()
            .map(|s| {
                SurveyResponse::from_raw(&RawRecord::new().with(TIMESTAMP, "t").with(SPENDING, *s))
            })
            .collect();

        let report = SurveyResponse::build_report(&records, &DashboardConfig::default());
        assert_eq!(report.spending.series_counts(0), vec![2, 0, 1, 1]);
    }

    #[test]
    fn test_gameplay_importance_from_averages() {
        let raw = RawRecord::new()
            .with(TIMESTAMP, "t")
            .with(COMBAT, "4")
            .with(ROLEPLAY, "5")
            .with(EXPLORATION, "0");
        let records = vec![SurveyResponse::from_raw(&raw)];

        let report = SurveyResponse::build_report(&records, &DashboardConfig::default());
        assert_eq!(
            report.gameplay_importance,
            vec![
                NamedValue::new("Combat", 4.0),
                NamedValue::new("Roleplaying", 5.0),
                NamedValue::new("Exploration", 0.0),
            ]
        );
    }

    #[test]
    fn test_price_sensitivity_parallel_series() {
        let raw = |digital: &str, hardback: &str| {
            RawRecord::new()
                .with(TIMESTAMP, "t")
                .with(MAX_DIGITAL, digital)
                .with(MAX_HARDBACK, hardback)
        };
        let records: Vec<SurveyResponse> = normalize(&[raw("$10", "$60"), raw("$30", "$100"), raw("", "$25")]);

        let report = SurveyResponse::build_report(&records, &DashboardConfig::default());
        assert_eq!(report.price_sensitivity.series, vec!["Digital", "Hardback"]);
        assert_eq!(report.price_sensitivity.series_counts(0), vec![1, 0, 1, 0, 0]);
        assert_eq!(report.price_sensitivity.series_counts(1), vec![0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_unanswered_prices_counted_when_configured() {
        let records = vec![SurveyResponse::from_raw(&RawRecord::new().with(TIMESTAMP, "t"))];
        let config = DashboardConfig {
            unplaced_values: UnplacedPolicy::unknown("No answer"),
            ..DashboardConfig::default()
        };

        let report = SurveyResponse::build_report(&records, &config);
        let last = report.price_sensitivity.rows.last().unwrap();
        assert_eq!(last.label, "No answer");
        assert_eq!(last.counts, vec![1, 1]);
    }

    #[test]
    fn test_systems_by_genre_total_covers_all_systems() {
        let mut rows = Vec::new();
        for (system, n) in [("A", 10), ("B", 8), ("C", 6), ("D", 4), ("E", 2)] {
            for i in 0..n {
                rows.push(row(&format!("{}{}", system, i), system, "Fantasy", "3"));
            }
        }
        let records: Vec<SurveyResponse> = normalize(&rows);

        let report = SurveyResponse::build_report(&records, &DashboardConfig::default());
        let fantasy = &report.systems_by_genre[0];
        assert_eq!(fantasy.top_members.len(), 3);
        assert_eq!(fantasy.total, 30);
    }

    #[test]
    fn test_top_systems_truncated_by_config() {
        let records: Vec<SurveyResponse> = normalize(&[
            row("1", "A", "Fantasy", "5"),
            row("2", "B", "Horror", "4"),
            row("3", "A", "Fantasy", "3"),
        ]);
        let mut config = DashboardConfig::default();
        config.top_n.systems = 1;

        let report = SurveyResponse::build_report(&records, &config);
        assert_eq!(report.top_systems, vec![NamedCount::new("A", 2)]);
        assert_eq!(
            report.satisfaction_by_genre,
            vec![NamedValue::new("Fantasy", 4.0), NamedValue::new("Horror", 4.0)]
        );
    }

    #[test]
    fn test_charts_have_palette() {
        let records: Vec<SurveyResponse> = normalize(&[row("1", "A", "Fantasy", "5")]);
        let report = SurveyResponse::build_report(&records, &DashboardConfig::default());
        let charts = SurveyResponse::charts(&report, &Palette::default());

        let (title, chart) = &charts[4];
        assert_eq!(*title, "Top Systems");
        assert_eq!(chart.labels, vec!["A"]);
        assert_eq!(chart.datasets[0].colors.len(), 1);
    }
}
