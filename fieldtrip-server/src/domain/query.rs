//! Trip planning query parameters.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The parameters shared by every itinerary in a group plan.
///
/// Serialized with the planner's camelCase names, ISO dates and 24-hour
/// times. Deserializing also accepts the planner's own string values
/// (`05-14-2024`, `9:05am`, `"true"`, comma-joined route lists), which is
/// how older saved trips recorded their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanQuery {
    /// Origin, as `lat,lon` or `name::lat,lon`
    pub from_place: String,
    /// Destination, in the same format as `from_place`
    pub to_place: String,
    #[serde(deserialize_with = "lenient::date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "lenient::time")]
    pub time: NaiveTime,
    /// Treat `time` as the latest arrival rather than the earliest departure
    #[serde(default, deserialize_with = "lenient::flag")]
    pub arrive_by: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::number"
    )]
    pub max_walk_distance: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub preferred_routes: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient::list"
    )]
    pub banned_routes: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "lenient::flag")]
    pub show_intermediate_stops: bool,
}

fn default_true() -> bool {
    true
}

/// Deserializers accepting both this crate's values and the planner's
/// query-string values.
mod lenient {
    use chrono::{NaiveDate, NaiveTime};
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        String(String),
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%m-%d-%Y"))
            .map_err(|_| D::Error::custom(format!("invalid date {s:?}")))
    }

    pub fn time<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(d)?;
        let s = s.trim();
        ["%H:%M:%S", "%H:%M", "%I:%M%p", "%I:%M %p"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid time {s:?}")))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match BoolOrString::deserialize(d)? {
            BoolOrString::Bool(b) => Ok(b),
            BoolOrString::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(D::Error::custom(format!("invalid flag {s:?}"))),
            },
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<NumberOrString>::deserialize(d)? {
            None => Ok(None),
            Some(NumberOrString::Number(n)) => Ok(Some(n)),
            Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
            Some(NumberOrString::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number {s:?}"))),
        }
    }

    pub fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match ListOrString::deserialize(d)? {
            ListOrString::List(items) => items,
            ListOrString::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

impl PlanQuery {
    /// Create a depart-at query with no routing preferences.
    pub fn new(
        from_place: impl Into<String>,
        to_place: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            from_place: from_place.into(),
            to_place: to_place.into(),
            date,
            time,
            arrive_by: false,
            max_walk_distance: None,
            preferred_routes: Vec::new(),
            banned_routes: Vec::new(),
            show_intermediate_stops: true,
        }
    }

    /// Make this an arrive-by query.
    pub fn arriving_by(mut self) -> Self {
        self.arrive_by = true;
        self
    }

    pub fn with_max_walk_distance(mut self, meters: f64) -> Self {
        self.max_walk_distance = Some(meters);
        self
    }

    /// Date in the planner's `MM-DD-YYYY` format.
    pub fn date_param(&self) -> String {
        self.date.format("%m-%d-%Y").to_string()
    }

    /// Time in the planner's `h:mma` format (e.g. `9:05am`).
    pub fn time_param(&self) -> String {
        self.time.format("%-I:%M%P").to_string()
    }

    /// Query-string pairs for a planning request, excluding banned trips.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("fromPlace", self.from_place.clone()),
            ("toPlace", self.to_place.clone()),
            ("date", self.date_param()),
            ("time", self.time_param()),
            ("arriveBy", self.arrive_by.to_string()),
            ("showIntermediateStops", self.show_intermediate_stops.to_string()),
        ];
        if let Some(max_walk) = self.max_walk_distance {
            params.push(("maxWalkDistance", max_walk.to_string()));
        }
        if !self.preferred_routes.is_empty() {
            params.push(("preferredRoutes", self.preferred_routes.join(",")));
        }
        if !self.banned_routes.is_empty() {
            params.push(("bannedRoutes", self.banned_routes.join(",")));
        }
        params
    }
}
