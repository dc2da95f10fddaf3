use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Date, macros::format_description};
use tripview_map::{LatLng, MarkerSpec};
use validator::Validate;

/// How a [`Place`]'s two coordinate fields map onto a map position.
///
/// The recommendation backend stores the axes transposed: its `longitude` field carries the
/// latitude and the other way around.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AxisOrder {
    LatLng,
    #[default]
    Swapped,
}

/// A place coordinate kept exactly as the backend sent it, number or numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(Value);

impl Coordinate {
    /// `None` unless the raw value reads as a finite number.
    pub fn value(&self) -> Option<f64> {
        let value = match &self.0 {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        };

        value.filter(|v| v.is_finite())
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Coordinate>,
    /// Fields this viewer does not read, sent back untouched on save and retry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Place {
    pub fn position(&self, order: AxisOrder) -> Option<LatLng> {
        let latitude = self.latitude.as_ref()?.value()?;
        let longitude = self.longitude.as_ref()?.value()?;

        let (lat, lng) = match order {
            AxisOrder::LatLng => (latitude, longitude),
            AxisOrder::Swapped => (longitude, latitude),
        };

        Some(LatLng::new(lat, lng))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DayPlan {
    /// One marker per place with a position, numbered by list position (1-based).
    pub fn marker_specs(&self, order: AxisOrder) -> Vec<MarkerSpec> {
        self.places
            .iter()
            .enumerate()
            .filter_map(|(i, place)| place.position(order).map(|p| MarkerSpec::new(i + 1, p)))
            .collect()
    }
}

/// Day plans in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(Vec<DayPlan>);

impl Itinerary {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[DayPlan] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&DayPlan> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DayPlan>> for Itinerary {
    fn from(days: Vec<DayPlan>) -> Self {
        Self(days)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub nature: String,
    #[serde(default, rename = "newPlaces")]
    pub new_places: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The user's original request, carried over from the search form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripContext {
    #[serde(default)]
    pub companion: String,
    #[serde(default)]
    pub transport: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    /// Search form fields this viewer does not read, re-sent verbatim on retry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TripContext {
    /// `YYYY-MM-DD`, or the date part of a longer timestamp.
    pub fn start_date(&self) -> Option<Date> {
        let raw = self.start_date.trim();
        let raw = raw.get(..10).unwrap_or(raw);

        match Date::parse(raw, format_description!("[year]-[month]-[day]")) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::debug!(start_date = self.start_date, err = %err, "Unparsable start date");
                None
            }
        }
    }

    pub fn origin(&self) -> Option<LatLng> {
        let origin = LatLng::new(self.latitude?, self.longitude?);
        origin.is_valid().then_some(origin)
    }
}

/// Navigation payload handed over by the search page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripPayload {
    #[serde(default)]
    pub recommendations: Itinerary,
    #[serde(flatten)]
    #[validate(nested)]
    pub context: TripContext,
}
