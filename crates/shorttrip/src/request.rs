use serde::{Deserialize, Serialize};
use tripview_itinerary::{Itinerary, Preferences, TripContext, TripPayload};

/// Body of `POST /api/shortTrip/save`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub recommendations: Itinerary,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl SaveRequest {
    pub fn new(recommendations: &Itinerary, context: &TripContext) -> Self {
        Self {
            recommendations: recommendations.clone(),
            start_date: context.start_date.to_owned(),
            end_date: context.end_date.to_owned(),
            latitude: context.latitude,
            longitude: context.longitude,
        }
    }
}

/// Body of `POST /api/shortTrip/submit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub companion: String,
    pub transport: String,
    pub preferences: Preferences,
    pub gender: String,
    pub age_group: String,
    pub location: TripPayload,
    pub travel_purpose: String,
}

impl SubmitRequest {
    pub fn new(payload: &TripPayload) -> Self {
        let context = &payload.context;

        Self {
            companion: context.companion.to_owned(),
            transport: context.transport.to_owned(),
            preferences: context.preferences.clone(),
            gender: context.gender.clone().unwrap_or_default(),
            age_group: context.age_group.clone().unwrap_or_default(),
            location: payload.clone(),
            travel_purpose: context.purpose.to_owned(),
        }
    }
}

/// The backend answers with the bare array; a wrapped form is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SubmitResponse {
    Bare(Itinerary),
    Wrapped { recommendations: Itinerary },
}

impl From<SubmitResponse> for Itinerary {
    fn from(value: SubmitResponse) -> Self {
        match value {
            SubmitResponse::Bare(itinerary) | SubmitResponse::Wrapped { recommendations: itinerary } => {
                itinerary
            }
        }
    }
}
