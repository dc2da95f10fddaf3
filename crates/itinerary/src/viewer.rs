use time::{Date, Duration};

use crate::{Itinerary, Place};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Badge {
    First,
    Middle,
    Last,
}

impl Badge {
    pub fn for_position(index: usize, len: usize) -> Self {
        if index == 0 {
            Badge::First
        } else if index + 1 == len {
            Badge::Last
        } else {
            Badge::Middle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRow {
    pub number: usize,
    pub name: String,
    pub city: String,
    pub badge: Badge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub index: usize,
    pub label: String,
    pub places: Vec<PlaceRow>,
    pub has_previous: bool,
    pub is_last: bool,
}

/// Current-day pointer into an itinerary.
#[derive(Debug, Clone)]
pub struct ItineraryViewer {
    itinerary: Itinerary,
    current: usize,
}

impl ItineraryViewer {
    pub fn new(itinerary: Itinerary) -> Self {
        Self {
            itinerary,
            current: 0,
        }
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn current_day(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.itinerary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itinerary.is_empty()
    }

    /// Moves to the next day. Returns `false` when already on the last day.
    pub fn next(&mut self) -> bool {
        let last = self.len().saturating_sub(1);
        let next = (self.current + 1).min(last);
        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Moves to the previous day. Returns `false` when already on the first day.
    pub fn previous(&mut self) -> bool {
        let previous = self.current.saturating_sub(1);
        let changed = previous != self.current;
        self.current = previous;
        changed
    }

    pub fn places(&self) -> &[Place] {
        self.itinerary
            .get(self.current)
            .map(|day| day.places.as_slice())
            .unwrap_or_default()
    }

    /// `None` when there is nothing to show.
    pub fn view(&self) -> Option<DayView> {
        let day = self.itinerary.get(self.current)?;
        let len = day.places.len();

        let places = day
            .places
            .iter()
            .enumerate()
            .map(|(i, place)| PlaceRow {
                number: i + 1,
                name: place.name.to_owned(),
                city: place.city.to_owned(),
                badge: Badge::for_position(i, len),
            })
            .collect();

        Some(DayView {
            index: self.current,
            label: day.day.to_owned(),
            places,
            has_previous: self.current > 0,
            is_last: self.current + 1 >= self.len(),
        })
    }

    pub fn current_date(&self, start: Date) -> Option<Date> {
        day_date(start, self.current)
    }
}

/// Calendar date of the day at `index`, counting from `start`.
pub fn day_date(start: Date, index: usize) -> Option<Date> {
    start.checked_add(Duration::days(i64::try_from(index).ok()?))
}
