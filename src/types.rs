//! Common types used across the crate.

pub use http::Method as RequestMethod;
pub use http::StatusCode;
pub use http::Uri;

use serde::{Deserialize, Serialize};

use crate::format::format_category;

str_enum! {
    /// A group of attractions searched for around a destination.
    ///
    /// The set is closed: every `AttractionsByCategory` holds exactly these keys,
    /// in this order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Category {
        Culture = "CULTURE",
        EntertainmentAndRecreation = "ENTERTAINMENT_AND_RECREATION",
        FoodAndDrink = "FOOD_AND_DRINK",
        Lodging = "LODGING",
        Shopping = "SHOPPING",
        Transportation = "TRANSPORTATION",
    }
}

str_enum! {
    /// Represents the `rankPreference` parameter of a nearby search.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum RankPreference {
        Popularity = "POPULARITY",
        Distance = "DISTANCE",
    }
}

/// A point on the globe in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Body of `POST places:searchText`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest<'a> {
    pub text_query: &'a str,
}

/// Body of `POST places:searchNearby`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySearchRequest<'a> {
    pub included_primary_types: &'a [&'a str],
    pub rank_preference: RankPreference,
    pub max_result_count: u32,
    pub location_restriction: LocationRestriction,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

/// A circle given by its center and a radius in meters.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Circle {
    pub center: Location,
    pub radius: f64,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 6;

    /// The primary place types searched for this category.
    pub fn place_types(self) -> &'static [&'static str] {
        match self {
            Category::Culture => &[
                "art_gallery",
                "art_studio",
                "cultural_landmark",
                "historical_place",
                "monument",
                "museum",
            ],
            Category::EntertainmentAndRecreation => &[
                "amusement_center",
                "amusement_park",
                "aquarium",
                "casino",
                "comedy_club",
                "dance_hall",
                "event_venue",
                "ferris_wheel",
                "garden",
                "hiking_area",
                "historical_landmark",
                "karaoke",
                "national_park",
                "night_club",
                "observation_deck",
                "opera_house",
                "park",
                "planetarium",
                "plaza",
                "roller_coaster",
                "state_park",
                "tourist_attraction",
                "zoo",
            ],
            Category::FoodAndDrink => &[
                "bakery",
                "bar",
                "cafe",
                "coffee_shop",
                "food_court",
                "ice_cream_shop",
                "pub",
                "restaurant",
                "sandwich_shop",
                "steak_house",
                "tea_house",
                "wine_bar",
            ],
            Category::Lodging => &[
                "bed_and_breakfast",
                "hostel",
                "hotel",
                "inn",
                "lodging",
                "motel",
                "resort_hotel",
            ],
            Category::Shopping => &[
                "book_store",
                "clothing_store",
                "convenience_store",
                "department_store",
                "discount_store",
                "electronics_store",
                "gift_shop",
                "home_goods_store",
                "jewelry_store",
                "market",
                "shopping_mall",
                "store",
                "supermarket",
            ],
            Category::Transportation => &[
                "airport",
                "bus_station",
                "bus_stop",
                "ferry_terminal",
                "subway_station",
                "taxi_stand",
                "train_station",
                "transit_depot",
                "transit_station",
            ],
        }
    }

    /// Human readable name, e.g. `Food & Drink`.
    pub fn label(self) -> String {
        format_category(self.as_ref())
    }

    /// Looks a category up by its wire key, e.g. `FOOD_AND_DRINK`.
    pub fn from_key(key: &str) -> Option<Self> {
        Category::ALL.iter().copied().find(|c| c.as_ref() == key)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Location {
    /// Creates a `Location` from a `(latitude, longitude)` pair.
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Location {
            latitude,
            longitude,
        }
    }
}

impl Default for RankPreference {
    fn default() -> Self {
        RankPreference::Popularity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_declared_in_index_order() {
        assert_eq!(Category::ALL.len(), Category::COUNT);
        for (i, &c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Category::from_key(c.as_ref()), Some(c));
            assert!(!c.place_types().is_empty());
        }
        assert_eq!(Category::from_key("NIGHTLIFE"), None);
    }

    #[test]
    fn nearby_request_wire_format() {
        let req = NearbySearchRequest {
            included_primary_types: &["museum", "monument"],
            rank_preference: RankPreference::Popularity,
            max_result_count: 10,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: Location::new(48.85, 2.35),
                    radius: 8000.0,
                },
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "includedPrimaryTypes": ["museum", "monument"],
                "rankPreference": "POPULARITY",
                "maxResultCount": 10,
                "locationRestriction": {
                    "circle": {
                        "center": { "latitude": 48.85, "longitude": 2.35 },
                        "radius": 8000.0
                    }
                }
            })
        );
    }
}
