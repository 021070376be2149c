//! Places returned by the API.

use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::client::MAX_PHOTO_PX;
use crate::types::{Category, Location};

/// ID of a place.
pub type PlaceId = String;

/// A destination returned by a text search.
///
/// # Reference
///
/// 1. [Place — Places API][1]
///
/// [1]: https://developers.google.com/maps/documentation/places/web-service/reference/rest/v1/places
#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Unique identifier of the place.
    pub id: PlaceId,

    /// Resource name of the place, in the form `places/{id}`.
    #[serde(default)]
    pub name: String,

    /// Localized name of the place, e.g. `Paris`.
    #[serde(default)]
    pub display_name: LocalizedText,

    /// Full human-readable address, e.g. `Paris, France`.
    #[serde(default)]
    pub formatted_address: String,

    pub location: Location,

    /// Photo references, most relevant first. May be empty.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// A place found by a nearby search, scoped to one [`Category`].
#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: PlaceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: LocalizedText,
    #[serde(default)]
    pub formatted_address: String,
    pub location: Location,
    #[serde(default)]
    pub photos: Vec<Photo>,

    /// Average user rating between 1.0 and 5.0, if the place has been rated.
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub website_uri: Option<String>,
}

/// Localized text with its BCP-47 language code.
#[derive(Clone, Debug, Default, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language_code: String,
}

/// A reference to a remotely hosted image of a place.
///
/// It has to be resolved with [`Client::photo_url`](crate::Client::photo_url)
/// before it can be fetched.
#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Resource name, in the form `places/{place_id}/photos/{photo}`.
    pub name: String,
    #[serde(default)]
    pub width_px: u32,
    #[serde(default)]
    pub height_px: u32,
    #[serde(default)]
    pub author_attributions: Vec<AuthorAttribution>,
    #[serde(default)]
    pub flag_content_uri: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, serde::Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub photo_uri: String,
}

/// Attractions grouped by [`Category`].
///
/// Always holds exactly one (possibly empty) list per category.
/// A category without matches is an empty list, never a missing key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttractionsByCategory {
    lists: [Vec<Attraction>; Category::COUNT],
}

/// `"<name>: <rating>"` for one attraction, as listed on a category card.
pub struct RatingLabel<'a>(&'a Attraction);

/// Response body of `places:searchText` and `places:searchNearby`.
#[derive(Deserialize)]
pub(crate) struct Places<T> {
    #[serde(default = "Vec::new")]
    pub places: Vec<T>,
}

/// Response body of a photo media request made with `skipHttpRedirect`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PhotoMedia {
    pub photo_uri: String,
}

impl SearchResult {
    /// The photo used as the background of this result's card and hero image.
    pub fn hero_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }
}

impl Photo {
    /// The size to request the photo at for a full-width background.
    ///
    /// A dimension the API left out is requested at [`MAX_PHOTO_PX`].
    pub fn full_size(&self) -> (u32, u32) {
        let or_max = |px: u32| if px == 0 { MAX_PHOTO_PX } else { px };
        (or_max(self.width_px), or_max(self.height_px))
    }
}

impl Attraction {
    pub fn rating_label(&self) -> RatingLabel<'_> {
        RatingLabel(self)
    }
}

impl AttractionsByCategory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> &[Attraction] {
        &self.lists[category.index()]
    }

    /// Replaces the list of `category`, returning the previous one.
    pub fn insert(&mut self, category: Category, attractions: Vec<Attraction>) -> Vec<Attraction> {
        std::mem::replace(&mut self.lists[category.index()], attractions)
    }

    /// Iterates over every category in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Attraction])> + '_ {
        Category::ALL
            .iter()
            .zip(self.lists.iter())
            .map(|(&c, list)| (c, &list[..]))
    }

    /// The keys of the mapping, in iteration order.
    pub fn categories(&self) -> &'static [Category] {
        Category::ALL
    }

    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Total number of attractions across all categories.
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

impl FromIterator<(Category, Vec<Attraction>)> for AttractionsByCategory {
    fn from_iter<I: IntoIterator<Item = (Category, Vec<Attraction>)>>(iter: I) -> Self {
        let mut ret = AttractionsByCategory::new();
        for (category, list) in iter {
            ret.insert(category, list);
        }
        ret
    }
}

impl Serialize for AttractionsByCategory {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(Category::COUNT))?;
        for (category, list) in self.iter() {
            map.serialize_entry(&category, list)?;
        }
        map.end()
    }
}

impl<'a> Display for RatingLabel<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.0.display_name.text)?;
        match self.0.rating {
            Some(rating) => Display::fmt(&rating, f),
            None => f.write_str("0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "id": "p1",
        "name": "places/p1",
        "displayName": { "text": "Paris", "languageCode": "en" },
        "formattedAddress": "Paris, France",
        "location": { "latitude": 48.8566, "longitude": 2.3522 },
        "photos": [
            {
                "name": "places/p1/photos/a",
                "widthPx": 4000,
                "heightPx": 3000,
                "authorAttributions": [{ "displayName": "someone" }],
                "flagContentUri": "https://example.com/flag"
            }
        ]
    }"#;

    fn attraction(name: &str, rating: Option<f64>) -> Attraction {
        Attraction {
            id: name.to_owned(),
            name: format!("places/{}", name),
            display_name: LocalizedText {
                text: name.to_owned(),
                language_code: "en".to_owned(),
            },
            formatted_address: String::new(),
            location: Location::default(),
            photos: Vec::new(),
            rating,
            website_uri: None,
        }
    }

    #[test]
    fn search_result() {
        let result: SearchResult = serde_json::from_str(PARIS).unwrap();
        assert_eq!(result.id, "p1");
        assert_eq!(result.display_name.text, "Paris");
        assert_eq!(result.location, Location::new(48.8566, 2.3522));
        assert_eq!(result.photos.len(), 1);
        assert_eq!(result.hero_photo().unwrap().width_px, 4000);
    }

    #[test]
    fn missing_optional_fields() {
        let json = r#"{ "id": "x", "location": { "latitude": 1.0, "longitude": 2.0 } }"#;
        let attraction: Attraction = serde_json::from_str(json).unwrap();
        assert!(attraction.photos.is_empty());
        assert_eq!(attraction.rating, None);
        assert_eq!(attraction.website_uri, None);

        let places: Places<Attraction> = serde_json::from_str("{}").unwrap();
        assert!(places.places.is_empty());
    }

    #[test]
    fn full_size_without_dimensions() {
        let photo: Photo = serde_json::from_str(r#"{ "name": "places/x/photos/0" }"#).unwrap();
        assert_eq!(photo.full_size(), (MAX_PHOTO_PX, MAX_PHOTO_PX));

        let photo: Photo =
            serde_json::from_str(r#"{ "name": "places/x/photos/1", "heightPx": 900 }"#).unwrap();
        assert_eq!(photo.full_size(), (MAX_PHOTO_PX, 900));
    }

    #[test]
    fn always_has_every_category() {
        let mut map = AttractionsByCategory::new();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), Category::COUNT);

        map.insert(Category::Lodging, vec![attraction("inn", Some(4.0))]);
        let keys: Vec<_> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, Category::ALL);
        assert_eq!(map.get(Category::Lodging).len(), 1);
        assert!(map.get(Category::Culture).is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn serializes_in_category_order() {
        let map: AttractionsByCategory = vec![(Category::Shopping, Vec::<Attraction>::new())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            "{\"CULTURE\":[],\"ENTERTAINMENT_AND_RECREATION\":[],\"FOOD_AND_DRINK\":[],\
             \"LODGING\":[],\"SHOPPING\":[],\"TRANSPORTATION\":[]}"
        );
    }

    #[test]
    fn rating_label() {
        assert_eq!(
            attraction("Louvre", Some(4.7)).rating_label().to_string(),
            "Louvre: 4.7"
        );
        assert_eq!(attraction("Kiosk", None).rating_label().to_string(), "Kiosk: 0");
    }
}
