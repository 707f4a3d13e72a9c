//! Routing table for the fixture server
//!
//! Paths resolve to a [`Route`] in a fixed order; the first match wins and
//! [`Route::NotFound`] is the fallback.

const APOD: &str = "/planetary/apod";
const NEO_FEED: &str = "/neo/rest/v1/feed";
const CURIOSITY_PHOTOS: &str = "/mars-photos/api/v1/rovers/curiosity/photos";
const EPIC_NATURAL: &str = "/EPIC/api/natural";
const EPIC_BY_DATE_PREFIX: &str = "/EPIC/api/natural/date/";
const DONKI_FLR: &str = "/DONKI/FLR";
const DONKI_CME: &str = "/DONKI/CME";
const DONKI_GST: &str = "/DONKI/GST";
const DONKI_RBE: &str = "/DONKI/RBE";
const DONKI_NOTIFICATIONS: &str = "/DONKI/notifications";

/// Space weather event types served under `/DONKI`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonkiEvent {
    /// Solar flare (`FLR`)
    Flare,
    /// Coronal mass ejection (`CME`)
    CoronalMassEjection,
    /// Geomagnetic storm (`GST`)
    GeomagneticStorm,
    /// Radiation belt enhancement (`RBE`)
    RadiationBeltEnhancement,
}

/// A known endpoint of the emulated API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Astronomy picture of the day
    Apod,
    /// Near earth object feed
    NeoFeed,
    /// Curiosity rover photos
    CuriosityPhotos,
    /// Most recent EPIC natural-color imagery
    EpicNatural,
    /// EPIC imagery for the date in the final path segment
    EpicByDate(String),
    /// A DONKI event listing
    Donki(DonkiEvent),
    /// DONKI notification feed
    DonkiNotifications,
    /// Anything else
    NotFound,
}

impl Route {
    /// Resolve a request path (without query string) to a route
    pub fn resolve(path: &str) -> Self {
        match path {
            APOD => Route::Apod,
            NEO_FEED => Route::NeoFeed,
            CURIOSITY_PHOTOS => Route::CuriosityPhotos,
            EPIC_NATURAL => Route::EpicNatural,
            p if p.starts_with(EPIC_BY_DATE_PREFIX) => {
                Route::EpicByDate(last_segment(p).to_string())
            }
            DONKI_FLR => Route::Donki(DonkiEvent::Flare),
            DONKI_CME => Route::Donki(DonkiEvent::CoronalMassEjection),
            DONKI_GST => Route::Donki(DonkiEvent::GeomagneticStorm),
            DONKI_RBE => Route::Donki(DonkiEvent::RadiationBeltEnhancement),
            DONKI_NOTIFICATIONS => Route::DonkiNotifications,
            _ => Route::NotFound,
        }
    }
}

/// Final `/`-separated segment, verbatim (empty for a trailing slash)
fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Decoded query string parameters, in request order
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value of `name`, treating an empty value as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// First value of `name`, or `default` when absent or empty
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }
}
