use geo::Coord;

/// A place a traveller can navigate to.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The engine
/// copies places around and displays their names but never interprets the
/// address or position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waytrail_core::Place;
///
/// let place = Place::new("Museum", "1 Exhibition Road", Coord { x: -0.17, y: 51.49 });
/// assert_eq!(place.name, "Museum");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Display name.
    pub name: String,
    /// Free-form postal address.
    pub address: String,
    /// Geographic position.
    pub location: Coord<f64>,
}

impl Place {
    /// Construct a place from its parts.
    pub fn new(name: impl Into<String>, address: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            location,
        }
    }

    /// Construct a place with only a name, an empty address and the origin
    /// as its position.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::Place;
    ///
    /// let place = Place::named("Harbour");
    /// assert!(place.address.is_empty());
    /// ```
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, String::new(), Coord { x: 0.0, y: 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_place_has_origin_location() {
        let place = Place::named("Harbour");
        assert_eq!(place.location, Coord { x: 0.0, y: 0.0 });
        assert_eq!(place.name, "Harbour");
    }
}
