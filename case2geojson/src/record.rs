use casegraph::Row;

/// One extracted location. Every field is a string because SPARQL solutions
/// are string-typed; the coordinates only get parsed when deciding whether
/// the record has a usable point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoRecord {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address_type: Option<String>,
    pub street: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Query binding name -> record field. Adding a binding to the query means
/// adding exactly one entry here.
const BINDINGS: [(&str, fn(&mut GeoRecord) -> &mut Option<String>); 8] = [
    ("lLatitude", |r: &mut GeoRecord| &mut r.latitude),
    ("lLongitude", |r: &mut GeoRecord| &mut r.longitude),
    ("lAddressType", |r: &mut GeoRecord| &mut r.address_type),
    ("lStreet", |r: &mut GeoRecord| &mut r.street),
    ("lLocality", |r: &mut GeoRecord| &mut r.locality),
    ("lRegion", |r: &mut GeoRecord| &mut r.region),
    ("lPostalCode", |r: &mut GeoRecord| &mut r.postal_code),
    ("lCountry", |r: &mut GeoRecord| &mut r.country),
];

impl GeoRecord {
    /// Copies whichever known bindings are present in the row. Absent
    /// bindings leave the field unset (never an empty string); bindings the
    /// table doesn't know are ignored. Pure field mapping -- no validation.
    pub fn from_row(row: &Row) -> GeoRecord {
        let mut record = GeoRecord::default();
        for (binding, field) in BINDINGS {
            if let Some(value) = row.get(binding) {
                *field(&mut record) = Some(value.clone());
            }
        }
        record
    }

    /// Returns the record's position as (longitude, latitude) if both
    /// coordinates are present, parse as finite numbers, and aren't the
    /// (0, 0) placeholder the source data uses for "no location". Any
    /// non-numeric text fails closed.
    pub fn point(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.latitude.as_deref()?.parse().ok()?;
        let lon: f64 = self.longitude.as_deref()?.parse().ok()?;
        // parse() happily accepts "inf" and "NaN" spellings
        if !lat.is_finite() || !lon.is_finite() || lat == 0.0 || lon == 0.0 {
            return None;
        }
        Some((lon, lat))
    }
}
