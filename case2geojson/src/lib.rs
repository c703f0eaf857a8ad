//! Extracts every geolocated entity from a CASE/UCO graph document and
//! converts them to a GeoJSON FeatureCollection. One linear pipeline: load
//! the graph, run one fixed query, map each solution to a [`GeoRecord`],
//! build one Feature per record, write the document.

#[macro_use]
extern crate log;

mod convert;
mod record;

pub use convert::{feature_collection, write_geojson};
pub use record::GeoRecord;

use anyhow::Result;
use casegraph::CaseGraph;

/// The fixed query pulling every uco-location:Location, with its coordinates
/// and simple-address fields when the corresponding facets exist. The query
/// text and its namespace bindings are a contract with the CASE ontology;
/// don't edit a binding without updating the table in `record.rs`.
pub const LOCATION_QUERY: &str = r#"
PREFIX uco-core: <https://ontology.unifiedcyberontology.org/uco/core/>
PREFIX uco-location: <https://ontology.unifiedcyberontology.org/uco/location/>
SELECT ?lLatitude ?lLongitude ?lAddressType ?lCountry ?lLocality ?lPostalCode ?lRegion ?lStreet
WHERE
{
	?nLocation a uco-location:Location .
	OPTIONAL
	{
		?nLocation uco-core:hasFacet ?nLatLongFacet .
		?nLatLongFacet a uco-location:LatLongCoordinatesFacet .
		OPTIONAL { ?nLatLongFacet uco-location:latitude ?lLatitude . }
		OPTIONAL { ?nLatLongFacet uco-location:longitude ?lLongitude . }
	}

	OPTIONAL {
		?nLocation uco-core:hasFacet ?nSimpleAddressFacet .
		?nSimpleAddressFacet a uco-location:SimpleAddressFacet .
		OPTIONAL { ?nSimpleAddressFacet uco-location:addressType ?lAddressType . }
		OPTIONAL { ?nSimpleAddressFacet uco-location:country ?lCountry . }
		OPTIONAL { ?nSimpleAddressFacet uco-location:locality ?lLocality . }
		OPTIONAL { ?nSimpleAddressFacet uco-location:postalCode ?lPostalCode . }
		OPTIONAL { ?nSimpleAddressFacet uco-location:region ?lRegion . }
		OPTIONAL { ?nSimpleAddressFacet uco-location:street ?lStreet . }
	}
}
"#;

/// Runs the location query and maps every solution to a `GeoRecord`,
/// preserving result order.
pub fn extract_records(graph: &CaseGraph) -> Result<Vec<GeoRecord>> {
    let rows = graph.query(LOCATION_QUERY)?;
    info!("Extracted {} location rows", rows.len());
    Ok(rows.iter().map(GeoRecord::from_row).collect())
}
