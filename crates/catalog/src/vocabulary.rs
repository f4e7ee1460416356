//! IOOS category controlled vocabulary, as used by ERDDAP's `ioos_category`
//! attribute.

pub const IOOS_CATEGORIES: &[&str] = &[
    "Bathymetry",
    "Biology",
    "Bottom Character",
    "CO2",
    "Colored Dissolved Organic Matter",
    "Contaminants",
    "Currents",
    "Dissolved Nutrients",
    "Dissolved O2",
    "Ecology",
    "Fish Abundance",
    "Fish Species",
    "Heat Flux",
    "Hydrology",
    "Ice Distribution",
    "Identifier",
    "Location",
    "Meteorology",
    "Ocean Color",
    "Optical Properties",
    "Other",
    "Pathogens",
    "Physical Oceanography",
    "Phytoplankton Species",
    "Pressure",
    "Productivity",
    "Quality",
    "Salinity",
    "Sea Level",
    "Soils",
    "Statistics",
    "Stream Flow",
    "Surface Waves",
    "Taxonomy",
    "Temperature",
    "Time",
    "Total Suspended Matter",
    "Unknown",
    "Wind",
    "Zooplankton Species",
    "Zooplankton Abundance",
];

/// Exact, case-sensitive membership in [`IOOS_CATEGORIES`]
pub fn is_known_category(category: &str) -> bool {
    IOOS_CATEGORIES.contains(&category)
}
