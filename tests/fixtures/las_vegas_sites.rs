//! Real Las Vegas / Henderson sites for realistic fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use itinerary_planner::model::Location;

/// Hotel on the Strip, used as the daily start.
pub fn hotel() -> Location {
    Location::start("bellagio", "Bellagio", (36.1126, -115.1767))
}

pub fn convention_center() -> Location {
    Location::must_visit("lvcc", "Las Vegas Convention Center", (36.1315, -115.1516)).with_dwell_secs(90 * 60)
}

pub fn client_downtown() -> Location {
    Location::must_visit("downtown", "Client office Downtown", (36.1727, -115.1580)).with_dwell_secs(60 * 60)
}

pub fn supplier_henderson() -> Location {
    Location::must_visit("henderson", "Supplier Henderson", (36.0308, -115.0825)).with_dwell_secs(60 * 60)
}

pub fn lunch_strip() -> Location {
    Location::candidate("burgr", "Gordon Ramsay BurGR", (36.1107195, -115.1720818))
        .with_dwell_secs(45 * 60)
        .with_priority(2.0)
}

pub fn partner_east() -> Location {
    Location::candidate("east", "Partner showroom East", (36.1450055, -115.0482587))
        .with_dwell_secs(45 * 60)
        .with_priority(1.0)
}

pub fn dinner_south() -> Location {
    Location::candidate("bootlegger", "Bootlegger Bistro", (36.0492047, -115.1715744))
        .with_dwell_secs(75 * 60)
        .with_priority(3.0)
}
