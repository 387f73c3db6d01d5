use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::types::PlaceRecord;

fn record(name: &str, address: &str, lat: f64, lng: f64, info: &str, tags: &[&str]) -> PlaceRecord {
    PlaceRecord {
        name: name.to_string(),
        address: address.to_string(),
        lat,
        lng,
        info: info.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Built-in places the browser starts with when no data file is given
pub fn seed_places() -> Vec<PlaceRecord> {
    vec![
        record(
            "Apostolic Church of God",
            "6320 S. Dorchester Ave, Chicago, IL 60637",
            41.7801382,
            -87.5926356,
            "Church of God",
            &["Church"],
        ),
        record(
            "Grand Lux Café",
            "600 N Michigan Ave, Chicago, IL 60411",
            41.8932,
            -87.624535,
            "High End Restaurant",
            &["Food", "Dessert"],
        ),
        record(
            "Sugar Shack",
            "630 W 26th St, Chicago, IL 60616",
            41.8455135,
            -87.6428153,
            "Ice cream and cakes",
            &["Dessert"],
        ),
        record(
            "Lumes Pancake House",
            "11601 S Western, Chicago, Il 60643",
            41.682408,
            -87.6804617,
            "Breakfast Restaurant",
            &["Family", "Breakfast"],
        ),
        record(
            "STACKED",
            "5237 W 95th St, Oak Lawn, IL 60453",
            41.7196111,
            -87.7528999,
            "Unique Breakfast Food",
            &["Breakfast"],
        ),
        record(
            "Jazz Showcase",
            "806 S Plymouth Ct, Chicago, IL 60605",
            41.8717103,
            -87.6288108,
            "Jazz Music",
            &["Entertainment", "Music"],
        ),
        record(
            "Weber's, Bakery",
            "7055 W Archer Ave, Chicago, IL 60638",
            41.7917142,
            -87.7986611,
            "Breakfast",
            &["Food", "Dessert"],
        ),
        record(
            "Publican Quality Meats",
            "825 W Fulton Market, Chicago, IL 60607",
            41.8866042,
            -87.6485378,
            "Deli",
            &["Food", "Drinks"],
        ),
    ]
}

/// Read place records from a JSON array file
pub fn load_places(path: impl AsRef<Path>) -> Result<Vec<PlaceRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let records: Vec<PlaceRecord> = serde_json::from_str(&content)?;
    info!(path = %path.display(), count = records.len(), "Loaded place records");
    Ok(records)
}
