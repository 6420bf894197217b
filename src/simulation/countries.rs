use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::common::Country;

use super::error::SimulationError;

#[derive(Debug, Deserialize)]
struct RawName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawIdd {
    root: Option<String>,
    #[serde(default)]
    suffixes: Vec<String>,
}

/// Shape returned by the public directory (`name,cca2,idd,flag` fields).
#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawName,
    cca2: String,
    #[serde(default)]
    idd: RawIdd,
    #[serde(default)]
    flag: String,
}

/// Drop entries without a dial root, join root + first suffix, sort by name.
pub fn flatten_directory(payload: &str) -> Result<Vec<Country>, SimulationError> {
    let raw: Vec<RawCountry> = serde_json::from_str(payload)?;
    let mut countries: Vec<Country> = raw
        .into_iter()
        .filter_map(|entry| {
            let root = entry.idd.root.filter(|root| !root.is_empty())?;
            let suffix = entry.idd.suffixes.into_iter().next().unwrap_or_default();
            Some(Country {
                name: entry.name.common,
                code: entry.cca2,
                dial_code: format!("{root}{suffix}"),
                flag: entry.flag,
            })
        })
        .collect();

    if countries.is_empty() {
        return Err(SimulationError::EmptyDirectory);
    }
    countries.sort_by_cached_key(|country| (collation_key(&country.name), country.name.clone()));
    Ok(countries)
}

/// Case- and accent-insensitive sort key, so "Åland Islands" sits among the A's.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub async fn fetch_countries(url: &str) -> Result<Vec<Country>, SimulationError> {
    let payload = reqwest::get(url).await?.error_for_status()?.text().await?;
    flatten_directory(&payload)
}
