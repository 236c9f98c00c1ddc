use super::normalizer::{normalize_category, parse_amount, parse_flag};
use crate::workflows::sale_profile::domain::{MaintenanceCategory, RecordTypeTag};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct MaintenanceRow {
    pub(crate) date: Option<String>,
    pub(crate) title: String,
    pub(crate) category: Option<MaintenanceCategory>,
    pub(crate) mileage: Option<u32>,
    pub(crate) cost: Option<u64>,
    pub(crate) is_preventive: bool,
    pub(crate) type_tag: RecordTypeTag,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<MaintenanceRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CsvRow>() {
        let row = record?;
        if row.title.is_none() && row.date.is_none() {
            continue;
        }

        rows.push(MaintenanceRow {
            category: row.category.as_deref().and_then(normalize_category),
            mileage: row
                .mileage
                .as_deref()
                .and_then(parse_amount)
                .and_then(|value| u32::try_from(value).ok()),
            cost: row.cost.as_deref().and_then(parse_amount),
            is_preventive: row.preventive.as_deref().is_some_and(parse_flag),
            type_tag: row
                .type_tag
                .as_deref()
                .map(RecordTypeTag::parse)
                .unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            date: row.date,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", default, deserialize_with = "empty_string_as_none")]
    date: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(
        rename = "Category",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    category: Option<String>,
    #[serde(rename = "Mileage", default, deserialize_with = "empty_string_as_none")]
    mileage: Option<String>,
    #[serde(rename = "Cost", default, deserialize_with = "empty_string_as_none")]
    cost: Option<String>,
    #[serde(
        rename = "Preventive",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    preventive: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "empty_string_as_none")]
    type_tag: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
