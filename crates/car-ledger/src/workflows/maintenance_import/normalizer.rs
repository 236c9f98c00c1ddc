use crate::workflows::sale_profile::domain::MaintenanceCategory;

/// Maps free-form category labels from log exports onto stored categories.
pub(crate) fn normalize_category(value: &str) -> Option<MaintenanceCategory> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let key = collapsed.to_ascii_lowercase();

    let canonical = match key.as_str() {
        "" | "-" | "none" | "unclassified" => return None,
        "oil" | "engine oil" | "oil change" | "oil filter" => "oil",
        "tire" | "tires" | "tyre" | "tyres" | "tire rotation" => "tire",
        "brake" | "brakes" | "brake pads" | "brake fluid" => "brake",
        "battery" | "12v battery" => "battery",
        "coolant" | "antifreeze" | "llc" | "radiator" => "coolant",
        _ => collapsed.as_str(),
    };

    MaintenanceCategory::parse(canonical)
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true" | "x"
    )
}

/// Digits of a formatted number such as `"¥12,800"` or `"45,210 km"`.
pub(crate) fn parse_amount(value: &str) -> Option<u64> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
