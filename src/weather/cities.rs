/// City picker entries: display name and the query the server expects.
pub const CITY_PRESETS: &[(&str, &str)] = &[
    ("東京", "Tokyo,JP"),
    ("大阪", "Osaka,JP"),
    ("名古屋", "Nagoya,JP"),
    ("福岡", "Fukuoka,JP"),
    ("札幌", "Sapporo,JP"),
    ("仙台", "Sendai,JP"),
    ("広島", "Hiroshima,JP"),
    ("京都", "Kyoto,JP"),
    ("神戸", "Kobe,JP"),
    ("横浜", "Yokohama,JP"),
];

pub const DEFAULT_CITY: &str = "Tokyo,JP";

/// Maps a preset display name to its query; anything else passes through.
pub fn city_query(name: &str) -> &str {
    CITY_PRESETS
        .iter()
        .find(|(display, _)| *display == name)
        .map_or(name, |(_, query)| query)
}
