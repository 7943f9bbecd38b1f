//! The fixed administrative hierarchy the drill-down runs over.

use crate::error::AtlasError;
use crate::normalize::normalize_province;

/// Code the geometry source uses for the whole-country boundary set.
pub const COUNTRY_CODE: &str = "100000";

/// Name the country geometry is registered under.
pub const COUNTRY_MAP_NAME: &str = "china";

/// Canonical provinces in map-rendering order, with their admin codes.
/// Every province keeps a stable code; the geometry source is keyed by it.
pub static PROVINCES: [(&str, &str); 34] = [
    ("北京", "110000"),
    ("天津", "120000"),
    ("上海", "310000"),
    ("重庆", "500000"),
    ("河北", "130000"),
    ("山西", "140000"),
    ("辽宁", "210000"),
    ("吉林", "220000"),
    ("黑龙江", "230000"),
    ("江苏", "320000"),
    ("浙江", "330000"),
    ("安徽", "340000"),
    ("福建", "350000"),
    ("江西", "360000"),
    ("山东", "370000"),
    ("河南", "410000"),
    ("湖北", "420000"),
    ("湖南", "430000"),
    ("广东", "440000"),
    ("广西", "450000"),
    ("海南", "460000"),
    ("四川", "510000"),
    ("贵州", "520000"),
    ("云南", "530000"),
    ("西藏", "540000"),
    ("陕西", "610000"),
    ("甘肃", "620000"),
    ("青海", "630000"),
    ("宁夏", "640000"),
    ("新疆", "650000"),
    ("内蒙古", "150000"),
    ("香港", "810000"),
    ("澳门", "820000"),
    ("台湾", "710000"),
];

/// Direct-administered municipalities drill on the district field instead
/// of the city field at the second level.
static MUNICIPALITIES: [&str; 4] = ["北京", "天津", "上海", "重庆"];

pub fn province_names() -> impl Iterator<Item = &'static str> {
    PROVINCES.iter().map(|(name, _)| *name)
}

/// Admin code for a canonical province name.
pub fn province_code(name: &str) -> Result<&'static str, AtlasError> {
    PROVINCES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| AtlasError::UnknownRegion(name.to_string()))
}

/// Normalizes free text and resolves it against the province table.
/// Anything that does not land in the table counts as unknown.
pub fn canonical_province(raw: &str) -> Option<&'static str> {
    let name = normalize_province(raw)?;
    province_names().find(|candidate| *candidate == name)
}

pub fn is_municipality(name: &str) -> bool {
    MUNICIPALITIES.contains(&name)
}
