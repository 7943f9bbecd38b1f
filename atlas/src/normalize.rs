//! Location name normalization.
//!
//! The canonical form is the short name ("广西", "海淀"). Both halves of
//! every join go through these two functions: event fields when counting,
//! clicked region names, and geometry feature names at registration.

/// Provinces whose long form is not just the short name plus 省/市.
const PROVINCE_ALIASES: [(&str, &str); 7] = [
    ("广西壮族自治区", "广西"),
    ("内蒙古自治区", "内蒙古"),
    ("西藏自治区", "西藏"),
    ("宁夏回族自治区", "宁夏"),
    ("新疆维吾尔自治区", "新疆"),
    ("香港特别行政区", "香港"),
    ("澳门特别行政区", "澳门"),
];

const PROVINCE_SUFFIXES: [&str; 2] = ["省", "市"];

// 地区 must come before 区, longest match wins.
const SUBREGION_SUFFIXES: [&str; 6] = ["自治州", "地区", "市", "县", "区", "盟"];

/// Canonical short form of a province name, or `None` for empty input.
pub fn normalize_province(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        return None;
    }

    for (long, short) in PROVINCE_ALIASES {
        if name == long {
            return Some(short.to_string());
        }
    }

    strip_one_suffix(name, &PROVINCE_SUFFIXES)
}

/// Canonical short form of a city or district name, or `None` for empty
/// input. Exactly one administrative suffix is removed.
pub fn normalize_subregion(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() {
        return None;
    }

    strip_one_suffix(name, &SUBREGION_SUFFIXES)
}

fn strip_one_suffix(name: &str, suffixes: &[&str]) -> Option<String> {
    for suffix in suffixes {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if stripped.is_empty() {
                return None;
            }
            return Some(stripped.to_string());
        }
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_province, normalize_subregion};

    #[test]
    fn test_long_and_short_forms_merge() {
        assert_eq!(normalize_province("广西壮族自治区").as_deref(), Some("广西"));
        assert_eq!(normalize_province("广西").as_deref(), Some("广西"));
        assert_eq!(normalize_province("北京市").as_deref(), Some("北京"));
        assert_eq!(normalize_province("北京").as_deref(), Some("北京"));
        assert_eq!(normalize_province("台湾省").as_deref(), Some("台湾"));
        assert_eq!(normalize_province("香港特别行政区").as_deref(), Some("香港"));
    }

    #[test]
    fn test_province_idempotent() {
        for raw in ["黑龙江省", "内蒙古自治区", "上海市", "四川"] {
            let once = normalize_province(raw).unwrap();
            let twice = normalize_province(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_subregion_single_suffix() {
        assert_eq!(normalize_subregion("海淀区").as_deref(), Some("海淀"));
        assert_eq!(normalize_subregion("深圳市").as_deref(), Some("深圳"));
        assert_eq!(normalize_subregion("吐鲁番地区").as_deref(), Some("吐鲁番"));
        assert_eq!(normalize_subregion("锡林郭勒盟").as_deref(), Some("锡林郭勒"));
        // One removal only, already-short names pass through.
        assert_eq!(normalize_subregion("海淀").as_deref(), Some("海淀"));
    }

    #[test]
    fn test_subregion_idempotent() {
        for raw in ["黄浦区", "成都市", "延边朝鲜族自治州", "大理"] {
            let once = normalize_subregion(raw).unwrap();
            let twice = normalize_subregion(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(normalize_province(""), None);
        assert_eq!(normalize_province("   "), None);
        assert_eq!(normalize_subregion(""), None);
        assert_eq!(normalize_subregion("市"), None);
    }
}
