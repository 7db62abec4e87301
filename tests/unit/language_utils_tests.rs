/*!
 * Tests for language code utilities
 */

use ocrsub::language_utils::{get_language_name, language_codes_match, normalize_to_part2t, primary_subtag};

#[test]
fn test_primary_subtag_shouldDropRegion() {
    assert_eq!(primary_subtag("zh-CN"), "zh");
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag(" KO "), "ko");
}

#[test]
fn test_normalize_to_part2t_withBibliographicCode_shouldConvert() {
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("kor").unwrap(), "kor");
    assert!(normalize_to_part2t("english").is_err());
    assert!(normalize_to_part2t("").is_err());
}

#[test]
fn test_language_codes_match_shouldIgnoreFormat() {
    assert!(language_codes_match("en-US", "eng"));
    assert!(language_codes_match("ja", "jpn"));
    assert!(!language_codes_match("ko", "ja"));
}

#[test]
fn test_get_language_name_shouldResolveKnownCodes() {
    assert_eq!(get_language_name("ko").unwrap(), "Korean");
    assert_eq!(get_language_name("de").unwrap(), "German");
    assert!(get_language_name("qq").is_err());
}
