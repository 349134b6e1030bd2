/*!
 * Tests for language utility functions
 */

use cinefluent::language_utils::{
    get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
};

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalizeToPart2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("eng").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("GER").unwrap(), "deu");
    assert_eq!(normalize_to_part2t(" es ").unwrap(), "spa");
}

#[test]
fn test_normalizeToPart2t_withInvalidCodes_shouldFail() {
    assert!(normalize_to_part2t("").is_err());
    assert!(normalize_to_part2t("e").is_err());
    assert!(normalize_to_part2t("english").is_err());
    assert!(normalize_to_part2t("xyz").is_err());
}

#[test]
fn test_normalizeToPart1OrPart2t_shouldPreferTwoLetters() {
    assert_eq!(normalize_to_part1_or_part2t("fra").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("chi").unwrap(), "zh");
    // No ISO 639-1 code exists for Hawaiian
    assert_eq!(normalize_to_part1_or_part2t("haw").unwrap(), "haw");
}

#[test]
fn test_languageCodesMatch_withEquivalentForms_shouldMatch() {
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("fra", "FR"));
    assert!(language_codes_match("nl", "dut"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("fr", "invalid"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("spa").unwrap(), "Spanish");
    assert!(get_language_name("xx").is_err());
}
