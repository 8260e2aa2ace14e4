//! Property-based tests for the format predicates.

use proptest::prelude::*;

use crate::validation::{
    branch_prefix, is_headquarter_code, valid_address, valid_country_code, valid_name,
    valid_swift_code, MAX_ADDRESS_LEN, MAX_BANK_NAME_LEN,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any 11 alphanumerics form a valid code, in either case.
    #[test]
    fn prop_alphanumeric_codes_accepted(code in "[A-Za-z0-9]{11}") {
        prop_assert!(valid_swift_code(&code));
        prop_assert!(valid_swift_code(&code.to_uppercase()));
    }

    /// Codes of any other length are rejected.
    #[test]
    fn prop_wrong_length_codes_rejected(code in "[A-Z0-9]{0,10}|[A-Z0-9]{12,20}") {
        prop_assert!(!valid_swift_code(&code));
    }

    /// A single disallowed character anywhere spoils the code.
    #[test]
    fn prop_code_with_symbol_rejected(
        head in "[A-Z0-9]{0,10}",
        symbol in "[^A-Za-z0-9]",
    ) {
        let mut code = head.clone();
        code.push_str(&symbol);
        code.push_str(&"0".repeat(10 - head.len()));
        prop_assert!(!valid_swift_code(&code));
    }

    /// Only two-letter strings are country codes.
    #[test]
    fn prop_country_codes(code in "[A-Za-z]{2}", digit in "[0-9]") {
        prop_assert!(valid_country_code(&code));
        let mixed = format!("{}{digit}", &code[..1]);
        prop_assert!(!valid_country_code(&mixed));
    }

    /// Names within the limit and alphabet are accepted; one char over is not.
    #[test]
    fn prop_name_limit(name in "[A-Za-z0-9 ]{1,255}") {
        prop_assert!(valid_name(&name, MAX_BANK_NAME_LEN));
        let longer = format!("{name}A");
        prop_assert!(!valid_name(&longer, name.len()));
    }

    /// Every name is also a valid address.
    #[test]
    fn prop_names_are_addresses(name in "[A-Za-z0-9 ]{1,255}") {
        prop_assert!(valid_address(&name, MAX_ADDRESS_LEN));
    }

    /// The headquarters flag is decided by the suffix alone.
    #[test]
    fn prop_headquarter_suffix(prefix in "[A-Z0-9]{8}", tail in "[A-Z0-9]{3}") {
        let code = format!("{prefix}{tail}");
        prop_assert_eq!(is_headquarter_code(&code), tail == "XXX");
        prop_assert_eq!(branch_prefix(&code), prefix.as_str());
    }
}
