pub mod fixtures;

use candor_domain::normalize_subject;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalization_is_idempotent(name in "\\PC{0,40}") {
        let once = normalize_subject(&name);
        prop_assert_eq!(normalize_subject(&once), once.clone());
    }

    #[test]
    fn padding_and_case_do_not_matter(name in "[a-zA-Z ]{1,30}", left in " {0,4}", right in " {0,4}") {
        let padded = format!("{left}{}{right}", name.to_uppercase());
        prop_assert_eq!(normalize_subject(&padded), normalize_subject(&name));
    }
}
