use anvilmap_world::Region;
use proptest::prelude::*;

proptest! {
    // file names produced for a region parse back to the same coordinates
    #[test]
    fn file_name_round_trip(x in any::<i32>(), z in any::<i32>()) {
        prop_assert_eq!(Region::parse_file_name(&Region::file_name(x, z)), Some((x, z)));
    }

    // trailing characters after the extension never match
    #[test]
    fn trailing_suffix_rejected(x in -1000i32..1000, z in -1000i32..1000, tail in "[a-z~.]{1,4}") {
        let name = format!("{}{}", Region::file_name(x, z), tail);
        prop_assert_eq!(Region::parse_file_name(&name), None);
    }
}
