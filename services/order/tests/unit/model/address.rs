use super::ut_address;

#[test]
fn destination_skip_empty_parts() {
    let addr = ut_address(301, 55);
    let actual = addr.destination();
    let expect = "Dewi Lestari (0812-3456-789), Jl. Merdeka No. 12, Sukajadi, Cicendo, \
                  Bandung, Jawa Barat 40162";
    assert_eq!(actual.as_str(), expect);
}

#[test]
fn destination_without_phone_region() {
    let mut addr = ut_address(302, 55);
    addr.phone = "".to_string();
    addr.subdistrict = "  ".to_string();
    addr.postal_code = "".to_string();
    addr.city = "".to_string();
    let actual = addr.destination();
    assert_eq!(
        actual.as_str(),
        "Dewi Lestari, Jl. Merdeka No. 12, Cicendo, Jawa Barat"
    );
}
