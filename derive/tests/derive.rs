use vscan_derive::Scan;

#[derive(Scan, Default, Debug, PartialEq)]
#[vscan(fmt = "({}, {})")]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Scan, Default, Debug, PartialEq)]
#[vscan(fmt = "{}:{}")]
struct Version {
    major: u32,
    minor: u32,
}

#[test]
fn derived_type_uses_its_default_format() {
    let mut p = Point::default();
    let tail = vscan::scan("(3, 4)", "{}", vec![&mut p]).unwrap();
    assert_eq!(p, Point { x: 3, y: 4 });
    assert_eq!(tail, "");
}

#[test]
fn derived_type_composes_inside_a_larger_format() {
    let mut kind = String::new();
    let mut p = Point::default();
    let mut label = String::new();
    let tail = vscan::scan(
        "origin (0, 0) named start",
        "{} {} named {}",
        vec![&mut kind, &mut p, &mut label],
    )
    .unwrap();
    assert_eq!(kind, "origin");
    assert_eq!(p, Point { x: 0, y: 0 });
    assert_eq!(label, "start");
    assert_eq!(tail, "");
}

#[test]
fn a_nonmatching_default_format_is_an_error() {
    let mut p = Point::default();
    assert!(vscan::scan("[3, 4]", "{}", vec![&mut p]).is_err());
}

#[test]
fn a_second_derived_type_uses_its_own_format() {
    let mut v = Version::default();
    let tail = vscan::scan("1.2", "{}", vec![&mut v]).unwrap();
    assert_eq!(v, Version { major: 1, minor: 2 });
    assert_eq!(tail, "");
}

#[test]
fn two_independent_derived_types_scan_in_sequence() {
    let mut a = Point::default();
    let mut b = Point::default();
    vscan::scan("(1, 2) (3, 4)", "{} {}", vec![&mut a, &mut b]).unwrap();
    assert_eq!(a, Point { x: 1, y: 2 });
    assert_eq!(b, Point { x: 3, y: 4 });
}
