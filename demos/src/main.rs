use vscan_derive::Scan;

/// A point parsed out of `"(x, y)"` text, demonstrating `#[derive(Scan)]`.
#[derive(Scan, Default, Debug)]
#[vscan(fmt = "({}, {})")]
struct Point {
    x: i32,
    y: i32,
}

fn main() {
    positional_fields();
    typed_presentations();
    derived_custom_type();
    interactive_prompt();
}

fn positional_fields() {
    let mut year = 0i32;
    let mut name = String::new();
    let tail = vscan::scan("1969 Apollo 11", "{} {}", vec![&mut year, &mut name]).unwrap();
    println!("year={year} name={name} tail={tail:?}");
}

fn typed_presentations() {
    let mut count = 0u32;
    let mut ratio = 0.0f64;
    vscan::scan(
        "count=ff ratio=3.25",
        "count={:x} ratio={}",
        vec![&mut count, &mut ratio],
    )
    .unwrap();
    println!("count={count} ratio={ratio}");
}

fn derived_custom_type() {
    let mut a = Point::default();
    let mut b = Point::default();
    vscan::scan(
        "from (0, 0) to (3, 4)",
        "from {} to {}",
        vec![&mut a, &mut b],
    )
    .unwrap();
    println!("a={a:?} b={b:?}");
}

fn interactive_prompt() {
    let mut times = 0u32;
    if vscan::prompt("how many times? ", "{}", vec![&mut times]).is_ok() {
        println!("scanned {times}");
    }
}
