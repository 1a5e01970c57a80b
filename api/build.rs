//! Samples the exponential curve at every step boundary and writes the
//! discrete pricing and cumulative value tables into `OUT_DIR/table.rs`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use brine_fp::UnsignedNumeric;

#[allow(dead_code)]
#[path = "src/consts.rs"]
mod consts;

#[allow(dead_code)]
#[path = "src/utils.rs"]
mod utils;

#[allow(dead_code)]
#[path = "src/curve.rs"]
mod curve;

use consts::*;
use curve::ExponentialCurve;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/consts.rs");
    println!("cargo:rerun-if-changed=src/utils.rs");
    println!("cargo:rerun-if-changed=src/curve.rs");

    let curve = ExponentialCurve::default();

    let mut pricing = Vec::with_capacity(TABLE_SIZE);
    let mut cumulative = Vec::with_capacity(TABLE_SIZE);
    let mut total: u128 = 0;

    for step in 0..TABLE_SIZE {
        let supply = UnsignedNumeric::new(step as u128 * STEP_SIZE as u128)
            .expect("supply overflow");
        let price = curve
            .spot_price_at_supply(&supply)
            .unwrap_or_else(|| panic!("spot price failed at step {}", step));
        let price = utils::to_raw(&price)
            .unwrap_or_else(|| panic!("spot price does not fit u128 at step {}", step));

        pricing.push(price);
        cumulative.push(total);

        total = price
            .checked_mul(STEP_SIZE as u128)
            .and_then(|cost| total.checked_add(cost))
            .unwrap_or_else(|| panic!("cumulative value overflow at step {}", step));
    }

    let mut out = String::with_capacity(TABLE_SIZE * 2 * 40);
    writeln!(out, "// @generated by build.rs, do not edit").unwrap();
    write_table(&mut out, "DISCRETE_PRICING_TABLE", &pricing);
    write_table(&mut out, "DISCRETE_CUMULATIVE_VALUE_TABLE", &cumulative);

    let path = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set")).join("table.rs");
    fs::write(&path, out).expect("failed to write table.rs");
}

fn write_table(out: &mut String, name: &str, values: &[u128]) {
    writeln!(out, "pub static {}: &[u128] = &[", name).unwrap();
    for value in values {
        writeln!(out, "    {},", value).unwrap();
    }
    writeln!(out, "];").unwrap();
}
