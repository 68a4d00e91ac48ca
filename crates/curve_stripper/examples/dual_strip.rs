//! Strip a USD-style OIS + swap market and print the resulting pillars.
//!
//! ```sh
//! cargo run --example dual_strip
//! ```

use anyhow::Result;
use std::sync::Arc;

use curve_core::market_data::curves::YieldCurve;
use curve_core::types::time::Date;
use curve_instruments::traits::InstrumentHandle;
use curve_instruments::{OvernightIndexSwap, VanillaSwap};
use curve_stripper::stripping::{DualCurveStripper, StripConfig, ZeroRateCurveFactory};

fn main() -> Result<()> {
    let now = Date::from_ymd(2024, 1, 2)?;

    let mut instruments: Vec<InstrumentHandle<f64>> = Vec::new();
    for (years, ois_rate, swap_rate) in [
        (1, 0.0300, 0.0340),
        (2, 0.0310, 0.0350),
        (5, 0.0330, 0.0370),
        (10, 0.0345, 0.0385),
    ] {
        let end = now.add_days(365 * years);
        instruments.push(Arc::new(OvernightIndexSwap::new(now, end, ois_rate)?));
        instruments.push(Arc::new(VanillaSwap::new(now, end.add_days(2), swap_rate)?));
    }
    // A 3y swap with no OIS partner: it lands on the index curve only
    instruments.push(Arc::new(VanillaSwap::new(
        now,
        now.add_days(1095),
        0.0360,
    )?));

    let factory = Arc::new(ZeroRateCurveFactory::new(now));
    let stripper = DualCurveStripper::new(factory, &instruments, now, StripConfig::default())?;
    let result = stripper.strip()?;

    println!("Discounting curve ({} pillars):", result.discounting_dates.len());
    for (date, rate) in result
        .discounting_dates
        .iter()
        .zip(&result.discounting_abscissae)
    {
        println!("  {}  zero rate {:.4}%", date, rate * 100.0);
    }

    println!("Index curve ({} pillars):", result.index_dates.len());
    for (date, rate) in result.index_dates.iter().zip(&result.index_abscissae) {
        println!("  {}  zero rate {:.4}%", date, rate * 100.0);
    }

    let five_years = result.curves.discounting().time_of(now.add_days(1825));
    println!(
        "5y discount factor: {:.6}",
        result.curves.discounting().discount_factor(five_years)?
    );

    for inst in &instruments {
        let residual = inst.value_diff(&result.curves);
        assert!(residual.abs() < 1e-8, "instrument failed to reprice");
    }
    println!("All {} instruments reprice to zero.", instruments.len());

    Ok(())
}
