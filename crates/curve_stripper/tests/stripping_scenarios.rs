//! End-to-end stripping scenarios.
//!
//! Each scenario builds a small market of OIS and vanilla swaps, strips the
//! curve pair, and checks the pillar layout plus the refit property: every
//! input instrument must reprice to (numerically) zero against the returned
//! curves.

use std::sync::Arc;

use curve_core::types::time::Date;
use curve_instruments::traits::InstrumentHandle;
use curve_instruments::{OvernightIndexSwap, VanillaSwap};
use curve_stripper::stripping::{
    DualCurveStripper, StripConfig, StripError, StripResult, ZeroRateCurveFactory,
};

fn now() -> Date {
    Date::from_ymd(2024, 1, 2).unwrap()
}

fn day(offset: i64) -> Date {
    now().add_days(offset)
}

fn ois(end_offset: i64, rate: f64) -> InstrumentHandle<f64> {
    Arc::new(OvernightIndexSwap::new(now(), day(end_offset), rate).unwrap())
}

fn irs(end_offset: i64, rate: f64) -> InstrumentHandle<f64> {
    Arc::new(VanillaSwap::new(now(), day(end_offset), rate).unwrap())
}

fn factory() -> Arc<ZeroRateCurveFactory<f64>> {
    Arc::new(ZeroRateCurveFactory::new(now()))
}

fn strip(
    instruments: &[InstrumentHandle<f64>],
    pairing_distance: u64,
) -> Result<(DualCurveStripper<f64>, StripResult<f64>), StripError> {
    let config = StripConfig::default().with_pairing_distance(pairing_distance);
    let stripper = DualCurveStripper::new(factory(), instruments, now(), config)?;
    let result = stripper.strip()?;
    Ok((stripper, result))
}

/// Refit property: every instrument reprices to zero against the result.
fn assert_repriced(instruments: &[InstrumentHandle<f64>], result: &StripResult<f64>) {
    for inst in instruments {
        let residual = inst.value_diff(&result.curves);
        assert!(
            residual.abs() <= 1e-8,
            "Instrument maturing {} reprices to {}, expected ~0",
            inst.end(),
            residual
        );
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

/// Two instruments five days apart: one pair, no leftovers, one pillar on
/// each curve at the later maturity.
#[test]
fn scenario_single_pair() {
    let instruments = vec![ois(100, 0.030), irs(105, 0.034)];
    let (stripper, result) = strip(&instruments, 7).unwrap();

    assert_eq!(stripper.pairs().len(), 1);
    assert!(stripper.leftovers().is_empty());

    assert_eq!(result.discounting_dates.len(), 1);
    assert_eq!(result.discounting_abscissae.len(), 1);
    assert_eq!(result.index_dates.len(), 1);
    assert_eq!(result.index_abscissae.len(), 1);
    assert_eq!(result.discounting_dates[0], day(105));
    assert_eq!(result.index_dates[0], day(105));

    assert_repriced(&instruments, &result);
}

/// A lone short instrument becomes a preceding leftover of the only pair:
/// it contributes an index pillar but no discounting pillar.
#[test]
fn scenario_preceding_leftover() {
    let instruments = vec![irs(100, 0.033), ois(200, 0.030), irs(205, 0.034)];
    let (stripper, result) = strip(&instruments, 10).unwrap();

    assert_eq!(stripper.pairs().len(), 1);
    assert!(stripper.leftovers().is_empty());
    assert_eq!(stripper.pairs()[0].num_insts(), 3);

    assert_eq!(result.discounting_dates, vec![day(205)]);
    assert_eq!(result.index_dates, vec![day(100), day(205)]);
    assert_eq!(result.discounting_abscissae.len(), 1);
    assert_eq!(result.index_abscissae.len(), 2);

    assert_repriced(&instruments, &result);
}

/// Two clean pairs: two pillars on each curve.
#[test]
fn scenario_two_pairs() {
    let instruments = vec![
        ois(100, 0.030),
        irs(105, 0.034),
        ois(200, 0.031),
        irs(205, 0.035),
    ];
    let (stripper, result) = strip(&instruments, 10).unwrap();

    assert_eq!(stripper.pairs().len(), 2);
    assert!(stripper.leftovers().is_empty());

    assert_eq!(result.discounting_dates, vec![day(105), day(205)]);
    assert_eq!(result.index_dates, vec![day(105), day(205)]);

    assert_repriced(&instruments, &result);
}

/// Every adjacent gap exceeds the distance: construction fails with
/// InsufficientPairs.
#[test]
fn scenario_no_pairs() {
    let instruments = vec![ois(100, 0.030), ois(200, 0.031), ois(400, 0.032)];
    let config = StripConfig::default().with_pairing_distance(10);
    let err = DualCurveStripper::new(factory(), &instruments, now(), config).unwrap_err();

    assert!(err.is_insufficient_pairs());
}

/// A leftover between two pairs attaches to the later pair's solve.
#[test]
fn scenario_leftover_between_pairs() {
    let instruments = vec![
        ois(100, 0.030),
        irs(105, 0.034),
        irs(300, 0.035),
        ois(600, 0.032),
        irs(605, 0.036),
    ];
    let (stripper, result) = strip(&instruments, 10).unwrap();

    assert_eq!(stripper.pairs().len(), 2);
    assert!(stripper.leftovers().is_empty());
    assert_eq!(stripper.pairs()[1].unpaired_dates(), vec![day(300)]);

    assert_eq!(result.discounting_dates, vec![day(105), day(605)]);
    assert_eq!(result.index_dates, vec![day(105), day(300), day(605)]);

    assert_repriced(&instruments, &result);
}

/// A trailing leftover is solved one-dimensionally on the index curve.
#[test]
fn scenario_trailing_leftover() {
    let instruments = vec![ois(100, 0.030), irs(105, 0.034), irs(400, 0.035)];
    let (stripper, result) = strip(&instruments, 10).unwrap();

    assert_eq!(stripper.pairs().len(), 1);
    assert_eq!(stripper.leftovers().len(), 1);

    assert_eq!(result.discounting_dates, vec![day(105)]);
    assert_eq!(result.index_dates, vec![day(105), day(400)]);

    assert_repriced(&instruments, &result);
}

// ============================================================================
// Quantified Invariants
// ============================================================================

/// Vector-length invariant on a larger ladder: `disc == pairs`,
/// `idx == pairs + leftovers`.
#[test]
fn invariant_vector_lengths() {
    let instruments = vec![
        ois(365, 0.030),
        irs(367, 0.034),
        irs(540, 0.0345),
        ois(730, 0.031),
        irs(733, 0.035),
        ois(1095, 0.032),
        irs(1098, 0.036),
        irs(1460, 0.0365),
    ];
    let (stripper, result) = strip(&instruments, 10).unwrap();

    let pairs = stripper.pairs().len();
    let preceding: usize = stripper
        .pairs()
        .iter()
        .map(|p| p.preceding_unpaired().len())
        .sum();
    let trailing = stripper.leftovers().len();

    assert_eq!(pairs, 3);
    assert_eq!(preceding + trailing, 2);

    assert_eq!(result.discounting_dates.len(), pairs);
    assert_eq!(result.discounting_abscissae.len(), pairs);
    assert_eq!(result.index_dates.len(), pairs + preceding + trailing);
    assert_eq!(result.index_abscissae.len(), result.index_dates.len());

    assert_repriced(&instruments, &result);
}

/// Pillar dates come out non-decreasing (strictly increasing for distinct
/// maturities).
#[test]
fn invariant_dates_sorted() {
    let instruments = vec![
        ois(365, 0.030),
        irs(367, 0.034),
        irs(540, 0.0345),
        ois(730, 0.031),
        irs(733, 0.035),
    ];
    let (_, result) = strip(&instruments, 10).unwrap();

    for window in result.discounting_dates.windows(2) {
        assert!(window[0] < window[1]);
    }
    for window in result.index_dates.windows(2) {
        assert!(window[0] < window[1]);
    }
}

/// Shuffling the input does not change the pairing when maturities are
/// distinct.
#[test]
fn invariant_order_independence() {
    let sorted = vec![
        ois(100, 0.030),
        irs(105, 0.034),
        irs(300, 0.035),
        ois(600, 0.032),
        irs(605, 0.036),
    ];
    let shuffled = vec![
        sorted[3].clone(),
        sorted[0].clone(),
        sorted[4].clone(),
        sorted[2].clone(),
        sorted[1].clone(),
    ];

    let (stripper_a, result_a) = strip(&sorted, 10).unwrap();
    let (stripper_b, result_b) = strip(&shuffled, 10).unwrap();

    let dates_a: Vec<_> = stripper_a.pairs().iter().map(|p| p.paired_date()).collect();
    let dates_b: Vec<_> = stripper_b.pairs().iter().map(|p| p.paired_date()).collect();
    assert_eq!(dates_a, dates_b);
    assert_eq!(result_a.index_dates, result_b.index_dates);

    for (a, b) in result_a
        .index_abscissae
        .iter()
        .zip(&result_b.index_abscissae)
    {
        approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

/// Boundary: exactly two instruments outside the distance fail, inside the
/// distance succeed.
#[test]
fn invariant_two_instrument_boundary() {
    let close = vec![ois(100, 0.030), irs(105, 0.034)];
    assert!(strip(&close, 7).is_ok());

    let apart = vec![ois(100, 0.030), irs(200, 0.034)];
    let err = strip(&apart, 7).unwrap_err();
    assert!(err.is_insufficient_pairs());

    let err = strip(&close[..1].to_vec(), 7).unwrap_err();
    assert!(err.is_insufficient_instruments());
}

/// The discounting curve reprices OIS quotes and the index curve carries
/// the basis: index zero rates end up above discounting zero rates when
/// swap rates sit above OIS rates.
#[test]
fn economic_sanity_basis_is_positive() {
    let instruments = vec![
        ois(365, 0.030),
        irs(368, 0.035),
        ois(730, 0.031),
        irs(733, 0.036),
    ];
    let (_, result) = strip(&instruments, 10).unwrap();

    for (disc, idx) in result
        .discounting_abscissae
        .iter()
        .zip(&result.index_abscissae)
    {
        assert!(idx > disc, "index rate {} should exceed OIS rate {}", idx, disc);
    }
}
