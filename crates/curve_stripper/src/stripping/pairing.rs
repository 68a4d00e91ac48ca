//! Maturity pairing of calibration instruments.
//!
//! Instruments whose maturities fall within a configured day distance are
//! paired: the pair shares one discounting pillar at the later maturity and
//! jointly pins it together with an index pillar. Instruments that find no
//! adjacent partner become leftovers: either absorbed into the next pair's
//! solve (*preceding* leftovers) or, after the last pair, solved one at a
//! time on the index curve (*trailing* leftovers).

use curve_core::market_data::curves::CurvePair;
use curve_core::types::time::Date;
use curve_instruments::traits::InstrumentHandle;
use num_traits::Float;

use super::error::StripError;

/// A pair of instruments sharing a discounting pillar, plus the unpaired
/// instruments collected since the previous pair.
///
/// # Invariants
///
/// - `first.end() <= second.end()`
/// - every preceding unpaired instrument ends before `first.end()`
/// - the paired date is `second.end()`
#[derive(Clone)]
pub struct PairingRecord<T: Float> {
    /// The earlier-maturing paired instrument
    first: InstrumentHandle<T>,
    /// The later-maturing paired instrument
    second: InstrumentHandle<T>,
    /// Unpaired instruments maturing before the pair, in maturity order
    preceding_unpaired: Vec<InstrumentHandle<T>>,
}

impl<T: Float> PairingRecord<T> {
    /// Create a pairing record.
    pub fn new(
        first: InstrumentHandle<T>,
        second: InstrumentHandle<T>,
        preceding_unpaired: Vec<InstrumentHandle<T>>,
    ) -> Self {
        Self {
            first,
            second,
            preceding_unpaired,
        }
    }

    /// The date of the discounting pillar implied by the pair: the later of
    /// the two end dates.
    pub fn paired_date(&self) -> Date {
        self.first.end().max(self.second.end())
    }

    /// Total number of instruments in this record's solve:
    /// `2 + #preceding_unpaired`.
    pub fn num_insts(&self) -> usize {
        2 + self.preceding_unpaired.len()
    }

    /// End dates of the preceding unpaired instruments, in order.
    pub fn unpaired_dates(&self) -> Vec<Date> {
        self.preceding_unpaired.iter().map(|i| i.end()).collect()
    }

    /// The earlier-maturing paired instrument.
    pub fn first(&self) -> &InstrumentHandle<T> {
        &self.first
    }

    /// The later-maturing paired instrument.
    pub fn second(&self) -> &InstrumentHandle<T> {
        &self.second
    }

    /// The preceding unpaired instruments.
    pub fn preceding_unpaired(&self) -> &[InstrumentHandle<T>] {
        &self.preceding_unpaired
    }

    /// Evaluate all residuals against a candidate curve pair.
    ///
    /// `out` is cleared and filled in the fixed order
    /// `[first, second, preceding_unpaired[0], ...]`; its final length is
    /// `num_insts()`.
    pub fn evaluate(&self, curves: &CurvePair<T>, out: &mut Vec<T>) {
        out.clear();
        out.push(self.first.value_diff(curves));
        out.push(self.second.value_diff(curves));
        for inst in &self.preceding_unpaired {
            out.push(inst.value_diff(curves));
        }
    }
}

impl<T: Float> std::fmt::Debug for PairingRecord<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairingRecord")
            .field("first_end", &self.first.end())
            .field("second_end", &self.second.end())
            .field("paired_date", &self.paired_date())
            .field("num_unpaired", &self.preceding_unpaired.len())
            .finish()
    }
}

/// Absolute gap between two instruments' end dates, in days.
fn distance_between<T: Float>(a: &InstrumentHandle<T>, b: &InstrumentHandle<T>) -> u64 {
    (b.end() - a.end()).unsigned_abs()
}

/// Partition instruments into maturity pairs and trailing leftovers.
///
/// # Algorithm
///
/// 1. Stable-sort by end date.
/// 2. Walk left to right: if the next two instruments are within
///    `pairing_distance` days, emit a pair carrying the so-far-unpaired
///    buffer; otherwise buffer the first and advance by one.
/// 3. Whatever remains buffered at the end is returned as trailing
///    leftovers.
///
/// Every input instrument appears exactly once across the pairs (as a
/// member or a preceding leftover) and the trailing leftovers, and pairs
/// come out in increasing paired-date order.
///
/// # Errors
///
/// `StripError::InsufficientInstruments` when fewer than two instruments
/// are supplied.
#[allow(clippy::type_complexity)]
pub fn make_pairs<T: Float>(
    instruments: &[InstrumentHandle<T>],
    pairing_distance: u64,
) -> Result<(Vec<PairingRecord<T>>, Vec<InstrumentHandle<T>>), StripError> {
    if instruments.len() < 2 {
        return Err(StripError::insufficient_instruments(instruments.len()));
    }

    let mut sorted = instruments.to_vec();
    sorted.sort_by_key(|inst| inst.end());

    let mut pairs = Vec::new();
    let mut unpaired: Vec<InstrumentHandle<T>> = Vec::new();
    let mut idx = 0;

    while idx < sorted.len() {
        if idx == sorted.len() - 1 {
            unpaired.push(sorted[idx].clone());
            break;
        }

        let first = &sorted[idx];
        let second = &sorted[idx + 1];

        if distance_between(first, second) <= pairing_distance {
            pairs.push(PairingRecord::new(
                first.clone(),
                second.clone(),
                std::mem::take(&mut unpaired),
            ));
            idx += 2;
        } else {
            unpaired.push(first.clone());
            idx += 1;
        }
    }

    Ok((pairs, unpaired))
}
