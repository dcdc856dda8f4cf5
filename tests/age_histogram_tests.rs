use approx::assert_abs_diff_eq;

use epiest::model::histogram::{GROUPED_AGE_SPAN, SINGLE_YEAR_SLOTS, YEARS_PER_GROUP};
use epiest::{AgeHistogram, Error, OutOfRange};

fn grouped() -> AgeHistogram {
    AgeHistogram::grouped(YEARS_PER_GROUP, GROUPED_AGE_SPAN).expect("grouped histogram")
}

#[test]
fn default_grouping_has_sixteen_buckets() {
    assert_eq!(grouped().counts().len(), 16);
    assert_eq!(AgeHistogram::grouped(10, 95).unwrap().counts().len(), 10);
    assert_eq!(AgeHistogram::per_year(SINGLE_YEAR_SLOTS).unwrap().counts().len(), 128);
}

#[test]
fn scenario_two_buckets() {
    let mut hist = grouped();
    hist.extend([(0, 10), (0, 5), (6, 20)]).unwrap();

    assert_eq!(hist.counts()[0], 15);
    assert_eq!(hist.counts()[1], 20);
    assert_eq!(hist.total(), 35);

    let rows = hist.proportions().unwrap();
    assert_abs_diff_eq!(rows[0].proportion, 0.4286, epsilon = 1e-4);
    assert_abs_diff_eq!(rows[1].proportion, 0.5714, epsilon = 1e-4);
    assert_abs_diff_eq!(rows[0].cumulative, 0.4286, epsilon = 1e-4);
    assert_abs_diff_eq!(rows[1].cumulative, 1.0, epsilon = 1e-12);
    assert_eq!(rows[1].lower_age, 6);
    assert_eq!(rows[15].lower_age, 90);
}

#[test]
fn bucket_sums_ages_in_its_interval() {
    let mut hist = grouped();
    for age in 0..96u32 {
        hist.add(age, age as u64 + 1).unwrap();
    }
    for (i, &count) in hist.counts().iter().enumerate() {
        let lo = 6 * i as u64;
        let expected: u64 = (lo..lo + 6).map(|a| a + 1).sum();
        assert_eq!(count, expected, "bucket {i}");
    }
}

#[test]
fn proportions_sum_to_one() {
    let mut hist = grouped();
    hist.extend((0..96u32).map(|a| (a, 1000 + (a as u64 * 7919) % 3331))).unwrap();
    let rows = hist.proportions().unwrap();
    let sum: f64 = rows.iter().map(|r| r.proportion).sum();
    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rows.last().unwrap().cumulative, 1.0, epsilon = 1e-9);
    assert!(rows.windows(2).all(|w| w[1].cumulative >= w[0].cumulative));
}

#[test]
fn zero_population_is_an_error() {
    assert_eq!(grouped().proportions(), Err(Error::ZeroPopulation));

    let mut hist = grouped();
    hist.add(30, 0).unwrap();
    assert_eq!(hist.proportions(), Err(Error::ZeroPopulation));
}

#[test]
fn out_of_range_age_is_fatal_by_default() {
    let mut hist = grouped();
    hist.add(95, 1).unwrap();
    assert_eq!(hist.add(96, 1), Err(Error::AgeOutOfRange { age: 96, width: 6, buckets: 16 }));

    let mut years = AgeHistogram::per_year(128).unwrap();
    years.add(127, 3).unwrap();
    assert!(matches!(years.add(128, 1), Err(Error::AgeOutOfRange { age: 128, .. })));
}

#[test]
fn out_of_range_drop_and_clamp() {
    let mut dropped = grouped().with_policy(OutOfRange::Drop);
    dropped.extend([(10, 4), (100, 9)]).unwrap();
    assert_eq!(dropped.total(), 4);

    let mut clamped = grouped().with_policy(OutOfRange::Clamp);
    clamped.extend([(10, 4), (100, 9), (u32::MAX, 1)]).unwrap();
    assert_eq!(clamped.total(), 14);
    assert_eq!(clamped.counts()[15], 10);
}

#[test]
fn rejects_degenerate_shapes() {
    assert!(matches!(AgeHistogram::grouped(0, 96), Err(Error::InvalidConfig(_))));
    assert!(matches!(AgeHistogram::grouped(6, 0), Err(Error::InvalidConfig(_))));
    assert!(matches!(AgeHistogram::per_year(0), Err(Error::InvalidConfig(_))));
}

#[test]
fn bucket_overflow_is_an_error() {
    let mut hist = grouped();
    hist.add(0, u64::MAX).unwrap();
    assert!(matches!(hist.add(0, 1), Err(Error::CountOverflow(_))));
    assert_eq!(hist.counts()[0], u64::MAX);
    assert_eq!(hist.total(), u64::MAX);
}

#[test]
fn total_overflow_across_buckets_is_an_error() {
    let mut hist = grouped();
    hist.add(0, u64::MAX - 1).unwrap();
    assert!(matches!(hist.add(50, 2), Err(Error::CountOverflow(_))));
    assert_eq!(hist.counts()[8], 0);
    assert_eq!(hist.total(), u64::MAX - 1);
}
