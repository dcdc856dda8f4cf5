use epiest::io::age_csv::{load_age_counts_csv, read_age_counts};
use epiest::io::column_code::Sex;
use epiest::{AgeHistogram, Error};

fn ages(csv: &str) -> Vec<(u32, u64)> {
    read_age_counts(csv.as_bytes())
        .expect("parse csv")
        .into_iter()
        .map(|c| (c.code.age, c.count))
        .collect()
}

#[test]
fn reads_only_the_first_row() {
    let csv = "name,f_98_0,m_98_0,f_98_6\nUK,10,5,20\nEngland,1000,1000,1000\n";
    assert_eq!(ages(csv), vec![(0, 10), (0, 5), (6, 20)]);
}

#[test]
fn keeps_sex_of_each_column() {
    let counts = read_age_counts("m_98_3,f_98_3\n1,2\n".as_bytes()).unwrap();
    assert_eq!(counts[0].code.sex, Sex::Male);
    assert_eq!(counts[1].code.sex, Sex::Female);
}

#[test]
fn skips_unmatched_columns_and_values() {
    let csv = "code,all_98_1,f_98_1,m_98_1,f_98_2,m_98_2,F_98_3\nK02000001,999,,n/a,7,-4,8\n";
    assert_eq!(ages(csv), vec![(2, 7)]);
}

#[test]
fn trailing_text_in_a_count_is_an_error() {
    let err = read_age_counts("f_98_1\n12abc\n".as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("malformed count"), "{err:#}");
}

#[test]
fn oversized_count_overflows() {
    let err = read_age_counts("f_98_0\n123456789012345678901234\n".as_bytes()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("overflows"), "{msg}");
    assert!(!msg.contains("malformed"), "{msg}");
}

#[test]
fn largest_counts_overflow_the_histogram_not_the_reader() {
    let counts = read_age_counts("f_98_0,m_98_0\n18446744073709551615,1\n".as_bytes()).unwrap();
    assert_eq!(counts[0].count, u64::MAX);

    let mut hist = AgeHistogram::grouped(6, 96).unwrap();
    let err = hist.extend(counts.iter().map(|c| (c.code.age, c.count))).unwrap_err();
    assert!(matches!(err, Error::CountOverflow(_)));
}

#[test]
fn short_first_row_is_an_error() {
    let err = read_age_counts("f_98_0,m_98_0,f_98_6\n10,5\n".as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("2 fields but the header has 3"), "{err:#}");
}

#[test]
fn long_first_row_is_an_error() {
    assert!(read_age_counts("f_98_0\n10,5\n".as_bytes()).is_err());
}

#[test]
fn later_rows_may_be_ragged() {
    assert_eq!(ages("f_98_0,m_98_0\n10,5\n1\n"), vec![(0, 10), (0, 5)]);
}

#[test]
fn header_without_rows_gives_no_counts() {
    assert!(ages("f_98_0,m_98_0\n").is_empty());
}

#[test]
fn empty_input_has_no_header() {
    assert!(read_age_counts("".as_bytes()).is_err());
}

#[test]
fn missing_file_reports_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("absent.csv");
    let err = load_age_counts_csv(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn per_year_row_sums_both_sexes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("population.csv");
    std::fs::write(&path, "f_98_0,m_98_0,f_98_45,m_98_45,m_98_90\n300,310,7,8,2\n").unwrap();

    let counts = load_age_counts_csv(&path).unwrap();
    let mut hist = AgeHistogram::per_year(128).unwrap();
    hist.extend(counts.iter().map(|c| (c.code.age, c.count))).unwrap();

    assert_eq!(hist.counts()[0], 610);
    assert_eq!(hist.counts()[45], 15);
    assert_eq!(hist.counts()[90], 2);
    assert_eq!(hist.total(), 627);
}
