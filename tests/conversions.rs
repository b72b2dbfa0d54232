use std::io::Cursor;

use rundb::convert::{to_array, to_matrix, to_scalar};
use rundb::error::DbError;
use rundb::{load_array, load_matrix, load_scalar, Stamp};

fn date() -> Stamp {
    Stamp::from_ymd_hms(2015, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn unsigned_range_checks() {
    assert_eq!(to_scalar::<u8>("k", "255").unwrap(), 255);
    let err = to_scalar::<u8>("k", "256").unwrap_err();
    assert_eq!(err.code(), -131);
    let err = to_scalar::<u8>("k", "-1").unwrap_err();
    assert_eq!(err.code(), -131);
}

#[test]
fn signed_range_checks() {
    assert_eq!(to_scalar::<i8>("k", "-128").unwrap(), -128);
    assert!(to_scalar::<i8>("k", "-129").is_err());
    assert_eq!(to_scalar::<i16>("k", "+32767").unwrap(), 32767);
    assert!(to_scalar::<i16>("k", "32768").is_err());
    // wider than the widest integer fails outright
    assert!(to_scalar::<i64>("k", "99999999999999999999").is_err());
}

#[test]
fn integers_must_be_whole_and_decimal() {
    assert!(to_scalar::<i32>("k", "1.5").is_err());
    assert!(to_scalar::<i32>("k", "0x10").is_err());
    assert!(to_scalar::<i32>("k", "1x").is_err());
    assert!(to_scalar::<u64>("k", "18446744073709551615").is_ok());
}

#[test]
fn floats_reject_overflow_and_nan() {
    assert!((to_scalar::<f64>("k", "3.14").unwrap() - 3.14).abs() < 1e-12);
    assert!(to_scalar::<f32>("k", "1e40").is_err());
    assert!(to_scalar::<f64>("k", "1e400").is_err());
    assert!(to_scalar::<f64>("k", "nan").is_err());
    assert!(to_scalar::<f32>("k", "-2.5e-3").is_ok());
}

#[test]
fn scalars_consume_the_whole_fragment() {
    assert_eq!(to_scalar::<i32>("k", "  7  ").unwrap(), 7);
    assert!(to_scalar::<i32>("k", "1 2").is_err());
    assert!(to_scalar::<i32>("k", "").is_err());
}

#[test]
fn arrays_split_on_whitespace() {
    assert_eq!(
        to_array::<i32>("k", "10 20  30\t40").unwrap(),
        vec![10, 20, 30, 40]
    );
}

#[test]
fn array_errors_carry_the_full_value_text() {
    let err = to_array::<i32>("k", "10 twenty 30").unwrap_err();
    match err {
        DbError::Conversion { text, .. } => assert_eq!(text, "10 twenty 30"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(to_array::<i32>("k", "   ").is_err());
}

#[test]
fn matrices_reshape_row_major() {
    let m = to_matrix::<i32>("k", "1 2 3 4 5 6", 3).unwrap();
    assert_eq!(m, vec![vec![1, 2, 3], vec![4, 5, 6]]);
}

#[test]
fn matrix_shape_must_divide_evenly() {
    let err = to_matrix::<i32>("k", "1 2 3 4 5", 3).unwrap_err();
    assert_eq!(err.code(), -129);
    assert!(to_matrix::<i32>("k", "1 2 3", 0).is_err());
}

#[test]
fn typed_loads_compose_resolver_and_converter() {
    let db = "\
[ 2010-06-15 12:00:00 ]
nw = 368
wspac = 4.243e-3
offsets = 1320 1321 1318 1319
tmat = 1 2 3 4 5 6
";
    let mut file = Cursor::new(db);
    assert_eq!(load_scalar::<u32, _>(&mut file, date(), "nw").unwrap(), Some(368));
    let wspac = load_scalar::<f64, _>(&mut file, date(), "wspac")
        .unwrap()
        .unwrap();
    assert!((wspac - 4.243e-3).abs() < 1e-12);
    assert_eq!(
        load_array::<i32, _>(&mut file, date(), "offsets").unwrap(),
        Some(vec![1320, 1321, 1318, 1319])
    );
    assert_eq!(
        load_matrix::<f64, _>(&mut file, date(), "tmat", 2).unwrap(),
        Some(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
    );
    assert_eq!(load_scalar::<u32, _>(&mut file, date(), "gone").unwrap(), None);
}

#[test]
fn decimal_literals_round_trip() {
    let db = "a = -42\nb = 0.0625\n";
    let mut file = Cursor::new(db);
    assert_eq!(load_scalar::<i32, _>(&mut file, date(), "a").unwrap(), Some(-42));
    assert_eq!(
        load_scalar::<f64, _>(&mut file, date(), "b").unwrap(),
        Some(0.0625)
    );
}
