mod common;

use stampcal_core::error::ErrorKind;
use stampcal_core::image::Band;
use stampcal_core::io::header::{HeaderMap, HeaderValue};
use stampcal_core::io::stamp::StampDirectory;
use stampcal_core::io::stamp_writer::write_stamp;

#[test]
fn test_parse_cards_one_per_line() {
    let text = "\
SIMPLE  =                    T / conforms
NAXIS1  =                   23
CALIB   =          0.005123D0 / nmgy per count
OBJECT  = 'it''s a stamp'      / quoted
COMMENT just a comment
END
IGNORED =                    1
";
    let h = HeaderMap::parse(text).unwrap();
    assert_eq!(h.get("SIMPLE"), Some(&HeaderValue::Bool(true)));
    assert_eq!(h.get("NAXIS1"), Some(&HeaderValue::Int(23)));
    assert!((h.get_f64("CALIB").unwrap() - 0.005123).abs() < 1e-15);
    assert_eq!(h.get_str("OBJECT").unwrap(), "it's a stamp");
    assert!(!h.contains("COMMENT"));
    assert!(!h.contains("IGNORED"), "cards after END must be ignored");
}

#[test]
fn test_parse_packed_80_column_cards() {
    let cards = ["GAIN    =                  4.7", "SKY     =                0.321", "END"];
    let text: String = cards.iter().map(|c| format!("{c:<80}")).collect();
    let h = HeaderMap::parse(&text).unwrap();
    assert_eq!(h.len(), 2);
    assert_eq!(h.get_f64("GAIN").unwrap(), 4.7);
    assert_eq!(h.get_f64("SKY").unwrap(), 0.321);
}

#[test]
fn test_integer_widens_to_float() {
    let h = HeaderMap::parse("RUN     =                 3900\nEND").unwrap();
    assert_eq!(h.get_f64("RUN").unwrap(), 3900.0);
    assert_eq!(h.get_rounded("RUN").unwrap(), 3900);
}

#[test]
fn test_rounding_to_nearest() {
    let h = HeaderMap::parse("CAMCOL  =                  5.6\nFIELD   =                268.4\nEND").unwrap();
    assert_eq!(h.get_rounded("CAMCOL").unwrap(), 6);
    assert_eq!(h.get_rounded("FIELD").unwrap(), 268);
}

#[test]
fn test_missing_field_reports_key() {
    let h = HeaderMap::parse("END").unwrap();
    let err = h.get_f64("CALIB").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert!(err.to_string().contains("CALIB"), "got: {err}");
}

#[test]
fn test_string_where_number_expected_is_malformed() {
    let h = HeaderMap::parse("GAIN    = 'high'\nEND").unwrap();
    assert_eq!(h.get_f64("GAIN").unwrap_err().kind(), ErrorKind::MalformedValue);
}

#[test]
fn test_nan_is_malformed() {
    let mut h = HeaderMap::new();
    h.insert("SKY", HeaderValue::Float(f64::NAN));
    assert_eq!(h.get_f64("SKY").unwrap_err().kind(), ErrorKind::MalformedValue);
}

#[test]
fn test_unterminated_string_is_malformed() {
    let err = HeaderMap::parse("OBJECT  = 'open\nEND").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedValue);
}

#[test]
fn test_negative_axis_length_is_malformed() {
    let h = HeaderMap::parse("NAXIS1  =                   -3\nEND").unwrap();
    assert_eq!(h.get_usize("NAXIS1").unwrap_err().kind(), ErrorKind::MalformedValue);
}

#[test]
fn test_card_text_parses_back() {
    let header = common::band_header();
    let parsed = HeaderMap::parse(&header.to_card_text().unwrap()).unwrap();
    assert_eq!(parsed, header);
    for line in header.to_card_text().unwrap().lines() {
        assert_eq!(line.len(), 80);
    }
}

#[test]
fn test_card_wider_than_line_is_rejected() {
    let mut h = common::band_header();
    h.insert("OBJECT", HeaderValue::Str("x".repeat(70)));
    let err = h.to_card_text().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedValue);
    assert!(err.to_string().contains("OBJECT"), "got: {err}");

    // the longest string that still fits reads back intact
    h.insert("OBJECT", HeaderValue::Str("y".repeat(68)));
    let text = h.to_card_text().unwrap();
    let parsed = HeaderMap::parse(&text).unwrap();
    assert_eq!(parsed.get_str("OBJECT").unwrap(), "y".repeat(68));
}

#[test]
fn test_write_stamp_refuses_unreadable_header() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = StampDirectory::new(tmp.path());
    let mut header = common::band_header();
    header.insert("OBJECT", HeaderValue::Str("z".repeat(100)));
    let pixels = ndarray::Array2::<f32>::zeros((2, 2));
    let err = write_stamp(&dir, Band::G, common::STAMP_ID, &header, &pixels).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedValue);
}
