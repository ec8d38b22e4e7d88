use std::io::Write;

use rill_config::{load_config, RillConfig};
use rill_core::Candle;
use rill_flow::Transformer;
use rill_indicators::IndicatorSpec;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_presets_from_a_file() {
    let file = write_config(
        r#"
        [indicators.slow]
        kind = "sma"
        period = 3

        [indicators.range]
        kind = "range"
        "#,
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.indicators["slow"], IndicatorSpec::Sma { period: 3 });

    let preset = config.preset().unwrap();
    let transformer = preset.transformer().unwrap();
    assert_eq!(transformer.lookback(), 2);

    let candles = [dec!(1), dec!(2), dec!(3)].map(Candle::flat);
    let rows = transformer.run(candles);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["slow"].as_scalar(), Some(dec!(2)));
    assert_eq!(rows[0]["range"].as_scalar(), Some(dec!(0)));
}

#[test]
fn file_and_string_parsing_agree() {
    let raw = r#"
        [indicators.bands]
        kind = "bbands"
        period = 20
        scale = 2
    "#;
    let file = write_config(raw);
    assert_eq!(
        load_config(file.path()).unwrap(),
        RillConfig::from_toml_str(raw).unwrap()
    );
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(dir.path().join("absent.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}
