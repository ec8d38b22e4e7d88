use std::io::Write;

use rill_config::load_config;
use rill_indicators::IndicatorSpec;
use tempfile::NamedTempFile;

// Kept in its own test binary so the process environment is not shared with other tests.
#[test]
fn environment_overrides_file_values() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[indicators.fast]\nkind = \"ema\"\nperiod = 12\n")
        .unwrap();
    file.flush().unwrap();

    std::env::set_var("RILL__INDICATORS__FAST__PERIOD", "9");
    let config = load_config(file.path());
    std::env::remove_var("RILL__INDICATORS__FAST__PERIOD");

    assert_eq!(
        config.unwrap().indicators["fast"],
        IndicatorSpec::Ema { period: 9 }
    );
}
