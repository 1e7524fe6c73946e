use portlink_core::transport::{
    ConnectionConfig, DataBits, ErrorCategory, Parity, StopBits, TransportError,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "port_name": "/dev/ttyUSB0",
            "baud_rate": 115200,
            "parity": "even",
            "data_bits": "seven",
            "stop_bits": "two",
            "connect_timeout_ms": 500
        }}"#
    )
    .unwrap();

    let config = ConnectionConfig::load(file.path()).unwrap();
    assert_eq!(
        config,
        ConnectionConfig::new("/dev/ttyUSB0")
            .with_baud_rate(115200)
            .with_parity(Parity::Even)
            .with_data_bits(DataBits::Seven)
            .with_stop_bits(StopBits::Two)
            .with_connect_timeout_ms(500)
    );
    assert_eq!(config.summary(), "/dev/ttyUSB0 115200 7E2");
}

#[test]
fn test_saved_config_loads_back() {
    let config = ConnectionConfig::new("COM7")
        .with_baud_rate(19200)
        .with_stop_bits(StopBits::OnePointFive);

    let mut file = NamedTempFile::new().unwrap();
    serde_json::to_writer_pretty(&mut file, &config).unwrap();
    file.flush().unwrap();

    assert_eq!(ConnectionConfig::load(file.path()).unwrap(), config);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConnectionConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, TransportError::Config(_)));
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[test]
fn test_load_rejects_incomplete_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"baud_rate": 9600}}"#).unwrap();

    let err = ConnectionConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("port name"));
}
