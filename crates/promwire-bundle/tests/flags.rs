#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use promwire_bundle::flags;

#[test]
fn port_flag_is_extracted() {
    let port = flags::parse_port_flag(["host-app", "--prometheus-port", "9095"]).unwrap();
    assert_eq!(port.as_deref(), Some("9095"));
}

#[test]
fn equals_syntax_is_accepted() {
    let port = flags::parse_port_flag(["host-app", "--prometheus-port=9096"]).unwrap();
    assert_eq!(port.as_deref(), Some("9096"));
}

#[test]
fn absent_flag_is_none() {
    let port = flags::parse_port_flag(["host-app", "--verbose"]).unwrap();
    assert_eq!(port, None);
}

#[test]
fn unknown_flags_are_tolerated() {
    let port = flags::parse_port_flag([
        "host-app",
        "--log-level",
        "debug",
        "--prometheus-port",
        "9095",
        "--some-switch",
        "positional",
    ])
    .unwrap();
    assert_eq!(port.as_deref(), Some("9095"));
}
