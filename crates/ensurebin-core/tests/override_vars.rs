//! The testkit's isolation list must cover every recognized override

use ensurebin_core::config::consts::env;
use ensurebin_testkit::OVERRIDE_VARS;

#[test]
fn test_isolation_list_covers_every_override() {
    let mut expected = vec![
        env::PLATFORM,
        env::ARCH,
        env::STRICT_SSL,
        env::CA,
        env::CAFILE,
        env::TMP,
        env::USER_AGENT,
        env::PACKAGE_DIR,
    ];
    expected.extend(env::PROXY_CHAIN);

    for var in &expected {
        assert!(OVERRIDE_VARS.contains(var), "{var} is not isolated in tests");
    }
    assert_eq!(OVERRIDE_VARS.len(), expected.len());
}
