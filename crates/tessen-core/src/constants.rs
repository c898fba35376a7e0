/// Product identifiers shared across crates
pub const PRODUCT_NAME: &str = "tessen";
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PRODUCT_VENDOR: &str = "tessen";

/// Formal public identifier written to the PRODID property.
pub const PRODID: &str = const_str::concat!(
    "-//",
    PRODUCT_VENDOR,
    "//",
    PRODUCT_NAME,
    " ",
    PRODUCT_VERSION,
    "//EN"
);

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TESSEN";

/// Optional configuration file, looked up relative to the working directory.
pub const CONFIG_FILE: &str = const_str::concat!(PRODUCT_NAME, ".toml");
