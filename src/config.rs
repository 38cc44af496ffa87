/// How grids are written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonOptions {
    /// Indented, human-readable output.
    pub pretty: bool,
    /// Write to a sibling temp file and rename it over the target.
    pub atomic: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic: true,
        }
    }
}

impl JsonOptions {
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}
