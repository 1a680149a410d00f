//! Configuration for the coupling layer.

/// Configuration for one coupled run.
///
/// # Example
///
/// ```
/// use surface_coupling::config::CouplingConfig;
///
/// let config = CouplingConfig::default().with_pack_width(8).with_verbose(true);
/// assert_eq!(config.pack_width, 8);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CouplingConfig {
    /// SIMD packing width for vertical-level storage (levels per pack).
    pub pack_width: usize,
    /// Whether to print registration summaries to stdout.
    pub verbose: bool,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            pack_width: 16,
            verbose: false,
        }
    }
}

impl CouplingConfig {
    /// Set the vertical packing width (floored at 1).
    pub fn with_pack_width(mut self, pack_width: usize) -> Self {
        self.pack_width = pack_width.max(1);
        self
    }

    /// Enable or disable stdout summaries.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
