/// Resource limits of the term-set generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Largest `n * sum |T[l]|` the generator may materialise.
    pub max_auxiliary_states: u64,
}

impl GeneratorConfig {
    pub const DEFAULT_MAX_AUXILIARY_STATES: u64 = 1 << 24;

    pub const fn new(max_auxiliary_states: u64) -> Self {
        Self { max_auxiliary_states }
    }

    pub const fn unbounded() -> Self {
        Self {
            max_auxiliary_states: u64::MAX,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_AUXILIARY_STATES)
    }
}
