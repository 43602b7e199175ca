use typed_builder::TypedBuilder;

/// Where a raw image lands and how the CPU starts executing it.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RunConfig {
    #[builder(default = 0x0000)]
    pub load_address: u16,
    #[builder(default = 0x0000)]
    pub entry_point: u16,
    #[builder(default = 0x0000)]
    pub stack_pointer: u16,
    /// Stop after this many instructions even if the program never halts.
    #[builder(default, setter(strip_option))]
    pub max_instructions: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
