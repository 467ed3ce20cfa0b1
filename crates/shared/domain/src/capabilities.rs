use bitflags::bitflags;

bitflags! {
    /// Optional behaviors a data builder advertises to the registry.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct BuilderCapabilities: u8 {
        /// Migrates older records through registered content updaters before building.
        const VERSIONED = 1 << 0;
        /// Produces immutable values.
        const IMMUTABLE = 1 << 1;
    }
}
