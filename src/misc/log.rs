/*!
Miscellaneous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information on the progress of a shrink and/or help fix issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [reduction engine](crate::reduction)
    pub const REDUCTION: &str = "reduction";

    /// Logs related to the [shrinker](crate::shrink) driver loop and passes
    pub const SHRINK: &str = "shrink";

    /// Logs related to the oracle cache
    pub const CACHE: &str = "cache";

    /// Logs related to component decomposition
    pub const COMPONENTS: &str = "components";

    /// Logs related to calls of the test function
    pub const ORACLE: &str = "oracle";
}
