/*!
Miscellaneous items related to [logging](log).

No log implementation is linked by the library; install one (the CLI uses
env_logger) to see the output. Targets narrow the output to a part of the
library, e.g. `RUST_LOG=solve=trace` follows the bound as it grows.
*/

/// Targets used within the [log] macros.
pub mod targets {
    /// Logs related to the solver loop.
    pub const SOLVE: &str = "solve";

    /// Logs related to the construction of encodings.
    pub const ENCODE: &str = "encode";

    /// Logs related to parsing.
    pub const PARSER: &str = "parser";

    /// Logs related to the bundled backend.
    pub const BACKEND: &str = "backend";
}
