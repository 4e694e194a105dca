/// Module for managing the source code and turning it into an executable token stream.
pub mod lang;

/// Module for the runtime.  The machine state, the built-in word set, and error reporting.
pub mod runtime;
