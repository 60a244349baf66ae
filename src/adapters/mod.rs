// Adapters layer: concrete implementations for external collaborators
// (category store, validation cache). HTTP-backed strategies live with the
// pipeline under core/validators.

pub mod memory;
