//! Built-in edge predicate functions.
//!
//! Referenced from function-typed edge conditions; the loader checks
//! names against the catalog, execution binds them at runtime.

use design_core::EdgeFnRegistration;

inventory::submit!(EdgeFnRegistration {
    name: "has_output",
    summary: "True when the source node produced non-empty output",
});

inventory::submit!(EdgeFnRegistration {
    name: "is_error",
    summary: "True when the source node ended in an error state",
});
