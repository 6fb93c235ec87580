//! Shared test infrastructure
