//! Data structures for Lottie animation documents.
//!
//! The types mirror the public Lottie JSON schema (`v, fr, ip, op, w, h, nm,
//! ddd, assets, layers`, shape nodes keyed by `gr, sh, rc, el, fl, st, tr, sr,
//! tm, mm`) so documents round-trip with the rest of the Lottie ecosystem.

pub mod model;
pub mod property;
