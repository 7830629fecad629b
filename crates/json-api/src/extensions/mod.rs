//! Handler helper extensions.

mod depot;

pub(crate) use depot::*;
