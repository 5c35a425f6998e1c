mod retiler;

pub use retiler::{RetiledSheet, Retiler, TilePlacement};
