pub mod craft;

pub use craft::{presets, Craft, CraftBuilder};
