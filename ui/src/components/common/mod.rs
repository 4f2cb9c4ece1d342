//! Common/Shared UI Components

mod banner;
mod icons;

pub use banner::StateBanner;
pub use icons::*;
