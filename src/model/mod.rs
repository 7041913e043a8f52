pub use shoal_core::{AssetLoader, ContainmentLogic, Metrics, ProceduralFishLoader};
pub mod assets {
    pub use shoal_core::assets::*;
}
pub mod config {
    pub use shoal_core::config::*;
}
pub mod containment {
    pub use shoal_core::containment::*;
}
pub mod spatial_hash {
    pub use shoal_core::spatial_hash::*;
}
pub mod lifecycle {
    pub use shoal_core::lifecycle::*;
}
pub mod metrics {
    pub use shoal_core::metrics::*;
}
pub mod rig {
    pub use shoal_core::rig::*;
}
pub mod sampler {
    pub use shoal_core::sampler::*;
}
pub mod steering {
    pub use shoal_core::steering::*;
}
pub mod systems {
    pub use shoal_core::systems::*;
}
pub mod wiggle {
    pub use shoal_core::wiggle::*;
}

pub mod state {
    pub use shoal_data::*;
}
pub mod world;
