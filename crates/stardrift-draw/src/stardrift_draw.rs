#[cfg(feature = "application")]
pub mod app;
pub mod camera;
pub mod clock;
pub mod color;
pub mod controls;
pub mod geometry;
pub mod gpu;
pub mod material;
pub mod math;
pub mod overlay;
pub mod renderer;
pub mod scene;
pub mod texture;

pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use color::{Color, ColorParseError, Hsv, Rgba};
pub use controls::{OrbitButton, OrbitControls};
pub use geometry::{AttributeKind, BufferGeometry, GeometryError, GeometryId};
pub use gpu::{
    error::{GpuContextCreateError, GpuSurfaceCreateError},
    GpuContext,
};
pub use material::{LineBasicMaterial, PhysicalMaterial, PointsMaterial};
pub use math::{vec2, vec3, Mat4, Rect, Size, Vec2, Vec3};
pub use overlay::{OverlayList, OverlayRenderer, OverlayVertex};
pub use renderer::{SceneRenderer, SceneRendererSpecs};
pub use scene::{LineMode, Node, NodeId, NodeKind, PointLight, Scene, Transform};
pub use texture::{
    AssetError, FlakesTexture, HdrEnvironment, Texture, TextureId, TextureLoader, TextureOptions,
};
