use std::path::PathBuf;

use clap::Parser;
use stardrift_draw::Size;

/// A drifting point cloud around a clear-coated metallic sphere.
#[derive(Parser, Debug)]
#[command(name = "stardrift", version, about)]
pub struct Args {
    /// Number of random points.
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// Half-extent of the cube the points are spread in.
    #[arg(long, default_value_t = 4.0)]
    pub distance: f32,

    /// World-space point size.
    #[arg(long, default_value_t = 0.2)]
    pub point_size: f32,

    /// Directory holding alphaMap.png and textures/cayley_interior_4k.hdr.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Seed for a reproducible point cloud.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial logical window width.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial logical window height.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Start with the color panel hidden (toggle with H).
    #[arg(long)]
    pub no_panel: bool,

    /// MSAA sample count, 1 disables multisampling.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=4))]
    pub msaa: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub count: usize,
    pub distance: f32,
    pub point_size: f32,
    pub assets: PathBuf,
    pub seed: Option<u64>,
    pub window: Size<u32>,
    pub show_panel: bool,
    pub sample_count: u32,
}

impl SceneConfig {
    pub const ALPHA_MAP: &'static str = "alphaMap.png";
    pub const ENVIRONMENT: &'static str = "textures/cayley_interior_4k.hdr";
    /// Environment levels wider than this are dropped after decoding.
    pub const ENVIRONMENT_MAX_WIDTH: u32 = 2048;

    pub fn environment_path(&self) -> PathBuf {
        self.assets.join(Self::ENVIRONMENT)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            count: 100,
            distance: 4.0,
            point_size: 0.2,
            assets: PathBuf::from("assets"),
            seed: None,
            window: Size::new(1280, 720),
            show_panel: true,
            sample_count: 4,
        }
    }
}

impl From<Args> for SceneConfig {
    fn from(args: Args) -> Self {
        Self {
            count: args.count,
            distance: args.distance,
            point_size: args.point_size,
            assets: args.assets,
            seed: args.seed,
            window: Size::new(args.width.max(1), args.height.max(1)),
            show_panel: !args.no_panel,
            // only 1x and 4x are guaranteed by wgpu
            sample_count: if args.msaa > 1 { 4 } else { 1 },
        }
    }
}

pub fn parse() -> SceneConfig {
    Args::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scene_config() {
        let args = Args::try_parse_from(["stardrift"]).unwrap();
        assert_eq!(SceneConfig::from(args), SceneConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "stardrift",
            "--count",
            "500",
            "--seed",
            "42",
            "--no-panel",
            "--msaa",
            "1",
            "--assets",
            "/tmp/assets",
        ])
        .unwrap();
        let config = SceneConfig::from(args);

        assert_eq!(config.count, 500);
        assert_eq!(config.seed, Some(42));
        assert!(!config.show_panel);
        assert_eq!(config.sample_count, 1);
        assert_eq!(
            config.environment_path(),
            PathBuf::from("/tmp/assets/textures/cayley_interior_4k.hdr")
        );
    }

    #[test]
    fn msaa_is_bounded() {
        assert!(Args::try_parse_from(["stardrift", "--msaa", "8"]).is_err());

        let args = Args::try_parse_from(["stardrift", "--msaa", "2"]).unwrap();
        assert_eq!(SceneConfig::from(args).sample_count, 4);
    }
}
