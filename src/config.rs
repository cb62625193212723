//! Viewer configuration
//!
//! [`ViewerConfig`] gathers every tunable of the viewer. The defaults
//! reproduce the reference scene: a 20-segment cylinder of height 3 seen from
//! five units away under a dim ambient light and one directional light.
//!
//! A handful of values can be overridden from the environment:
//!
//! | variable                | field                   |
//! |-------------------------|-------------------------|
//! | `CYLINDER_SEGMENTS`     | `cylinder.segments`     |
//! | `CYLINDER_HEIGHT`       | `cylinder.height`       |
//! | `CYLINDER_TEXTURE`      | `texture.path`          |
//! | `CYLINDER_TEXTURE_WRAP` | `texture.wrap`          |
//! | `CYLINDER_WIREFRAME`    | `start_in_wireframe`    |

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::gfx::geometry::validate_cylinder_params;

pub const ENV_SEGMENTS: &str = "CYLINDER_SEGMENTS";
pub const ENV_HEIGHT: &str = "CYLINDER_HEIGHT";
pub const ENV_TEXTURE: &str = "CYLINDER_TEXTURE";
pub const ENV_TEXTURE_WRAP: &str = "CYLINDER_TEXTURE_WRAP";
pub const ENV_WIREFRAME: &str = "CYLINDER_WIREFRAME";

/// Window creation settings
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cylinder Viewer".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Parameters handed to the cylinder generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderConfig {
    pub segments: u32,
    pub height: f32,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            segments: 20,
            height: 3.0,
        }
    }
}

/// Perspective projection and orbit control settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Aspect ratio used until the window reports its size
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Radians per second added to the yaw every frame
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 1920.0 / 1080.0,
            znear: 0.1,
            zfar: 10.0,
            distance: 5.0,
            pitch: 0.4,
            yaw: 0.2,
            min_distance: 1.5,
            max_distance: 9.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
            auto_rotate_speed: 0.0,
        }
    }
}

/// Ambient plus a single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    pub ambient_color: [f32; 3],
    pub directional_color: [f32; 3],
    /// The directional light shines from this point toward the origin
    pub directional_position: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: [0.25, 0.25, 0.25],
            directional_color: [0.5, 0.5, 0.5],
            directional_position: [-2.0, 1.0, 0.0],
        }
    }
}

/// How texture coordinates outside `[0, 1]` are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureWrap {
    ClampToEdge,
    #[default]
    Repeat,
    MirrorRepeat,
}

impl TextureWrap {
    pub fn address_mode(self) -> wgpu::AddressMode {
        match self {
            TextureWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            TextureWrap::Repeat => wgpu::AddressMode::Repeat,
            TextureWrap::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

impl std::str::FromStr for TextureWrap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" | "clamp_to_edge" => Ok(TextureWrap::ClampToEdge),
            "repeat" => Ok(TextureWrap::Repeat),
            "mirror" | "mirror_repeat" => Ok(TextureWrap::MirrorRepeat),
            other => Err(format!("unknown wrap mode '{other}'")),
        }
    }
}

/// Optional image applied to the shaded material
#[derive(Debug, Clone, PartialEq)]
pub struct TextureConfig {
    pub path: PathBuf,
    pub wrap: TextureWrap,
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub cylinder: CylinderConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub background: [f32; 3],
    pub axes_length: f32,
    pub texture: Option<TextureConfig>,
    pub start_in_wireframe: bool,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            cylinder: CylinderConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            background: [0.0, 0.0, 0.0],
            axes_length: 4.0,
            texture: None,
            start_in_wireframe: false,
            vsync: true,
        }
    }
}

impl ViewerConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(std::env::vars())
    }

    /// Applies `(key, value)` overrides; unknown keys are ignored
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut wrap = None;

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_SEGMENTS => self.cylinder.segments = parse_value(key, value)?,
                ENV_HEIGHT => self.cylinder.height = parse_value(key, value)?,
                ENV_TEXTURE if value.trim().is_empty() => self.texture = None,
                ENV_TEXTURE => {
                    self.texture = Some(TextureConfig {
                        path: PathBuf::from(value),
                        wrap: self.texture.as_ref().map(|t| t.wrap).unwrap_or_default(),
                    })
                }
                ENV_TEXTURE_WRAP => wrap = Some(parse_value::<TextureWrap>(key, value)?),
                ENV_WIREFRAME => self.start_in_wireframe = parse_flag(key, value)?,
                _ => {}
            }
        }

        // Wrap may arrive before or after the path
        if let (Some(wrap), Some(texture)) = (wrap, self.texture.as_mut()) {
            texture.wrap = wrap;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks the values the generator and camera rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_cylinder_params(self.cylinder.segments, self.cylinder.height)
            .map_err(ConfigError::from)?;

        let camera = &self.camera;
        if !(camera.znear > 0.0 && camera.zfar > camera.znear) {
            return Err(invalid(
                "camera.znear/zfar",
                format!("{}/{}", camera.znear, camera.zfar),
                "need 0 < znear < zfar",
            ));
        }
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_y_degrees",
                camera.fov_y_degrees.to_string(),
                "must be between 0 and 180",
            ));
        }
        if camera.min_distance > camera.max_distance {
            return Err(invalid(
                "camera.min_distance",
                camera.min_distance.to_string(),
                "exceeds max_distance",
            ));
        }
        Ok(())
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.window.title = title.to_owned();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn with_cylinder(mut self, segments: u32, height: f32) -> Self {
        self.cylinder = CylinderConfig { segments, height };
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_lighting(mut self, lighting: LightingConfig) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_background(mut self, r: f32, g: f32, b: f32) -> Self {
        self.background = [r, g, b];
        self
    }

    pub fn with_axes_length(mut self, length: f32) -> Self {
        self.axes_length = length;
        self
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>, wrap: TextureWrap) -> Self {
        self.texture = Some(TextureConfig {
            path: path.into(),
            wrap,
        });
        self
    }

    pub fn with_wireframe(mut self, enabled: bool) -> Self {
        self.start_in_wireframe = enabled;
        self
    }

    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }
}

fn invalid(key: &str, value: String, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        reason: reason.to_string(),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err: T::Err| invalid(key, value.to_string(), &err.to_string()))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(key, value.to_string(), "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.cylinder.segments, 20);
        assert_eq!(config.cylinder.height, 3.0);
        assert_eq!(config.camera.fov_y_degrees, 60.0);
        assert_eq!(config.camera.distance, 5.0);
        assert_eq!(config.camera.zfar, 10.0);
        assert_eq!(config.lighting.ambient_color, [0.25; 3]);
        assert_eq!(config.lighting.directional_position, [-2.0, 1.0, 0.0]);
        assert_eq!(config.background, [0.0; 3]);
        assert_eq!(config.axes_length, 4.0);
        assert!(config.texture.is_none());
        assert!(!config.start_in_wireframe);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_overrides_apply() {
        let config = ViewerConfig::default()
            .with_overrides([
                (ENV_TEXTURE_WRAP, "mirror"),
                (ENV_SEGMENTS, "32"),
                (ENV_HEIGHT, " 1.5 "),
                (ENV_TEXTURE, "assets/checker.png"),
                (ENV_WIREFRAME, "yes"),
                ("PATH", "/usr/bin"),
            ])
            .unwrap();

        assert_eq!(config.cylinder.segments, 32);
        assert_eq!(config.cylinder.height, 1.5);
        assert!(config.start_in_wireframe);
        assert_eq!(
            config.texture,
            Some(TextureConfig {
                path: PathBuf::from("assets/checker.png"),
                wrap: TextureWrap::MirrorRepeat,
            })
        );
    }

    #[test]
    fn test_unparseable_override_is_rejected() {
        let err = ViewerConfig::default()
            .with_overrides([(ENV_SEGMENTS, "many")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_SEGMENTS));
    }

    #[test]
    fn test_degenerate_cylinder_override_is_rejected() {
        let err = ViewerConfig::default()
            .with_overrides([(ENV_SEGMENTS, "2")])
            .unwrap_err();
        assert_eq!(err, ConfigError::Geometry(GeometryError::TooFewSegments(2)));

        let err = ViewerConfig::default()
            .with_overrides([(ENV_HEIGHT, "-3")])
            .unwrap_err();
        assert_eq!(err, ConfigError::Geometry(GeometryError::InvalidHeight(-3.0)));
    }

    #[test]
    fn test_unaddressable_segment_count_is_rejected() {
        let max = u32::MAX.to_string();
        let err = ViewerConfig::default()
            .with_overrides([(ENV_SEGMENTS, max.as_str())])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Geometry(GeometryError::TooManySegments { segments: u32::MAX, .. })
        ));
    }

    #[test]
    fn test_bad_flag_is_rejected() {
        assert!(ViewerConfig::default()
            .with_overrides([(ENV_WIREFRAME, "sometimes")])
            .is_err());
    }

    #[test]
    fn test_wrap_parsing() {
        assert_eq!("clamp".parse(), Ok(TextureWrap::ClampToEdge));
        assert_eq!("Repeat".parse(), Ok(TextureWrap::Repeat));
        assert_eq!("mirror_repeat".parse(), Ok(TextureWrap::MirrorRepeat));
        assert!("tile".parse::<TextureWrap>().is_err());
        assert_eq!(
            TextureWrap::ClampToEdge.address_mode(),
            wgpu::AddressMode::ClampToEdge
        );
    }

    #[test]
    fn test_camera_validation() {
        let mut camera = CameraConfig::default();
        camera.znear = 0.0;
        assert!(ViewerConfig::default().with_camera(camera).validate().is_err());

        let mut camera = CameraConfig::default();
        camera.min_distance = 20.0;
        assert!(ViewerConfig::default().with_camera(camera).validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ViewerConfig::default()
            .with_title("Demo")
            .with_window_size(800, 600)
            .with_cylinder(8, 2.0)
            .with_background(0.1, 0.2, 0.3)
            .with_texture("grid.png", TextureWrap::ClampToEdge)
            .with_axes_length(2.0);

        assert_eq!(config.window.title, "Demo");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.cylinder, CylinderConfig { segments: 8, height: 2.0 });
        assert_eq!(config.background, [0.1, 0.2, 0.3]);
        assert_eq!(config.texture.unwrap().wrap, TextureWrap::ClampToEdge);
        assert_eq!(config.axes_length, 2.0);
    }
}
