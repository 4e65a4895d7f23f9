use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{DynamicImage, imageops::FilterType};
use mattergen_core::{
    application::ports::EffectHandler,
    domain::BuildConfig,
    error::CoreResult,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{EffectError, ensure_parent, within_project};

const NAME: &str = "image";

/// Copies an image into the project, applying transforms in listed order.
///
/// Arguments:
///
/// ```json
/// {
///   "paths": {
///     "copyFromBase": "posts/hello.md",
///     "copyFromPath": "hero.jpg",
///     "copyToPath": "public/images",
///     "fileName": "hello-hero.jpg"
///   },
///   "manipulations": [{ "function": "width", "args": 600 }]
/// }
/// ```
///
/// The source is resolved next to `copyFromBase` inside the input directory;
/// the destination is `<project>/<copyToPath>/<fileName>`, and both must stay
/// inside the project. Only `width` is recognized; other functions are
/// skipped. The output is encoded in the format named by `fileName`'s
/// extension; the file is copied byte for byte only when there is nothing
/// to apply and the extension is unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageHandler;

#[derive(Debug, Deserialize)]
struct ImageArgs {
    paths: ImagePaths,
    #[serde(default)]
    manipulations: Vec<Manipulation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePaths {
    copy_from_base: String,
    copy_from_path: String,
    copy_to_path: String,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct Manipulation {
    function: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    /// Resize to this width, keeping the aspect ratio.
    Width(u32),
}

impl Transform {
    /// `Ok(None)` for functions this handler does not know.
    fn parse(manipulation: &Manipulation) -> Result<Option<Self>, EffectError> {
        match manipulation.function.as_str() {
            "width" => manipulation
                .args
                .as_u64()
                .and_then(|w| u32::try_from(w).ok())
                .filter(|w| *w > 0)
                .map(|w| Some(Self::Width(w)))
                .ok_or_else(|| EffectError::Transform {
                    function: manipulation.function.clone(),
                    args: manipulation.args.clone(),
                }),
            other => {
                debug!(function = other, "Unrecognized image manipulation, skipping");
                Ok(None)
            }
        }
    }

    fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Width(width) => {
                let (w, h) = (u64::from(image.width()), u64::from(image.height()));
                let height = ((h * u64::from(width) + w / 2) / w.max(1)).max(1);
                let height = u32::try_from(height).unwrap_or(u32::MAX);
                image.resize_exact(width, height, FilterType::Lanczos3)
            }
        }
    }
}

/// Thread `image` through `transforms` in order.
fn apply_manipulations(image: DynamicImage, transforms: &[Transform]) -> DynamicImage {
    transforms.iter().fold(image, |image, t| t.apply(image))
}

impl ImageArgs {
    fn source(&self, config: &BuildConfig) -> Result<PathBuf, EffectError> {
        within_project(
            config,
            &config
                .input_root()
                .join(&self.paths.copy_from_base)
                .join("..")
                .join(&self.paths.copy_from_path),
        )
    }

    fn destination(&self, config: &BuildConfig) -> Result<PathBuf, EffectError> {
        within_project(
            config,
            &config
                .project_path(&self.paths.copy_to_path)
                .join(&self.paths.file_name),
        )
    }
}

/// Whether two paths name the same image format by extension.
fn same_extension(a: &Path, b: &Path) -> bool {
    let ext = |p: &Path| p.extension().map(|e| e.to_ascii_lowercase());
    ext(a) == ext(b)
}

fn transform_file(from: &Path, to: &Path, transforms: &[Transform]) -> Result<(), EffectError> {
    let image = image::open(from).map_err(|source| EffectError::Image {
        path: from.to_path_buf(),
        source,
    })?;
    let image = apply_manipulations(image, transforms);
    // JPEG has no alpha channel.
    let image = match image::ImageFormat::from_path(to) {
        Ok(image::ImageFormat::Jpeg) if image.color().has_alpha() => {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
        _ => image,
    };
    image
        .save(to)
        .map_err(|source| EffectError::Image {
            path: to.to_path_buf(),
            source,
        })
}

impl ImageHandler {
    async fn run(&self, config: &BuildConfig, args: &Value) -> Result<(), EffectError> {
        let args = ImageArgs::deserialize(args)?;
        let transforms = args
            .manipulations
            .iter()
            .map(Transform::parse)
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;

        let from = args.source(config)?;
        let to = args.destination(config)?;
        ensure_parent(&to).await?;

        if transforms.is_empty() && same_extension(&from, &to) {
            tokio::fs::copy(&from, &to)
                .await
                .map_err(EffectError::io(&from))?;
            return Ok(());
        }

        tokio::task::spawn_blocking(move || transform_file(&from, &to, &transforms)).await?
    }
}

#[async_trait]
impl EffectHandler for ImageHandler {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(skip_all, name = "image_effect")]
    async fn perform(&self, config: &BuildConfig, args: &Value) -> CoreResult<()> {
        self.run(config, args).await.map_err(|e| e.into_core(NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};
    use mattergen_core::application::ApplicationError;
    use mattergen_core::error::CoreError;
    use serde_json::json;
    use tempfile::TempDir;

    fn project() -> (TempDir, BuildConfig) {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("content/posts");
        std::fs::create_dir_all(&posts).unwrap();
        RgbImage::new(400, 200).save(posts.join("hero.png")).unwrap();
        let config = BuildConfig::new(tmp.path());
        (tmp, config)
    }

    fn args(manipulations: Value) -> Value {
        json!({
            "paths": {
                "copyFromBase": "posts/hello.md",
                "copyFromPath": "hero.png",
                "copyToPath": "public/images",
                "fileName": "hello.png"
            },
            "manipulations": manipulations
        })
    }

    #[test]
    fn transforms_apply_in_order() {
        let image = DynamicImage::new_rgb8(400, 200);
        let out = apply_manipulations(image, &[Transform::Width(200), Transform::Width(100)]);
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn unknown_functions_are_skipped_and_bad_width_rejected() {
        let blur = Manipulation {
            function: "blur".into(),
            args: json!(3),
        };
        assert_eq!(Transform::parse(&blur).unwrap(), None);

        let bad = Manipulation {
            function: "width".into(),
            args: json!("wide"),
        };
        assert!(Transform::parse(&bad).is_err());
    }

    #[tokio::test]
    async fn resizes_to_width_keeping_aspect() {
        let (tmp, config) = project();

        ImageHandler
            .perform(&config, &args(json!([{ "function": "width", "args": 100 }])))
            .await
            .unwrap();

        let written = image::open(tmp.path().join("public/images/hello.png")).unwrap();
        assert_eq!(written.dimensions(), (100, 50));
    }

    #[tokio::test]
    async fn no_recognized_transform_copies_bytes() {
        let (tmp, config) = project();

        ImageHandler
            .perform(&config, &args(json!([{ "function": "grayscale" }])))
            .await
            .unwrap();

        let original = std::fs::read(tmp.path().join("content/posts/hero.png")).unwrap();
        let copied = std::fs::read(tmp.path().join("public/images/hello.png")).unwrap();
        assert_eq!(original, copied);
    }

    #[tokio::test]
    async fn changed_extension_is_reencoded_without_transforms() {
        let (tmp, config) = project();
        let mut jpeg = args(json!([]));
        jpeg["paths"]["fileName"] = json!("hello.jpg");

        ImageHandler.perform(&config, &jpeg).await.unwrap();

        let written = std::fs::read(tmp.path().join("public/images/hello.jpg")).unwrap();
        assert_eq!(
            image::guess_format(&written).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn transparent_png_can_become_jpeg() {
        let (tmp, config) = project();
        image::RgbaImage::new(40, 20)
            .save(tmp.path().join("content/posts/hero.png"))
            .unwrap();
        let mut jpeg = args(json!([{ "function": "width", "args": 20 }]));
        jpeg["paths"]["fileName"] = json!("hello.jpg");

        ImageHandler.perform(&config, &jpeg).await.unwrap();

        let written = image::open(tmp.path().join("public/images/hello.jpg")).unwrap();
        assert_eq!(written.dimensions(), (20, 10));
    }

    #[test]
    fn extension_comparison_ignores_case() {
        assert!(same_extension(Path::new("a/hero.PNG"), Path::new("b/x.png")));
        assert!(!same_extension(Path::new("hero.png"), Path::new("x.jpg")));
    }

    #[tokio::test]
    async fn destination_outside_project_is_rejected() {
        let (tmp, config) = project();
        let mut escaping = args(json!([]));
        escaping["paths"]["copyToPath"] = json!("../../elsewhere");

        let err = ImageHandler.perform(&config, &escaping).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Application(ApplicationError::InvalidEffectArgs { .. })
        ));
        assert!(!tmp.path().join("public").exists());
    }

    #[tokio::test]
    async fn missing_source_fails() {
        let (_tmp, config) = project();
        let mut bad = args(json!([]));
        bad["paths"]["copyFromPath"] = json!("missing.png");

        let err = ImageHandler.perform(&config, &bad).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_args_are_invalid() {
        let (_tmp, config) = project();
        let err = ImageHandler
            .perform(&config, &json!({ "paths": {} }))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Application(ApplicationError::InvalidEffectArgs { .. })
        ));
    }
}
