//! Static HTML output
//!
//! Runs the animation into an [`SvgRenderer`] and writes two files:
//! `index.html`, a self-contained page that replays the frames, and
//! `frames.json`, the same frames as plain data.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use tracing::info;

use crate::animation::{AnimationLoop, RunSummary, StopCondition};
use crate::render::RenderResult;
use crate::svg::{SvgFrame, SvgRenderer};
use crate::viewport::Viewport;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    subtitle: &'a str,
    svg: &'a str,
    frames_json: &'a str,
    fps: u64,
    frame_count: usize,
}

/// Files produced by [`SceneWriter::write`]
#[derive(Debug, Clone)]
pub struct WrittenScene {
    pub index: PathBuf,
    pub frames: PathBuf,
    pub summary: RunSummary,
}

/// Writes a replayable page for an animation
#[derive(Debug, Clone)]
pub struct SceneWriter {
    title: String,
    viewport: Viewport,
}

impl SceneWriter {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            title: "Series RC loop".to_string(),
            viewport,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Record up to `frames` frames of `anim` and write them under `output`
    pub fn write(
        &self,
        anim: &mut AnimationLoop,
        frames: u64,
        output: &Path,
    ) -> RenderResult<WrittenScene> {
        fs::create_dir_all(output)?;

        let mut renderer = SvgRenderer::new(self.viewport.clone());
        let summary = anim.run(&mut renderer, &StopCondition::after_ticks(frames))?;

        let frames_json = serde_json::to_string(renderer.frames())?;
        let html = self.render_page(anim, &renderer, &frames_json)?;

        let index = output.join("index.html");
        fs::write(&index, html)?;
        let frames_path = output.join("frames.json");
        fs::write(&frames_path, &frames_json)?;

        info!(
            path = %index.display(),
            frames = renderer.frames().len(),
            "wrote scene"
        );

        Ok(WrittenScene {
            index,
            frames: frames_path,
            summary,
        })
    }

    fn render_page(
        &self,
        anim: &AnimationLoop,
        renderer: &SvgRenderer,
        frames_json: &str,
    ) -> RenderResult<String> {
        let physics = anim.physics();
        let subtitle = match physics.tau() {
            Some(tau) => format!(
                "V = {} V, Req = {} \u{3a9}, \u{3c4} = {:.4} s",
                physics.voltage(),
                physics.req(),
                tau
            ),
            None => format!("V = {} V, Req = {} \u{3a9}", physics.voltage(), physics.req()),
        };
        let svg = renderer.scene_svg()?;
        let frames: &[SvgFrame] = renderer.frames();

        let template = IndexTemplate {
            title: &self.title,
            subtitle: &subtitle,
            svg: &svg,
            frames_json,
            fps: anim.settings().frames_per_second(),
            frame_count: frames.len(),
        };
        Ok(template.render()?)
    }
}
