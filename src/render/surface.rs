use std::time::Duration;

use crate::{
    animation::{
        animator::Animator,
        clock::{Clock, ManualClock, SystemClock},
    },
    foundation::{
        core::{FrameIndex, Fps},
        error::{ChartError, ChartResult},
    },
    render::{
        config::SurfaceConfig, context::RasterContext, frame::FrameRGBA,
        render_loop::RenderLoop,
    },
    scene::{shape::Scene, stage::Stage},
};

/// A concrete chart: what shapes exist for a dataset, and how their attributes become pixels.
pub trait Chart {
    /// One item of the chart's dataset.
    type Datum;

    /// Join `data` against the scene and set or animate attribute targets.
    ///
    /// Items that do not fit the chart should be skipped with a warning rather than failing.
    fn bind_data(&mut self, data: &[Self::Datum], stage: &mut Stage<'_>) -> ChartResult<()>;

    /// Rasterize the scene from current attribute values.
    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()>;
}

/// Counters for observing a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Completed paints (each one presented a full frame).
    pub paints: u64,
    /// Animation ticks that advanced timelines.
    pub ticks: u64,
    /// `render` calls.
    pub renders: u64,
}

/// Persistent drawing surface driving one chart.
pub struct ChartSurface<C: Chart> {
    chart: C,
    config: SurfaceConfig,
    ctx: RasterContext,
    scene: Scene,
    animator: Animator,
    clock: Box<dyn Clock>,
    root: Vec<C::Datum>,
    stats: SurfaceStats,
}

impl<C: Chart> ChartSurface<C> {
    /// Surface on the system clock.
    pub fn new(chart: C, config: SurfaceConfig) -> ChartResult<Self> {
        Self::with_clock(chart, config, SystemClock::new())
    }

    /// Surface sampling animations from `clock`.
    pub fn with_clock(
        chart: C,
        config: SurfaceConfig,
        clock: impl Clock + 'static,
    ) -> ChartResult<Self> {
        config.validate()?;
        let mut ctx = RasterContext::new(config.canvas())?;
        if let Some(path) = &config.font_path {
            let bytes = std::fs::read(path).map_err(|e| {
                ChartError::render(format!("read font '{}': {e}", path.display()))
            })?;
            ctx.load_font(bytes)?;
        }
        Ok(Self {
            chart,
            config,
            ctx,
            scene: Scene::new(),
            animator: Animator::new(),
            clock: Box::new(clock),
            root: Vec::new(),
            stats: SurfaceStats::default(),
        })
    }

    /// Bind a new dataset and paint once, synchronously.
    #[tracing::instrument(skip_all, fields(items = data.len()))]
    pub fn render(&mut self, data: Vec<C::Datum>) -> ChartResult<()> {
        let now = self.clock.now();
        self.animator.prune();
        self.scene.clear_removed();

        let mut stage = Stage::new(
            &mut self.scene,
            &mut self.animator,
            now,
            self.config.canvas(),
            self.config.duration(),
        );
        let bound = self.chart.bind_data(&data, &mut stage);
        // Exits are settled even when the bind fails part way.
        self.animator.sweep_exited(&mut self.scene, now);
        bound?;
        self.root = data;
        self.stats.renders += 1;

        self.paint()?;
        // This paint already shows settled values for anything that stopped during bind.
        self.animator.render_loop_mut().take_final_repaint();
        Ok(())
    }

    /// Clear, paint the background and the chart's shapes, then present the frame.
    pub fn paint(&mut self) -> ChartResult<()> {
        let canvas = self.config.canvas();
        self.ctx.begin_frame();

        self.ctx.save();
        self.ctx.set_fill_style(self.config.background);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        );
        self.ctx.restore();

        self.ctx.save();
        let painted = self.chart.paint_shapes(&self.scene, &mut self.ctx);
        self.ctx.restore();
        painted?;

        self.ctx.present();
        self.stats.paints += 1;
        Ok(())
    }

    /// Display-refresh callback at the surface clock's current time.
    pub fn tick(&mut self) -> ChartResult<bool> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Advance animations to `now` and repaint. Does nothing when no animation is running.
    ///
    /// When the last timeline finishes, one extra repaint of the settled state follows.
    pub fn tick_at(&mut self, now: Duration) -> ChartResult<bool> {
        if !self.animator.render_loop_mut().record_tick() {
            return Ok(false);
        }
        self.stats.ticks += 1;
        self.animator.advance(&mut self.scene, now);
        self.paint()?;
        if self.animator.render_loop_mut().take_final_repaint() {
            tracing::debug!("painting settled frame");
            self.paint()?;
        }
        Ok(true)
    }

    /// Drive the running animation offline at `fps` until it settles, calling `on_frame` with
    /// the current frame first and then after every tick. `clock` must be the surface clock.
    ///
    /// Stops after `max_frames` frames even if animations are still running. Returns the
    /// number of frames delivered.
    pub fn run_until_idle(
        &mut self,
        clock: &ManualClock,
        fps: Fps,
        max_frames: u64,
        mut on_frame: impl FnMut(FrameIndex, &FrameRGBA) -> ChartResult<()>,
    ) -> ChartResult<u64> {
        if max_frames == 0 {
            return Ok(0);
        }
        let start = clock.now();
        on_frame(FrameIndex(0), &self.ctx.frame())?;
        let mut delivered = 1;
        while self.animator.render_loop().is_ticking() {
            if delivered >= max_frames {
                tracing::warn!(max_frames, "animation still running at frame limit");
                break;
            }
            clock.set(start + fps.frame_time(FrameIndex(delivered)));
            self.tick_at(clock.now())?;
            on_frame(FrameIndex(delivered), &self.ctx.frame())?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Last presented frame.
    pub fn frame(&self) -> FrameRGBA {
        self.ctx.frame()
    }

    /// Whether any animation is running.
    pub fn is_animating(&self) -> bool {
        self.animator.render_loop().is_ticking()
    }

    /// Shapes and their attributes.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Timelines.
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Repaint scheduler state.
    pub fn render_loop(&self) -> &RenderLoop {
        self.animator.render_loop()
    }

    /// Counters.
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    /// Configuration.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The chart.
    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Dataset of the latest `render`.
    pub fn root_datum(&self) -> &[C::Datum] {
        &self.root
    }

    /// Register font bytes for text drawing.
    pub fn load_font(&mut self, font_bytes: Vec<u8>) -> ChartResult<String> {
        self.ctx.load_font(font_bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
