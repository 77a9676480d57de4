use glam::{Mat4, Vec3};

use crate::coords::{pack, BoundingSphere, ColorRgba};
use crate::error::{check_vertex_count, GeometryError};
use crate::geometry::{build_loop_indices, find_radius, polygon_centroid};
use crate::host::{FrameState, RenderResources};
use crate::scene::Border;

use super::base::{positions_for_mode, PrimitiveBase, PrimitiveOptions, UpdateablePrimitive};
use super::ellipse::DEFAULT_GRANULARITY;
use super::slot::DrawSlot;

/// Construction options for [`PolygonPrimitive`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOptions {
    pub points: Vec<Vec3>,
    pub border: Border,
    pub fill: bool,
    pub show: bool,
    pub color: ColorRgba,
    pub border_color: ColorRgba,
    /// Kept for parity with ellipses; the outline renderer does not subdivide.
    pub granularity: f32,
    pub debug_show_bounding_volume: bool,
}

impl PolygonOptions {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            border: Border::default(),
            fill: true,
            show: true,
            color: ColorRgba::black(),
            border_color: ColorRgba::black(),
            granularity: DEFAULT_GRANULARITY,
            debug_show_bounding_volume: false,
        }
    }
}

/// Polygon outline from an ordered point list.
///
/// Border-only: `fill` and `color` are stored but no fill draw is produced.
/// Points are assumed coplanar; centroid and bounds are computed in x/y.
pub struct PolygonPrimitive {
    base: PrimitiveBase,

    points: Vec<f32>,
    center: Vec3,
    border_indices: Vec<u16>,

    border: Border,
    fill: bool,
    border_color: ColorRgba,
    granularity: f32,
    debug_show_bounding_volume: bool,

    border_slot: DrawSlot,
}

impl PolygonPrimitive {
    pub fn new(options: PolygonOptions) -> Result<Self, GeometryError> {
        let mut polygon = Self {
            base: PrimitiveBase::new(PrimitiveOptions {
                show: options.show,
                color: options.color,
            }),
            points: Vec::new(),
            center: Vec3::ZERO,
            border_indices: Vec::new(),
            border: options.border,
            fill: options.fill,
            border_color: options.border_color,
            granularity: options.granularity,
            debug_show_bounding_volume: options.debug_show_bounding_volume,
            border_slot: DrawSlot::new("polygon border"),
        };
        polygon.set_points(&options.points)?;
        Ok(polygon)
    }

    // ── points ─────────────────────────────────────────────────────────────

    /// Packed positions.
    #[inline]
    pub fn points(&self) -> &[f32] {
        &self.points
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        pack::point_count(&self.points)
    }

    /// Replaces the point list.
    ///
    /// A different point count regenerates the border indices, centroid and
    /// bounding sphere. The same count only swaps positions; indices and bounds
    /// are kept (call [`recompute_bounds`](Self::recompute_bounds) if the shape
    /// moved far). Either way the next frame re-uploads.
    pub fn set_points(&mut self, points: &[Vec3]) -> Result<(), GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints { count: points.len() });
        }
        check_vertex_count(points.len())?;

        if self.border_indices.is_empty() || self.point_count() != points.len() {
            let center = polygon_centroid(points)?;
            let radius = find_radius(center, points);

            log::debug!("polygon topology changed to {} points", points.len());
            self.border_indices = build_loop_indices(points.len());
            self.center = center;
            self.base.set_bounding_volume(BoundingSphere::new(center, radius));
        }

        self.points.clear();
        pack::pack_into(points, &mut self.points);
        self.base.mark_dirty();
        Ok(())
    }

    /// Same as [`set_points`](Self::set_points).
    pub fn update_location_data(&mut self, points: &[Vec3]) -> Result<(), GeometryError> {
        self.set_points(points)
    }

    /// Recomputes centroid and bounding sphere from the current positions.
    pub fn recompute_bounds(&mut self) -> Result<(), GeometryError> {
        let points: Vec<Vec3> = pack::unpack(&self.points).collect();
        let center = polygon_centroid(&points)?;
        self.center = center;
        self.base
            .set_bounding_volume(BoundingSphere::new(center, find_radius(center, &points)));
        Ok(())
    }

    /// Polygon centroid.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn border_indices(&self) -> &[u16] {
        &self.border_indices
    }

    #[inline]
    pub fn bounding_volume(&self) -> Option<BoundingSphere> {
        self.base.bounding_volume()
    }

    // ── appearance ─────────────────────────────────────────────────────────

    #[inline]
    pub fn show(&self) -> bool {
        self.base.show()
    }

    pub fn set_show(&mut self, show: bool) {
        self.base.set_show(show);
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        self.base.color()
    }

    pub fn set_color(&mut self, color: ColorRgba) {
        self.base.set_color(color);
    }

    #[inline]
    pub fn border_color(&self) -> ColorRgba {
        self.border_color
    }

    pub fn set_border_color(&mut self, color: ColorRgba) {
        self.border_color = color;
        self.base.mark_dirty();
    }

    #[inline]
    pub fn border(&self) -> Border {
        self.border
    }

    pub fn set_border(&mut self, border: Border) {
        self.border = border;
    }

    #[inline]
    pub fn fill(&self) -> bool {
        self.fill
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.fill = fill;
    }

    #[inline]
    pub fn granularity(&self) -> f32 {
        self.granularity
    }

    pub fn set_granularity(&mut self, radians: f32) {
        self.granularity = radians;
    }

    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.base.set_model_matrix(model_matrix);
    }

    pub fn set_debug_show_bounding_volume(&mut self, show: bool) {
        self.debug_show_bounding_volume = show;
    }

    #[inline]
    pub fn is_translucent(&self) -> bool {
        self.base.is_translucent()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.base.is_dirty()
    }

    pub fn should_render(&self) -> bool {
        self.base.should_render() && self.border.show
    }

    // ── frame ──────────────────────────────────────────────────────────────

    /// Ticks one frame. See [`UpdateablePrimitive::update`].
    pub fn update(&mut self, frame: &mut FrameState<'_>) -> anyhow::Result<()> {
        if !self.should_render() {
            log::trace!("polygon hidden; no draw commands this frame");
            return Ok(());
        }

        self.base.observe_mode(frame.mode);

        let border_translucent = self.border_color.is_translucent();
        let blending = self.base.is_translucent() || border_translucent;
        self.base.setup_render_state(frame.resources, blending);
        self.base.setup_shader_program(frame.resources)?;

        if self.border_slot.needs_rebuild(self.base.is_dirty()) {
            let positions = positions_for_mode(&self.points, frame.mode, frame.projector);
            self.border_slot.rebuild(
                frame.resources,
                &positions,
                &self.border_indices,
                self.border_color,
            )?;
        }
        if let Some(vertex_array) = self.border_slot.vertex_array() {
            self.base.setup_draw_command(
                self.border_slot.command_mut(),
                vertex_array,
                self.border.style.topology(),
                border_translucent,
                self.debug_show_bounding_volume,
            );
            frame.command_list.push(self.border_slot.command().clone());
        }

        self.base.finish_frame(frame.mode);
        Ok(())
    }

    /// Releases the shader program and the border vertex array.
    pub fn destroy(mut self, resources: &mut dyn RenderResources) {
        self.base.release(resources);
        self.border_slot.release(resources);
    }
}

impl UpdateablePrimitive for PolygonPrimitive {
    fn update(&mut self, frame: &mut FrameState<'_>) -> anyhow::Result<()> {
        PolygonPrimitive::update(self, frame)
    }

    fn destroy(self: Box<Self>, resources: &mut dyn RenderResources) {
        PolygonPrimitive::destroy(*self, resources);
    }

    fn bounding_volume(&self) -> Option<BoundingSphere> {
        self.base.bounding_volume()
    }
}

impl std::fmt::Debug for PolygonPrimitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonPrimitive")
            .field("point_count", &self.point_count())
            .field("center", &self.center)
            .field("border", &self.border)
            .field("dirty", &self.base.is_dirty())
            .finish_non_exhaustive()
    }
}
