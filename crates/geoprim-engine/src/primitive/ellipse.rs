use glam::{Mat4, Vec3};

use crate::coords::{pack, BoundingSphere, ColorRgba};
use crate::error::{check_vertex_count, GeometryError};
use crate::geometry::{
    build_fan_indices, build_loop_indices, EllipseShape, EllipseTessellator, PlanarEllipse,
};
use crate::host::{FrameState, RenderResources};
use crate::scene::{Border, PrimitiveType};

use super::base::{positions_for_mode, PrimitiveBase, PrimitiveOptions, UpdateablePrimitive};
use super::slot::DrawSlot;

/// Default angular step between boundary samples, radians.
pub const DEFAULT_GRANULARITY: f32 = 0.3;

/// Construction options for [`EllipsePrimitive`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipseOptions {
    pub center: Vec3,
    pub semi_major_axis: f32,
    pub semi_minor_axis: f32,
    pub rotation: f32,
    pub granularity: f32,
    pub border: Border,
    pub fill: bool,
    pub show: bool,
    pub color: ColorRgba,
    pub border_color: ColorRgba,
    pub debug_show_bounding_volume: bool,
}

impl EllipseOptions {
    /// Required parameters; everything else takes its default.
    pub fn new(center: Vec3, semi_major_axis: f32, semi_minor_axis: f32) -> Self {
        Self {
            center,
            semi_major_axis,
            semi_minor_axis,
            rotation: 0.0,
            granularity: DEFAULT_GRANULARITY,
            border: Border::default(),
            fill: true,
            show: true,
            color: ColorRgba::black(),
            border_color: ColorRgba::black(),
            debug_show_bounding_volume: false,
        }
    }
}

/// Partial location update for [`EllipsePrimitive::update_location_data`].
///
/// `None` fields keep their current value.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct EllipseLocation {
    pub center: Option<Vec3>,
    pub semi_major_axis: Option<f32>,
    pub semi_minor_axis: Option<f32>,
    pub rotation: Option<f32>,
}

/// Derived geometry: the boundary and the fan (center + boundary).
#[derive(Debug, Clone, Default, PartialEq)]
struct EllipsePoints {
    outer: Vec<f32>,
    inner: Vec<f32>,
}

/// Filled and/or bordered ellipse.
///
/// Geometry is derived from `(center, axes, rotation, granularity)`. Setters
/// only mark it stale; it is re-tessellated at the start of the next rendered
/// frame. `update_location_data` re-tessellates immediately.
pub struct EllipsePrimitive {
    base: PrimitiveBase,
    tessellator: Box<dyn EllipseTessellator>,

    center: Vec3,
    semi_major_axis: f32,
    semi_minor_axis: f32,
    rotation: f32,
    granularity: f32,

    border: Border,
    fill: bool,
    border_color: ColorRgba,
    debug_show_bounding_volume: bool,

    points: EllipsePoints,
    border_indices: Vec<u16>,
    fill_indices: Vec<u16>,
    geometry_stale: bool,

    border_slot: DrawSlot,
    fill_slot: DrawSlot,
}

impl EllipsePrimitive {
    /// Creates an ellipse tessellated in its own plane.
    pub fn new(options: EllipseOptions) -> Result<Self, GeometryError> {
        Self::with_tessellator(options, PlanarEllipse)
    }

    /// Creates an ellipse whose boundary comes from `tessellator`.
    pub fn with_tessellator(
        options: EllipseOptions,
        tessellator: impl EllipseTessellator + 'static,
    ) -> Result<Self, GeometryError> {
        let mut ellipse = Self {
            base: PrimitiveBase::new(PrimitiveOptions {
                show: options.show,
                color: options.color,
            }),
            tessellator: Box::new(tessellator),
            center: options.center,
            semi_major_axis: options.semi_major_axis,
            semi_minor_axis: options.semi_minor_axis,
            rotation: options.rotation,
            granularity: options.granularity,
            border: options.border,
            fill: options.fill,
            border_color: options.border_color,
            debug_show_bounding_volume: options.debug_show_bounding_volume,
            points: EllipsePoints::default(),
            border_indices: Vec::new(),
            fill_indices: Vec::new(),
            geometry_stale: true,
            border_slot: DrawSlot::new("ellipse border"),
            fill_slot: DrawSlot::new("ellipse fill"),
        };

        ellipse.calculate_points()?;
        ellipse.create_bounding_volume();
        Ok(ellipse)
    }

    // ── shape parameters ───────────────────────────────────────────────────

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        if self.center != center {
            self.center = center;
            self.invalidate_geometry();
        }
    }

    #[inline]
    pub fn semi_major_axis(&self) -> f32 {
        self.semi_major_axis
    }

    pub fn set_semi_major_axis(&mut self, value: f32) {
        self.semi_major_axis = value;
        self.invalidate_geometry();
    }

    #[inline]
    pub fn semi_minor_axis(&self) -> f32 {
        self.semi_minor_axis
    }

    pub fn set_semi_minor_axis(&mut self, value: f32) {
        self.semi_minor_axis = value;
        self.invalidate_geometry();
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
        self.invalidate_geometry();
    }

    #[inline]
    pub fn granularity(&self) -> f32 {
        self.granularity
    }

    pub fn set_granularity(&mut self, radians: f32) {
        self.granularity = radians;
        self.invalidate_geometry();
    }

    /// Merges `data` over the current location and re-tessellates now.
    ///
    /// Invalid parameters are rejected before anything is assigned.
    pub fn update_location_data(&mut self, data: EllipseLocation) -> Result<(), GeometryError> {
        let shape = EllipseShape {
            center: data.center.unwrap_or(self.center),
            semi_major_axis: data.semi_major_axis.unwrap_or(self.semi_major_axis),
            semi_minor_axis: data.semi_minor_axis.unwrap_or(self.semi_minor_axis),
            rotation: data.rotation.unwrap_or(self.rotation),
            granularity: self.granularity,
        };
        validate_shape(&shape)?;

        self.center = shape.center;
        self.semi_major_axis = shape.semi_major_axis;
        self.semi_minor_axis = shape.semi_minor_axis;
        self.rotation = shape.rotation;

        self.calculate_points()?;
        self.create_bounding_volume();
        self.base.mark_dirty();
        Ok(())
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

    /// Style only picks the topology, so the uploaded buffers stay valid.
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

    // ── derived geometry ───────────────────────────────────────────────────

    /// Packed boundary positions.
    #[inline]
    pub fn outer_positions(&self) -> &[f32] {
        &self.points.outer
    }

    /// Packed fan positions: the center followed by the boundary.
    #[inline]
    pub fn inner_positions(&self) -> &[f32] {
        &self.points.inner
    }

    #[inline]
    pub fn border_indices(&self) -> &[u16] {
        &self.border_indices
    }

    #[inline]
    pub fn fill_indices(&self) -> &[u16] {
        &self.fill_indices
    }

    #[inline]
    pub fn bounding_volume(&self) -> Option<BoundingSphere> {
        self.base.bounding_volume()
    }

    /// Visible, with at least one of fill or border enabled.
    pub fn should_render(&self) -> bool {
        self.base.should_render() && (self.fill || self.border.show)
    }

    /// Re-tessellates from the current parameters.
    pub fn calculate_points(&mut self) -> Result<(), GeometryError> {
        let shape = self.shape();
        validate_shape(&shape)?;

        let outer = self.tessellator.compute_boundary(&shape);
        let outer_count = pack::point_count(&outer);
        if outer_count == 0 {
            return Err(GeometryError::EmptyBoundary);
        }
        check_vertex_count(outer_count + 1)?;

        let mut inner = Vec::with_capacity(outer.len() + pack::COMPONENTS);
        pack::pack_into(&[self.center], &mut inner);
        inner.extend_from_slice(&outer);

        self.set_points(EllipsePoints { outer, inner });
        self.geometry_stale = false;
        Ok(())
    }

    /// Regenerates index arrays only when the respective point count changed.
    fn set_points(&mut self, points: EllipsePoints) {
        let outer_count = pack::point_count(&points.outer);
        if self.border_indices.is_empty() || pack::point_count(&self.points.outer) != outer_count {
            log::debug!("ellipse border indices regenerated for {outer_count} points");
            self.border_indices = build_loop_indices(outer_count);
        }

        let inner_count = pack::point_count(&points.inner);
        if self.fill_indices.is_empty() || pack::point_count(&self.points.inner) != inner_count {
            self.fill_indices = build_fan_indices(inner_count);
        }

        self.points = points;
    }

    fn shape(&self) -> EllipseShape {
        EllipseShape {
            center: self.center,
            semi_major_axis: self.semi_major_axis,
            semi_minor_axis: self.semi_minor_axis,
            rotation: self.rotation,
            granularity: self.granularity,
        }
    }

    fn invalidate_geometry(&mut self) {
        self.geometry_stale = true;
        self.base.mark_dirty();
    }

    fn create_bounding_volume(&mut self) {
        self.base
            .set_bounding_volume(BoundingSphere::new(self.center, self.semi_major_axis));
    }

    /// Ticks one frame. See [`UpdateablePrimitive::update`].
    pub fn update(&mut self, frame: &mut FrameState<'_>) -> anyhow::Result<()> {
        if !self.should_render() {
            log::trace!("ellipse hidden; no draw commands this frame");
            return Ok(());
        }

        self.base.observe_mode(frame.mode);

        if self.geometry_stale {
            self.calculate_points()?;
            self.create_bounding_volume();
        }

        let fill_translucent = self.base.is_translucent();
        let border_translucent = self.border_color.is_translucent();

        self.base
            .setup_render_state(frame.resources, fill_translucent || border_translucent);
        self.base.setup_shader_program(frame.resources)?;

        let dirty = self.base.is_dirty();

        let border_va = if self.border.show {
            if self.border_slot.needs_rebuild(dirty) {
                let positions = positions_for_mode(&self.points.outer, frame.mode, frame.projector);
                self.border_slot.rebuild(
                    frame.resources,
                    &positions,
                    &self.border_indices,
                    self.border_color,
                )?;
            }
            self.border_slot.vertex_array()
        } else {
            self.border_slot.skip(dirty);
            None
        };

        let fill_va = if self.fill {
            if self.fill_slot.needs_rebuild(dirty) {
                let positions = positions_for_mode(&self.points.inner, frame.mode, frame.projector);
                self.fill_slot.rebuild(
                    frame.resources,
                    &positions,
                    &self.fill_indices,
                    self.base.color(),
                )?;
            }
            self.fill_slot.vertex_array()
        } else {
            self.fill_slot.skip(dirty);
            None
        };

        // Nothing below can fail; a frame either gets all of its commands or none.
        if let Some(vertex_array) = border_va {
            self.base.setup_draw_command(
                self.border_slot.command_mut(),
                vertex_array,
                self.border.style.topology(),
                border_translucent,
                self.debug_show_bounding_volume,
            );
            frame.command_list.push(self.border_slot.command().clone());
        }
        if let Some(vertex_array) = fill_va {
            self.base.setup_draw_command(
                self.fill_slot.command_mut(),
                vertex_array,
                PrimitiveType::TriangleList,
                fill_translucent,
                self.debug_show_bounding_volume,
            );
            frame.command_list.push(self.fill_slot.command().clone());
        }

        self.base.finish_frame(frame.mode);
        Ok(())
    }

    /// Releases the shader program and both vertex arrays.
    pub fn destroy(mut self, resources: &mut dyn RenderResources) {
        self.base.release(resources);
        self.fill_slot.release(resources);
        self.border_slot.release(resources);
    }
}

impl UpdateablePrimitive for EllipsePrimitive {
    fn update(&mut self, frame: &mut FrameState<'_>) -> anyhow::Result<()> {
        EllipsePrimitive::update(self, frame)
    }

    fn destroy(self: Box<Self>, resources: &mut dyn RenderResources) {
        EllipsePrimitive::destroy(*self, resources);
    }

    fn bounding_volume(&self) -> Option<BoundingSphere> {
        self.base.bounding_volume()
    }
}

impl std::fmt::Debug for EllipsePrimitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EllipsePrimitive")
            .field("center", &self.center)
            .field("semi_major_axis", &self.semi_major_axis)
            .field("semi_minor_axis", &self.semi_minor_axis)
            .field("rotation", &self.rotation)
            .field("granularity", &self.granularity)
            .field("border", &self.border)
            .field("fill", &self.fill)
            .field("dirty", &self.base.is_dirty())
            .finish_non_exhaustive()
    }
}

fn validate_shape(shape: &EllipseShape) -> Result<(), GeometryError> {
    let (major, minor) = (shape.semi_major_axis, shape.semi_minor_axis);
    if !(major.is_finite() && minor.is_finite() && minor > 0.0 && major >= minor) {
        return Err(GeometryError::InvalidAxes {
            semi_major: major,
            semi_minor: minor,
        });
    }
    if !(shape.granularity.is_finite() && shape.granularity > 0.0) {
        return Err(GeometryError::InvalidGranularity(shape.granularity));
    }
    // Center vertex plus boundary, checked before anything is tessellated.
    let samples = PlanarEllipse::sample_count(shape.granularity);
    check_vertex_count(samples.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NoProjection, ScenePositionProjector};
    use crate::scene::{BorderStyle, DrawCommand, Pass, SceneMode};
    use crate::testing::{FixedCountTessellator, OffsetProjector, RecordingResources};

    fn options() -> EllipseOptions {
        let mut options = EllipseOptions::new(Vec3::ZERO, 10.0, 5.0);
        options.granularity = 0.5;
        options
    }

    fn ellipse() -> EllipsePrimitive {
        EllipsePrimitive::with_tessellator(options(), FixedCountTessellator::new(16)).unwrap()
    }

    fn tick(
        e: &mut EllipsePrimitive,
        res: &mut RecordingResources,
        mode: SceneMode,
    ) -> Vec<DrawCommand> {
        tick_projected(e, res, mode, &NoProjection)
    }

    fn tick_projected(
        e: &mut EllipsePrimitive,
        res: &mut RecordingResources,
        mode: SceneMode,
        projector: &dyn ScenePositionProjector,
    ) -> Vec<DrawCommand> {
        let mut commands = Vec::new();
        let mut frame = FrameState::new(mode, res, projector, &mut commands);
        e.update(&mut frame).unwrap();
        commands
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn fixed_tessellator_count_and_sphere() {
        let e = ellipse();
        assert_eq!(pack::point_count(e.outer_positions()), 16);
        assert_eq!(
            e.bounding_volume(),
            Some(BoundingSphere::new(Vec3::ZERO, 10.0))
        );
    }

    #[test]
    fn planar_tessellation_is_the_default() {
        let e = EllipsePrimitive::new(options()).unwrap();
        assert_eq!(pack::point_count(e.outer_positions()), PlanarEllipse::sample_count(0.5));
    }

    #[test]
    fn inner_positions_are_center_then_boundary() {
        let mut opts = options();
        opts.center = Vec3::new(1.0, 2.0, 3.0);
        let e = EllipsePrimitive::with_tessellator(opts, FixedCountTessellator::new(8)).unwrap();

        let inner = e.inner_positions();
        let outer = e.outer_positions();
        assert_eq!(pack::point_count(inner), pack::point_count(outer) + 1);
        assert_eq!(&inner[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&inner[3..], outer);
    }

    #[test]
    fn index_arrays_match_point_counts() {
        let e = ellipse();
        assert_eq!(e.border_indices().len(), 16);
        assert_eq!(e.fill_indices().len(), 3 * (17 - 2) + 3);
    }

    #[test]
    fn defaults_applied() {
        let e = ellipse();
        assert_eq!(e.rotation(), 0.0);
        assert_eq!(e.border(), Border::new(true, BorderStyle::Solid));
        assert!(e.fill());
        assert!(e.show());
        assert_eq!(EllipseOptions::new(Vec3::ZERO, 2.0, 1.0).granularity, 0.3);
    }

    #[test]
    fn invalid_axes_rejected() {
        let err = EllipsePrimitive::new(EllipseOptions::new(Vec3::ZERO, 2.0, 3.0)).unwrap_err();
        assert_eq!(err, GeometryError::InvalidAxes { semi_major: 2.0, semi_minor: 3.0 });
        assert!(EllipsePrimitive::new(EllipseOptions::new(Vec3::ZERO, 2.0, 0.0)).is_err());
    }

    #[test]
    fn invalid_granularity_rejected() {
        let mut opts = options();
        opts.granularity = 0.0;
        assert_eq!(
            EllipsePrimitive::new(opts).unwrap_err(),
            GeometryError::InvalidGranularity(0.0)
        );
    }

    #[test]
    fn tiny_granularity_rejected_before_tessellating() {
        for granularity in [1e-30, 1e-5] {
            let tess = FixedCountTessellator::new(16);
            let calls = tess.calls();
            let mut opts = options();
            opts.granularity = granularity;

            let err = EllipsePrimitive::with_tessellator(opts, tess).unwrap_err();
            assert!(matches!(err, GeometryError::TooManyVertices { .. }), "{err:?}");
            assert_eq!(calls.get(), 0);
        }

        let mut opts = options();
        opts.granularity = 1e-4;
        assert!(EllipsePrimitive::new(opts).is_ok());
    }

    #[test]
    fn tiny_granularity_setter_surfaces_on_update() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        e.set_granularity(1e-30);

        let mut commands = Vec::new();
        let mut frame = FrameState::new(SceneMode::Scene3D, &mut res, &NoProjection, &mut commands);
        let err = e.update(&mut frame).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GeometryError>(),
            Some(GeometryError::TooManyVertices { .. })
        ));
        assert!(commands.is_empty());
    }

    #[test]
    fn empty_tessellation_rejected() {
        let err = EllipsePrimitive::with_tessellator(options(), FixedCountTessellator::new(0))
            .unwrap_err();
        assert_eq!(err, GeometryError::EmptyBoundary);
    }

    // ── mutation ──────────────────────────────────────────────────────────

    #[test]
    fn update_location_data_merges_and_recomputes() {
        let tess = FixedCountTessellator::new(16);
        let calls = tess.calls();
        let mut e = EllipsePrimitive::with_tessellator(options(), tess).unwrap();
        let tess_calls = calls.get();

        e.update_location_data(EllipseLocation {
            center: Some(Vec3::new(5.0, 0.0, 0.0)),
            semi_major_axis: Some(20.0),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(e.center(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(e.semi_major_axis(), 20.0);
        assert_eq!(e.semi_minor_axis(), 5.0);
        assert_eq!(calls.get(), tess_calls + 1);
        assert_eq!(&e.inner_positions()[..3], &[5.0, 0.0, 0.0]);
        assert_eq!(
            e.bounding_volume(),
            Some(BoundingSphere::new(Vec3::new(5.0, 0.0, 0.0), 20.0))
        );
        assert!(e.is_dirty());
    }

    #[test]
    fn rejected_location_update_changes_nothing() {
        let mut e = ellipse();
        let before = e.outer_positions().to_vec();

        let result = e.update_location_data(EllipseLocation {
            semi_minor_axis: Some(50.0),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(e.semi_minor_axis(), 5.0);
        assert_eq!(e.outer_positions(), before.as_slice());
    }

    #[test]
    fn setters_defer_tessellation_to_update() {
        let mut res = RecordingResources::default();
        let tess = FixedCountTessellator::new(16);
        let calls = tess.calls();
        let mut e = EllipsePrimitive::with_tessellator(options(), tess).unwrap();
        tick(&mut e, &mut res, SceneMode::Scene3D);
        let before = calls.get();

        e.set_rotation(1.0);
        e.set_semi_major_axis(12.0);
        assert!(e.is_dirty());
        assert_eq!(calls.get(), before);

        tick(&mut e, &mut res, SceneMode::Scene3D);
        assert_eq!(calls.get(), before + 1);
        assert_eq!(e.bounding_volume().map(|b| b.radius), Some(12.0));
        assert!(!e.is_dirty());

        e.destroy(&mut res);
    }

    #[test]
    fn same_count_retessellation_keeps_index_arrays() {
        let mut e = ellipse();
        let border_ptr = e.border_indices().as_ptr();
        let fill_ptr = e.fill_indices().as_ptr();

        e.update_location_data(EllipseLocation {
            rotation: Some(0.25),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(e.border_indices().as_ptr(), border_ptr);
        assert_eq!(e.fill_indices().as_ptr(), fill_ptr);
    }

    #[test]
    fn count_change_regenerates_index_arrays() {
        let mut e = EllipsePrimitive::new(options()).unwrap();
        e.set_granularity(0.1);
        e.calculate_points().unwrap();
        let n = PlanarEllipse::sample_count(0.1);
        assert_eq!(e.border_indices().len(), n);
        assert_eq!(e.fill_indices().len(), 3 * (n + 1 - 2) + 3);
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn first_frame_emits_border_then_fill() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();

        let commands = tick(&mut e, &mut res, SceneMode::Scene3D);

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].primitive_type, PrimitiveType::LineLoop);
        assert_eq!(commands[1].primitive_type, PrimitiveType::TriangleList);
        assert!(commands.iter().all(|c| c.is_complete() && c.pass == Pass::Opaque));
        assert_eq!(res.live_vertex_arrays.len(), 2);
        assert_eq!(res.programs_compiled, 1);
        assert!(!e.is_dirty());

        e.destroy(&mut res);
    }

    #[test]
    fn clean_frames_reuse_vertex_arrays() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();

        let first = tick(&mut e, &mut res, SceneMode::Scene3D);
        let second = tick(&mut e, &mut res, SceneMode::Scene3D);

        assert_eq!(first, second);
        assert_eq!(res.vertex_arrays_created, 2);
        assert_eq!(res.programs_compiled, 1);

        e.destroy(&mut res);
    }

    #[test]
    fn dirty_rebuild_replaces_rather_than_accumulates() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        tick(&mut e, &mut res, SceneMode::Scene3D);

        e.set_color(ColorRgba::white());
        tick(&mut e, &mut res, SceneMode::Scene3D);

        assert_eq!(res.vertex_arrays_created, 4);
        assert_eq!(res.live_vertex_arrays.len(), 2);
        assert_eq!(res.destroyed_vertex_arrays.len(), 2);
        assert!(res.live_vertex_arrays.values().any(|va| va.color == ColorRgba::white()));

        e.destroy(&mut res);
    }

    #[test]
    fn hidden_ellipse_emits_nothing() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        e.set_show(false);
        assert!(tick(&mut e, &mut res, SceneMode::Scene3D).is_empty());
        assert_eq!(res.vertex_arrays_created, 0);

        e.set_show(true);
        e.set_fill(false);
        e.set_border(Border::hidden());
        assert!(!e.should_render());
        assert!(tick(&mut e, &mut res, SceneMode::Scene3D).is_empty());
    }

    #[test]
    fn border_only_and_dashed() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        e.set_fill(false);
        e.set_border(Border::new(true, BorderStyle::Dashed));

        let commands = tick(&mut e, &mut res, SceneMode::Scene3D);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].primitive_type, PrimitiveType::LineList);

        e.destroy(&mut res);
    }

    #[test]
    fn passes_follow_each_color() {
        let mut res = RecordingResources::default();
        let mut opts = options();
        opts.color = ColorRgba::new(1.0, 0.0, 0.0, 0.5);
        let mut e =
            EllipsePrimitive::with_tessellator(opts, FixedCountTessellator::new(16)).unwrap();

        let commands = tick(&mut e, &mut res, SceneMode::Scene3D);
        assert_eq!(commands[0].pass, Pass::Opaque);
        assert_eq!(commands[1].pass, Pass::Translucent);
        assert!(res.render_states.iter().any(|s| s.blending));

        e.destroy(&mut res);
    }

    #[test]
    fn mode_change_rebuilds_with_projected_positions() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        tick(&mut e, &mut res, SceneMode::Scene3D);

        let projector = OffsetProjector(Vec3::new(100.0, 0.0, 0.0));
        let mut commands = Vec::new();
        let mut frame = FrameState::new(SceneMode::Scene2D, &mut res, &projector, &mut commands);
        e.update(&mut frame).unwrap();

        assert_eq!(res.vertex_arrays_created, 4);
        let fill = res.vertex_array(commands[1].vertex_array.unwrap()).unwrap();
        assert_eq!(&fill.positions[..3], &[100.0, 0.0, 0.0]);

        e.destroy(&mut res);
    }

    #[test]
    fn resource_failure_propagates() {
        let mut res = RecordingResources::default();
        res.fail_vertex_buffers = true;
        let mut e = ellipse();

        let mut commands = Vec::new();
        let mut frame = FrameState::new(SceneMode::Scene3D, &mut res, &NoProjection, &mut commands);
        assert!(e.update(&mut frame).is_err());
        assert!(commands.is_empty());
        assert!(e.is_dirty());

        e.destroy(&mut res);
    }

    #[test]
    fn failed_fill_rebuild_emits_no_commands() {
        let mut res = RecordingResources::default();
        // The border's vertex buffer is the first request, the fill's the second.
        res.fail_vertex_buffer_at = Some(2);
        let mut e = ellipse();

        let mut commands = Vec::new();
        let mut frame = FrameState::new(SceneMode::Scene3D, &mut res, &NoProjection, &mut commands);
        assert!(e.update(&mut frame).is_err());
        assert!(commands.is_empty());
        assert!(e.is_dirty());

        res.fail_vertex_buffer_at = None;
        let commands = tick(&mut e, &mut res, SceneMode::Scene3D);
        assert_eq!(commands.len(), 2);
        assert_eq!(res.live_vertex_arrays.len(), 2);

        e.destroy(&mut res);
    }

    #[test]
    fn border_hidden_through_a_move_is_rebuilt_when_shown() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        tick(&mut e, &mut res, SceneMode::Scene3D);

        let projector = OffsetProjector(Vec3::new(100.0, 0.0, 0.0));
        e.set_border(Border::hidden());
        e.update_location_data(EllipseLocation {
            center: Some(Vec3::new(50.0, 0.0, 0.0)),
            ..Default::default()
        })
        .unwrap();
        let commands = tick_projected(&mut e, &mut res, SceneMode::Scene2D, &projector);
        assert_eq!(commands.len(), 1);
        assert!(!e.is_dirty());

        e.set_border(Border::default());
        let commands = tick_projected(&mut e, &mut res, SceneMode::Scene2D, &projector);
        assert_eq!(commands.len(), 2);

        let border = res.vertex_array(commands[0].vertex_array.unwrap()).unwrap();
        let fill = res.vertex_array(commands[1].vertex_array.unwrap()).unwrap();
        assert_eq!(&border.positions[..3], &[160.0, 0.0, 0.0]);
        assert_eq!(&fill.positions[..3], &[150.0, 0.0, 0.0]);
        assert_eq!(res.live_vertex_arrays.len(), 2);

        e.destroy(&mut res);
    }

    #[test]
    fn fill_disabled_through_a_color_change_is_rebuilt_when_enabled() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        tick(&mut e, &mut res, SceneMode::Scene3D);

        e.set_fill(false);
        e.set_color(ColorRgba::white());
        tick(&mut e, &mut res, SceneMode::Scene3D);

        e.set_fill(true);
        let commands = tick(&mut e, &mut res, SceneMode::Scene3D);
        let fill = res.vertex_array(commands[1].vertex_array.unwrap()).unwrap();
        assert_eq!(fill.color, ColorRgba::white());

        // A clean frame after that reuses both arrays again.
        let created = res.vertex_arrays_created;
        tick(&mut e, &mut res, SceneMode::Scene3D);
        assert_eq!(res.vertex_arrays_created, created);

        e.destroy(&mut res);
    }

    #[test]
    fn invalid_setter_surfaces_on_update() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        e.set_semi_minor_axis(-1.0);

        let mut commands = Vec::new();
        let mut frame = FrameState::new(SceneMode::Scene3D, &mut res, &NoProjection, &mut commands);
        let err = e.update(&mut frame).unwrap_err();
        assert!(err.downcast_ref::<GeometryError>().is_some());
    }

    // ── destroy ───────────────────────────────────────────────────────────

    #[test]
    fn destroy_releases_everything_once() {
        let mut res = RecordingResources::default();
        let mut e = ellipse();
        tick(&mut e, &mut res, SceneMode::Scene3D);

        let boxed: Box<dyn UpdateablePrimitive> = Box::new(e);
        boxed.destroy(&mut res);

        assert!(res.live_vertex_arrays.is_empty());
        assert!(res.live_buffers.is_empty());
        assert!(res.live_programs.is_empty());
        assert_eq!(res.destroyed_vertex_arrays.len(), 2);
    }

    #[test]
    fn destroy_before_first_frame_is_fine() {
        let mut res = RecordingResources::default();
        ellipse().destroy(&mut res);
        assert!(res.destroyed_vertex_arrays.is_empty());
    }
}
